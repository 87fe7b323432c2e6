//! Markdown report generation

use crate::{CoreResult, MajorAssessment, ReviewBatch, StudentReview};

pub fn generate(batch: &ReviewBatch) -> CoreResult<String> {
    let mut output = String::new();

    output.push_str("# Eligibility Review\n\n");
    output.push_str(&format!("- Batch: {}\n", batch.id));
    output.push_str(&format!("- Started: {}\n", batch.started_at.to_rfc3339()));
    output.push_str(&format!("- Completed: {}\n", batch.completed_at.to_rfc3339()));
    output.push_str(&format!("- Students: {}\n", batch.summary.students));
    output.push_str(&format!(
        "- Verdicts: {} eligible, {} conditional, {} ineligible\n",
        batch.summary.eligible, batch.summary.conditional, batch.summary.ineligible
    ));
    output.push_str(&format!(
        "- Lookup failures: {}\n",
        batch.summary.lookup_failures
    ));

    for review in &batch.reviews {
        render_student(&mut output, review);
    }

    Ok(output)
}

fn render_student(output: &mut String, review: &StudentReview) {
    output.push_str(&format!("\n## Student {}\n\n", review.sid));

    if review.lookup_failed {
        output.push_str("Record lookup failed; nothing could be verified.\n");
        return;
    }

    if !review.discrepancies.is_empty() {
        output.push_str("### Identity discrepancies\n\n");
        for discrepancy in &review.discrepancies {
            output.push_str(&format!("- {discrepancy}\n"));
        }
        output.push('\n');
    }

    if !review.unverified.is_empty() {
        output.push_str("### Unverifiable slots\n\n");
        for name in &review.unverified {
            output.push_str(&format!("- {name}\n"));
        }
        output.push('\n');
    }

    output.push_str("### Requirement slots\n\n");
    output.push_str("| Slot | Course | Grade | Term | Units | Verified |\n");
    output.push_str("|------|--------|-------|------|-------|----------|\n");
    for slot in &review.slots {
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            slot.name,
            slot.course,
            slot.grade,
            slot.term,
            slot.units,
            if slot.verified { "yes" } else { "no" }
        ));
    }

    if !review.graduation_flags.is_empty() {
        output.push_str("\n### Plan flags\n\n");
        for flag in &review.graduation_flags {
            output.push_str(&format!("- {flag}\n"));
        }
    }

    if !review.assessments.is_empty() {
        output.push_str("\n### Majors\n\n");
        for assessment in &review.assessments {
            render_assessment(output, assessment);
        }
    }
}

fn render_assessment(output: &mut String, assessment: &MajorAssessment) {
    let gpa = match assessment.major_gpa {
        Some(gpa) => format!("{gpa:.3}"),
        None => "NA".to_string(),
    };
    output.push_str(&format!(
        "- **{}**: {} (major GPA {gpa})\n",
        assessment.major, assessment.verdict
    ));
    for entry in &assessment.pass_no_pass {
        output.push_str(&format!("  - Pass/No-Pass: {entry}\n"));
    }
    for entry in &assessment.below_c_minus {
        output.push_str(&format!("  - Below C-: {entry}\n"));
    }
    for flag in &assessment.plan_flags {
        output.push_str(&format!("  - {flag}\n"));
    }
}
