//! Requirement counting and major GPA over reconciled slots

use serde::{Deserialize, Serialize};

use elig_catalog::grades;
use elig_terms::TermId;

use crate::roster::RequirementSlot;

/// Whether a slot name belongs to a requirement prefix.
///
/// The prefix must end at a boundary: `LD #1` matches `LD #1 Calc 1` but
/// not `LD #10 Linear Algebra`, and `DS UD` matches `DS UD#3`.
pub fn matches_requirement(name: &str, prefix: &str) -> bool {
    match name.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with(' ') || rest.starts_with('#'),
        None => false,
    }
}

fn matches_any(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| matches_requirement(name, p))
}

/// Slots in the group completed for credit. Withdrawals and raw test
/// scores count; planned, pass/no-pass, incomplete, ungraded, and
/// unverifiable marks do not. Slots sitting at the current term carry
/// non-credit marks after reconciliation, so the two counts never both
/// claim a reconciled slot.
pub fn count_completed(slots: &[RequirementSlot], prefixes: &[String]) -> u32 {
    slots
        .iter()
        .filter(|s| matches_any(&s.name, prefixes))
        .filter(|s| grades::is_credit(&s.grade))
        .count() as u32
}

/// Slots in the group enrolled in the current term
pub fn count_enrolled(slots: &[RequirementSlot], prefixes: &[String], current_term: TermId) -> u32 {
    slots
        .iter()
        .filter(|s| matches_any(&s.name, prefixes))
        .filter(|s| s.term.id() == Some(current_term))
        .count() as u32
}

/// Units-weighted GPA over the major requirement slots.
///
/// Only slots with a letter grade, positive units, and a numeric term
/// contribute; transfer work and test scores carry text terms and stay
/// out. `None` when nothing contributes.
pub fn major_gpa(slots: &[RequirementSlot], prefixes: &[String]) -> Option<f64> {
    let mut total_units = 0.0;
    let mut grade_points = 0.0;
    for slot in slots {
        if !matches_any(&slot.name, prefixes) {
            continue;
        }
        let Some(points) = grades::letter_points(&slot.grade) else {
            continue;
        };
        if slot.units <= 0.0 || !slot.term.is_id() {
            continue;
        }
        total_units += slot.units;
        grade_points += slot.units * points;
    }
    if total_units == 0.0 {
        None
    } else {
        Some(grade_points / total_units)
    }
}

/// Major-requirement slots graded in ways reviewers look at by hand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemGrades {
    /// Slots graded P or NP, as `"<slot> - <course>"`
    pub pass_no_pass: Vec<String>,
    /// Slots graded below a C-, as `"<slot> - <course>"`
    pub below_c_minus: Vec<String>,
}

impl ProblemGrades {
    pub fn is_empty(&self) -> bool {
        self.pass_no_pass.is_empty() && self.below_c_minus.is_empty()
    }
}

pub fn problem_grades(slots: &[RequirementSlot], prefixes: &[String]) -> ProblemGrades {
    let mut problems = ProblemGrades::default();
    for slot in slots {
        if !matches_any(&slot.name, prefixes) {
            continue;
        }
        let entry = format!("{} - {}", slot.name, slot.course);
        if grades::PASS_NO_PASS_MARKS.contains(&slot.grade.as_str()) {
            problems.pass_no_pass.push(entry);
        } else if grades::BELOW_C_MINUS_MARKS.contains(&slot.grade.as_str()) {
            problems.below_c_minus.push(entry);
        }
    }
    problems
}
