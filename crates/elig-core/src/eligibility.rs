//! Policy evaluation
//!
//! Interprets the declarative policy tables from `elig-catalog` against a
//! student's reconciled slots. Gates run first, then the tier matching the
//! student's terms in attendance; within a tier, checks run in order and
//! the first one that does not pass decides the verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use elig_catalog::grades;
use elig_catalog::policies::{Check, CourseMajorRule, MajorPolicy, Track, TrackPolicy};
use elig_terms::{TermId, TermValue};

use crate::aggregate::{count_completed, count_enrolled, matches_requirement};
use crate::roster::{ApplicantKind, RequirementSlot};

/// Outcome of evaluating one major's policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Eligible,
    Conditional(String),
    Ineligible(String),
}

impl Verdict {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Verdict::Eligible)
    }

    pub fn is_conditional(&self) -> bool {
        matches!(self, Verdict::Conditional(_))
    }

    pub fn is_ineligible(&self) -> bool {
        matches!(self, Verdict::Ineligible(_))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Eligible => write!(f, "Eligible"),
            Verdict::Conditional(reason) => write!(f, "Conditional: {reason}"),
            Verdict::Ineligible(reason) => write!(f, "Ineligible: {reason}"),
        }
    }
}

/// Everything a policy evaluation reads about one applicant
pub struct EvalContext<'a> {
    pub slots: &'a [RequirementSlot],
    pub current_term: TermId,
    pub applicant_type: ApplicantKind,
    pub terms_in_attendance: u32,
    pub reported_majors: &'a [String],
    pub major_gpa: Option<f64>,
}

enum CheckOutcome {
    Pass,
    Conditional(String),
    Fail(String),
}

/// Evaluate one major's policy for an applicant
pub fn evaluate(policy: &MajorPolicy, ctx: &EvalContext<'_>) -> Verdict {
    for gate in &policy.gates {
        match run_check(gate, ctx) {
            CheckOutcome::Pass => {}
            CheckOutcome::Conditional(reason) | CheckOutcome::Fail(reason) => {
                return Verdict::Ineligible(reason);
            }
        }
    }

    let track = match ctx.applicant_type {
        ApplicantKind::FirstYear => &policy.first_year,
        ApplicantKind::Transfer => &policy.transfer,
    };
    let track = match track {
        TrackPolicy::Tiers(track) => track,
        TrackPolicy::Ineligible(reason) => return Verdict::Ineligible(reason.clone()),
    };
    evaluate_track(track, ctx)
}

fn evaluate_track(track: &Track, ctx: &EvalContext<'_>) -> Verdict {
    let terms = ctx.terms_in_attendance;
    if let Some(ceiling) = track.max_terms {
        if terms > ceiling {
            return Verdict::Ineligible(format!(
                "too many terms in attendance ({terms} terms)"
            ));
        }
    }

    // bands are validated contiguous from zero and covering the ceiling
    let Some(tier) = track
        .tiers
        .iter()
        .find(|tier| terms >= tier.min_terms && terms < tier.max_terms)
    else {
        return Verdict::Ineligible(format!("no tier covers {terms} terms in attendance"));
    };

    for check in &tier.checks {
        match run_check(check, ctx) {
            CheckOutcome::Pass => {}
            CheckOutcome::Conditional(reason) => return Verdict::Conditional(reason),
            CheckOutcome::Fail(reason) => return Verdict::Ineligible(reason),
        }
    }
    Verdict::Eligible
}

fn run_check(check: &Check, ctx: &EvalContext<'_>) -> CheckOutcome {
    match check {
        Check::CombinedAtLeast { prefixes, min, fail } => {
            if combined_count(ctx, prefixes) >= *min {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
        Check::CombinedExactly {
            prefixes,
            total,
            fail,
            one_short,
        } => {
            let combined = combined_count(ctx, prefixes);
            if combined == *total {
                CheckOutcome::Pass
            } else if combined + 1 == *total {
                match one_short {
                    Some(reason) => CheckOutcome::Conditional(reason.clone()),
                    None => CheckOutcome::Fail(fail.clone()),
                }
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
        Check::CompletedAndCombined {
            prefixes,
            min_completed,
            total,
            fail,
        } => {
            let completed = count_completed(ctx.slots, prefixes);
            let enrolled = count_enrolled(ctx.slots, prefixes, ctx.current_term);
            if completed >= *min_completed && completed + enrolled == *total {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
        Check::AllCompleted { prefixes, fail } => {
            if count_completed(ctx.slots, prefixes) == prefixes.len() as u32 {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
        Check::SlotPassing { prefix, fail } => {
            if grades::passes_gate(grade_of(ctx, prefix)) {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
        Check::AnySlotPassing { prefixes, fail } => {
            if prefixes.iter().any(|p| grades::passes_gate(grade_of(ctx, p))) {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
        Check::SlotPlannedOrPassing { prefix, fail } => {
            let grade = grade_of(ctx, prefix);
            if grade == grades::PLANNED || grades::passes_gate(grade) {
                CheckOutcome::Pass
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
        Check::SlotUnderway {
            prefix,
            course_major,
            manual_review,
            fail,
        } => slot_underway(ctx, prefix, course_major.as_ref(), manual_review, fail),
        Check::GpaFloor {
            min,
            in_progress_prefixes,
            planned_prefix,
            fail,
            conditional,
        } => {
            if ctx.major_gpa.is_some_and(|gpa| gpa >= *min) {
                return CheckOutcome::Pass;
            }
            let in_progress =
                count_enrolled(ctx.slots, in_progress_prefixes, ctx.current_term) > 0
                    || planned_prefix
                        .as_deref()
                        .is_some_and(|p| grade_of(ctx, p) == grades::PLANNED);
            if in_progress {
                CheckOutcome::Conditional(conditional.clone())
            } else {
                CheckOutcome::Fail(fail.clone())
            }
        }
    }
}

/// A slot completed with an acceptable grade, or underway: planned or
/// enrolled up through the current term. A term reported as `Other` needs
/// a human decision, and the optional course-major pairing rejects a
/// course the applicant may not use without the paired major.
fn slot_underway(
    ctx: &EvalContext<'_>,
    prefix: &str,
    course_major: Option<&CourseMajorRule>,
    manual_review: &str,
    fail: &str,
) -> CheckOutcome {
    let slot = ctx
        .slots
        .iter()
        .find(|s| matches_requirement(&s.name, prefix));

    if let Some(slot) = slot {
        if matches!(&slot.term, TermValue::Text(t) if t == "Other") {
            return CheckOutcome::Conditional(manual_review.to_string());
        }
    }
    if let (Some(rule), Some(slot)) = (course_major, slot) {
        if slot.course == rule.course
            && !ctx.reported_majors.iter().any(|m| m.contains(&rule.major))
        {
            return CheckOutcome::Fail(rule.fail.clone());
        }
    }
    let Some(slot) = slot else {
        return CheckOutcome::Pass;
    };
    if grades::IN_PROGRESS_REJECT_MARKS.contains(&slot.grade.as_str()) {
        return CheckOutcome::Fail(fail.to_string());
    }
    if matches!(slot.term.id(), Some(id) if id > ctx.current_term) {
        return CheckOutcome::Fail(fail.to_string());
    }
    CheckOutcome::Pass
}

fn grade_of<'a>(ctx: &EvalContext<'a>, prefix: &str) -> &'a str {
    ctx.slots
        .iter()
        .find(|s| matches_requirement(&s.name, prefix))
        .map(|s| s.grade.as_str())
        .unwrap_or("")
}

fn combined_count(ctx: &EvalContext<'_>, prefixes: &[String]) -> u32 {
    count_completed(ctx.slots, prefixes) + count_enrolled(ctx.slots, prefixes, ctx.current_term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use elig_catalog::policies::{
        computer_science_policy, data_science_policy, statistics_policy,
    };

    const CURRENT: TermId = TermId(2262);
    const NO_MAJORS: &[String] = &[];

    fn slot(name: &str, course: &str, grade: &str, term: TermValue) -> RequirementSlot {
        RequirementSlot {
            name: name.to_string(),
            course: course.to_string(),
            grade: grade.to_string(),
            term,
            units: 4.0,
            verified: true,
        }
    }

    fn done(name: &str, course: &str, grade: &str) -> RequirementSlot {
        slot(name, course, grade, TermValue::Id(TermId(2252)))
    }

    fn planned(name: &str, course: &str) -> RequirementSlot {
        slot(name, course, "PL", TermValue::Id(CURRENT))
    }

    fn ctx<'a>(
        slots: &'a [RequirementSlot],
        applicant_type: ApplicantKind,
        terms: u32,
        major_gpa: Option<f64>,
    ) -> EvalContext<'a> {
        EvalContext {
            slots,
            current_term: CURRENT,
            applicant_type,
            terms_in_attendance: terms,
            reported_majors: NO_MAJORS,
            major_gpa,
        }
    }

    fn ds_lower_division() -> Vec<RequirementSlot> {
        vec![
            done("LD #1 Calc 1", "MATH 1A", "A"),
            done("LD #2 Calc 2", "MATH 1B", "A-"),
            done("LD #4 LinAlg", "MATH 54", "B+"),
            done("LD #5 DSc8", "DATA 8", "B"),
            done("LD #6 CS1", "COMPSCI 61A", "B+"),
            done("LD #7 CS2", "COMPSCI 61B", "B"),
            planned("LD #10 DE", "DATA 104"),
        ]
    }

    #[test]
    fn test_ds_gate_failure_is_ineligible() {
        let policy = data_science_policy();
        let mut slots = ds_lower_division();
        slots[3].grade = "NP".to_string();
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, None));
        assert_eq!(verdict, Verdict::Ineligible("LD 5 is not passing".to_string()));
    }

    #[test]
    fn test_ds_first_year_needs_three_combined() {
        let policy = data_science_policy();
        let slots = vec![
            done("LD #1 Calc 1", "MATH 1A", "A"),
            done("LD #5 DSc8", "DATA 8", "B"),
            planned("LD #6 CS1", "COMPSCI 61A"),
        ];
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, None));
        assert!(verdict.is_eligible(), "{verdict}");

        // the same progress is not enough for a second year
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 4, None));
        assert!(verdict.is_ineligible(), "{verdict}");
    }

    #[test]
    fn test_ds_third_year_needs_all_seven() {
        let policy = data_science_policy();
        let slots = ds_lower_division();
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 6, None));
        assert!(verdict.is_eligible(), "{verdict}");

        let six = &slots[..6];
        let verdict = evaluate(&policy, &ctx(six, ApplicantKind::FirstYear, 6, None));
        assert!(verdict.is_ineligible(), "{verdict}");
    }

    #[test]
    fn test_ds_too_many_terms() {
        let policy = data_science_policy();
        let slots = ds_lower_division();
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 7, None));
        assert_eq!(
            verdict,
            Verdict::Ineligible("too many terms in attendance (7 terms)".to_string())
        );
    }

    #[test]
    fn test_ds_transfer_one_short_is_conditional() {
        let policy = data_science_policy();
        let slots = ds_lower_division();
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::Transfer, 2, None));
        assert!(verdict.is_eligible(), "{verdict}");

        let six = &slots[..6];
        let verdict = evaluate(&policy, &ctx(six, ApplicantKind::Transfer, 2, None));
        assert!(matches!(&verdict, Verdict::Conditional(reason)
            if reason.contains("summer course")));

        let five = &slots[..5];
        let verdict = evaluate(&policy, &ctx(five, ApplicantKind::Transfer, 2, None));
        assert!(verdict.is_ineligible(), "{verdict}");
    }

    #[test]
    fn test_cs_transfers_are_ineligible() {
        let policy = computer_science_policy();
        let slots = ds_lower_division();
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::Transfer, 2, Some(4.0)));
        assert!(matches!(&verdict, Verdict::Ineligible(reason)
            if reason.contains("transfer applicants")));
    }

    fn cs_slots() -> Vec<RequirementSlot> {
        vec![
            done("LD #1 Calc 1", "MATH 1A", "A"),
            done("LD #2 Calc 2", "MATH 1B", "A-"),
            done("LD #4 LinAlg", "MATH 54", "B+"),
            done("LD #6 CS1", "COMPSCI 61A", "A"),
            planned("LD #7 CS2", "COMPSCI 61B"),
            planned("LD #9 CS3", "COMPSCI 70"),
        ]
    }

    #[test]
    fn test_cs_first_year_full_pass() {
        let policy = computer_science_policy();
        let slots = cs_slots();
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, Some(3.5)));
        assert!(verdict.is_eligible(), "{verdict}");
    }

    #[test]
    fn test_cs_other_term_needs_manual_review() {
        let policy = computer_science_policy();
        let mut slots = cs_slots();
        slots[2].term = TermValue::Text("Other".to_string());
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, Some(3.5)));
        assert_eq!(
            verdict,
            Verdict::Conditional("manual review needed for LD 4".to_string())
        );
    }

    #[test]
    fn test_cs_physics_course_requires_physics_major() {
        let policy = computer_science_policy();
        let mut slots = cs_slots();
        slots[2].course = "PHYSICS 89".to_string();

        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, Some(3.5)));
        assert!(matches!(&verdict, Verdict::Ineligible(reason)
            if reason.contains("PHYSICS 89")));

        let majors = vec!["Physics BA".to_string()];
        let mut with_major = ctx(&slots, ApplicantKind::FirstYear, 2, Some(3.5));
        with_major.reported_majors = &majors;
        assert!(evaluate(&policy, &with_major).is_eligible());
    }

    #[test]
    fn test_cs_future_ld4_fails() {
        let policy = computer_science_policy();
        let mut slots = cs_slots();
        slots[2].term = TermValue::Id(TermId(2268));
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, Some(3.5)));
        assert!(matches!(&verdict, Verdict::Ineligible(reason)
            if reason.contains("LD 4")));
    }

    #[test]
    fn test_cs_gpa_floor_conditional_with_courses_in_progress() {
        let policy = computer_science_policy();
        let slots = cs_slots();

        // LD 7 and LD 9 are enrolled this term
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, Some(2.8)));
        assert_eq!(
            verdict,
            Verdict::Conditional("major GPA below 3.0 with courses in progress".to_string())
        );

        // nothing underway: all three of LD 6, 7, 9 completed
        let settled = vec![
            done("LD #1 Calc 1", "MATH 1A", "A"),
            done("LD #2 Calc 2", "MATH 1B", "A-"),
            done("LD #4 LinAlg", "MATH 54", "B+"),
            done("LD #6 CS1", "COMPSCI 61A", "C+"),
            done("LD #7 CS2", "COMPSCI 61B", "C"),
            done("LD #9 CS3", "COMPSCI 70", "C"),
        ];
        let verdict = evaluate(&policy, &ctx(&settled, ApplicantKind::FirstYear, 2, Some(2.8)));
        assert_eq!(
            verdict,
            Verdict::Ineligible("major GPA below 3.0".to_string())
        );
    }

    #[test]
    fn test_st_third_year_accepts_planned_probability() {
        let policy = statistics_policy();
        let mut slots = vec![
            done("LD #1 Calc 1", "MATH 1A", "A"),
            done("LD #2 Calc 2", "MATH 1B", "B+"),
            done("LD #5 DSc8", "STAT 20", "B"),
            done("LD #3 Multi", "MATH 53", "B"),
            planned("LD #4 LinAlg", "MATH 54"),
            planned("ST UD#2", "STAT 134"),
        ];
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 5, None));
        assert!(verdict.is_eligible(), "{verdict}");

        slots[5].grade = "NP".to_string();
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 5, None));
        assert!(matches!(&verdict, Verdict::Ineligible(reason)
            if reason.contains("probability")));
    }

    #[test]
    fn test_st_transfer_track() {
        let policy = statistics_policy();
        let slots = vec![
            done("LD #1 Calc 1", "MATH 1A", "A"),
            done("LD #2 Calc 2", "MATH 1B", "B+"),
            done("LD #5 DSc8", "STAT 20", "B"),
            done("LD #3 Multi", "MATH 53", "B"),
            planned("LD #4 LinAlg", "MATH 54"),
        ];
        // no terms ceiling for statistics transfers
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::Transfer, 9, None));
        assert!(verdict.is_eligible(), "{verdict}");

        let missing_ld2 = vec![
            done("LD #1 Calc 1", "MATH 1A", "A"),
            done("LD #5 DSc8", "STAT 20", "B"),
            done("LD #3 Multi", "MATH 53", "B"),
            planned("LD #4 LinAlg", "MATH 54"),
        ];
        let verdict = evaluate(&policy, &ctx(&missing_ld2, ApplicantKind::Transfer, 2, None));
        assert!(matches!(&verdict, Verdict::Ineligible(reason)
            if reason.contains("LD 1 and LD 2")));
    }

    #[test]
    fn test_unverifiable_current_term_claim_fails_gate() {
        let policy = data_science_policy();
        let mut slots = ds_lower_division();
        slots[3].grade = grades::no_record_marker(CURRENT);
        let verdict = evaluate(&policy, &ctx(&slots, ApplicantKind::FirstYear, 2, None));
        assert_eq!(verdict, Verdict::Ineligible("LD 5 is not passing".to_string()));
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Eligible.to_string(), "Eligible");
        assert_eq!(
            Verdict::Conditional("reason".to_string()).to_string(),
            "Conditional: reason"
        );
        assert_eq!(
            Verdict::Ineligible("reason".to_string()).to_string(),
            "Ineligible: reason"
        );
    }
}
