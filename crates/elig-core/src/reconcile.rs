//! Reconciliation of reported requirement slots against enrollment history
//!
//! Each slot carries the course, grade, and term the applicant reported.
//! Reconciliation walks the authoritative attempts for that course and
//! either confirms the slot, corrects it toward the records system, or
//! marks it unverifiable.

use elig_catalog::{departments, grades};
use elig_terms::{TermId, TermValue};

use crate::normalize::is_transfer_text;
use crate::roster::RequirementSlot;
use crate::source::EnrollmentHistory;

/// Reconcile every slot in place against the enrollment history.
///
/// Up to three attempts are checked per course, under the course name and
/// its `X`-prefixed fall-program variant. An incomplete on record wins
/// outright, a current-term enrollment forces the slot to a planned mark
/// at the current term, and otherwise a grade match confirms the slot and
/// corrects its term. Unmatched slots keep zero units and get a marker,
/// the highest grade the records system saw instead, or `NA`.
///
/// Returns the names of the slots that could not be verified.
pub fn reconcile_slots(
    slots: &mut [RequirementSlot],
    history: &EnrollmentHistory,
    current_term: TermId,
) -> Vec<String> {
    let mut unverified = Vec::new();

    for slot in slots.iter_mut() {
        if should_skip(slot, current_term) {
            continue;
        }

        let mut matched = false;
        let mut units_found = 0.0;
        let mut observed: Vec<String> = Vec::new();

        'attempts: for rank in 1..=3 {
            for name in [slot.course.clone(), format!("X{}", slot.course)] {
                let Some(record) = history.attempt(&name, rank) else {
                    continue;
                };

                if record.grade == grades::INCOMPLETE {
                    slot.grade = grades::INCOMPLETE.to_string();
                    matched = true;
                    break 'attempts;
                }

                // an enrollment in the current term counts regardless of
                // what the applicant reported
                if record.term == current_term {
                    units_found = record.units;
                    if slot.term != TermValue::Id(current_term) || slot.grade != grades::PLANNED {
                        slot.term = TermValue::Id(current_term);
                        slot.grade = grades::PLANNED.to_string();
                    }
                    matched = true;
                    break 'attempts;
                }

                let on_record = record.grade.to_uppercase();
                observed.push(on_record.clone());
                if on_record.eq_ignore_ascii_case(&slot.grade) {
                    units_found = record.units;
                    if slot.term != TermValue::Id(record.term) {
                        slot.term = TermValue::Id(record.term);
                    }
                    matched = true;
                    break 'attempts;
                }
            }
        }

        slot.units = units_found;
        if matched {
            slot.verified = true;
            continue;
        }

        unverified.push(slot.name.clone());
        if slot.term == TermValue::Id(current_term) {
            slot.grade = grades::no_record_marker(current_term);
        } else if observed.is_empty() {
            slot.grade = grades::NOT_AVAILABLE.to_string();
        } else if let Some(best) = grades::highest(&observed) {
            slot.grade = best.to_string();
        }
    }

    unverified
}

/// Slots that never reconcile: future terms, transfer credit, test
/// scores, and placeholder rows.
fn should_skip(slot: &RequirementSlot, current_term: TermId) -> bool {
    if matches!(slot.term, TermValue::Id(id) if id > current_term) {
        return true;
    }
    if matches!(&slot.term, TermValue::Text(t) if t == "Test Score" || is_transfer_text(t)) {
        return true;
    }
    slot.course.is_empty()
        || is_transfer_text(&slot.course)
        || slot.course.eq_ignore_ascii_case("other")
        || departments::is_test_score_course(&slot.course)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EnrollmentRecord;

    fn slot(name: &str, course: &str, grade: &str, term: TermValue) -> RequirementSlot {
        RequirementSlot {
            name: name.to_string(),
            course: course.to_string(),
            grade: grade.to_string(),
            term,
            units: 0.0,
            verified: false,
        }
    }

    fn history(entries: &[(&str, u16, &str, f64)]) -> EnrollmentHistory {
        let mut history = EnrollmentHistory::default();
        for (course, term, grade, units) in entries {
            history
                .courses
                .entry(course.to_string())
                .or_default()
                .push(EnrollmentRecord {
                    term: TermId(*term),
                    grade: grade.to_string(),
                    units: *units,
                });
        }
        history
    }

    #[test]
    fn test_grade_match_confirms_and_corrects_term() {
        let mut slots = vec![slot("LD #1", "MATH 1A", "A-", TermValue::Id(TermId(2248)))];
        let history = history(&[("MATH 1A", 2252, "A-", 4.0)]);

        let unverified = reconcile_slots(&mut slots, &history, TermId(2262));
        assert!(unverified.is_empty());
        assert!(slots[0].verified);
        assert_eq!(slots[0].term, TermValue::Id(TermId(2252)));
        assert_eq!(slots[0].units, 4.0);
        assert_eq!(slots[0].grade, "A-");
    }

    #[test]
    fn test_current_enrollment_forces_planned_mark() {
        let mut slots = vec![slot("LD #2", "COMPSCI 61A", "B+", TermValue::Id(TermId(2258)))];
        let history = history(&[("COMPSCI 61A", 2262, "ENROLLED BUT NO GRADE", 4.0)]);

        reconcile_slots(&mut slots, &history, TermId(2262));
        assert!(slots[0].verified);
        assert_eq!(slots[0].grade, "PL");
        assert_eq!(slots[0].term, TermValue::Id(TermId(2262)));
        assert_eq!(slots[0].units, 4.0);
    }

    #[test]
    fn test_incomplete_wins_without_units() {
        let mut slots = vec![slot("LD #4", "MATH 54", "B", TermValue::Id(TermId(2252)))];
        let history = history(&[("MATH 54", 2252, "I", 4.0)]);

        reconcile_slots(&mut slots, &history, TermId(2262));
        assert!(slots[0].verified);
        assert_eq!(slots[0].grade, "I");
        assert_eq!(slots[0].units, 0.0);
        assert_eq!(slots[0].term, TermValue::Id(TermId(2252)));
    }

    #[test]
    fn test_fall_program_variant_matches() {
        let mut slots = vec![slot("LD #1", "MATH 1A", "B", TermValue::Id(TermId(2248)))];
        let history = history(&[("XMATH 1A", 2248, "B", 4.0)]);

        reconcile_slots(&mut slots, &history, TermId(2262));
        assert!(slots[0].verified);
        assert_eq!(slots[0].units, 4.0);
    }

    #[test]
    fn test_unmatched_takes_highest_observed_grade() {
        let mut slots = vec![slot("LD #5", "DATA 8", "A", TermValue::Id(TermId(2252)))];
        let history = history(&[("DATA 8", 2258, "B", 4.0), ("DATA 8", 2252, "C+", 4.0)]);

        let unverified = reconcile_slots(&mut slots, &history, TermId(2262));
        assert_eq!(unverified, vec!["LD #5".to_string()]);
        assert!(!slots[0].verified);
        assert_eq!(slots[0].grade, "B");
        assert_eq!(slots[0].units, 0.0);
    }

    #[test]
    fn test_unmatched_with_no_record_becomes_na() {
        let mut slots = vec![slot("LD #6", "PHYSICS 7A", "B", TermValue::Id(TermId(2252)))];
        let history = history(&[]);

        let unverified = reconcile_slots(&mut slots, &history, TermId(2262));
        assert_eq!(unverified, vec!["LD #6".to_string()]);
        assert_eq!(slots[0].grade, "NA");
    }

    #[test]
    fn test_unmatched_current_term_gets_marker() {
        let mut slots = vec![slot("LD #7", "STAT 134", "PL", TermValue::Id(TermId(2262)))];
        let history = history(&[]);

        reconcile_slots(&mut slots, &history, TermId(2262));
        assert_eq!(slots[0].grade, "No enrollment record for 2262");
        assert!(grades::is_no_record_marker(&slots[0].grade));
    }

    #[test]
    fn test_skip_rules_leave_slots_untouched() {
        let mut slots = vec![
            slot("LD #1", "MATH 1A", "A", TermValue::Id(TermId(2268))),
            slot("LD #2", "CALC BC", "5", TermValue::Text("Test Score".to_string())),
            slot("LD #3", "transfer algebra", "A", TermValue::Text("Transfer".to_string())),
            slot("LD #4", "", "", TermValue::Id(TermId(2252))),
            slot("LD #5", "Other", "A", TermValue::Id(TermId(2252))),
            slot("LD #6", "HL MATH", "7", TermValue::Id(TermId(2252))),
        ];
        let history = history(&[]);

        let unverified = reconcile_slots(&mut slots, &history, TermId(2262));
        assert!(unverified.is_empty());
        for slot in &slots {
            assert!(!slot.verified);
            assert_eq!(slot.units, 0.0);
        }
        assert_eq!(slots[1].grade, "5");
    }

    #[test]
    fn test_earlier_attempt_wins_over_later_rank() {
        // rank 1 is the most recent attempt; its mismatching grade is
        // recorded before rank 2 matches
        let mut slots = vec![slot("LD #1", "MATH 1B", "C", TermValue::Id(TermId(2242)))];
        let history = history(&[("MATH 1B", 2248, "W", 0.0), ("MATH 1B", 2242, "C", 4.0)]);

        reconcile_slots(&mut slots, &history, TermId(2262));
        assert!(slots[0].verified);
        assert_eq!(slots[0].grade, "C");
        assert_eq!(slots[0].units, 4.0);
    }
}
