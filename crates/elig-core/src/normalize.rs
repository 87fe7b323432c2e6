//! Course identifier normalization
//!
//! Folds free-text course names from applications into the canonical
//! `<DEPT> <NUM>` form used by enrollment records and approved-course
//! tables. Normalization is total: input that does not look like a course
//! passes through after basic cleanup.

use once_cell::sync::Lazy;
use regex::Regex;

use elig_catalog::departments;
use elig_terms::TermValue;

use crate::roster::RequirementSlot;

static CROSS_LISTING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:DATA|CS|COMPSCI)\s?/\s?(?:STAT|DATA)\s?").expect("cross-listing pattern")
});

// Lazy department span so the optional C/N/W number prefix stays out of it
static DEPT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z\s&]+?)(\s*[CNW]?\s*\d)").expect("department span pattern"));

static DEPT_NUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z]+)\s*[CNW]?\s*(\d\S*)").expect("course split pattern"));

/// Normalize one course name to `<DEPT> <NUM>`.
///
/// Cross-listed DATA prefixes collapse to `DATA`, department shorthand is
/// rewritten through the catalog table, whitespace inside multi-word
/// departments is removed, and a C/N/W prefix on the course number is
/// dropped. The number truncates at the first non-alphanumeric character.
pub fn normalize_course(name: &str) -> String {
    let mut course = name.trim().to_uppercase();
    course.retain(|c| c != '(' && c != ')');
    course = CROSS_LISTING.replace(&course, "DATA ").into_owned();

    if let Some(rewritten) = departments::rewrite_department(&course) {
        course = rewritten;
    }

    if let Some(caps) = DEPT_SPAN.captures(&course) {
        if let (Some(dept), Some(rest)) = (caps.get(1), caps.get(2)) {
            let collapsed: String = dept.as_str().split_whitespace().collect();
            course = format!("{collapsed}{}", &course[rest.start()..]);
        }
    }

    if let Some(caps) = DEPT_NUM.captures(&course) {
        let dept = &caps[1];
        let num: String = caps[2]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        return format!("{dept} {num}");
    }

    course.trim().to_string()
}

/// Normalize the course field of every slot in place. Slots mentioning a
/// transfer course are left as reported so the transfer text survives for
/// the skip rules downstream.
pub fn normalize_slots(slots: &mut [RequirementSlot]) {
    for slot in slots {
        if slot.course.is_empty() {
            continue;
        }
        let transfer_term = matches!(&slot.term, TermValue::Text(t) if is_transfer_text(t));
        if is_transfer_text(&slot.course) || transfer_term {
            continue;
        }
        slot.course = normalize_course(&slot.course);
    }
}

pub(crate) fn is_transfer_text(value: &str) -> bool {
    value.to_ascii_lowercase().contains("transfer")
}

#[cfg(test)]
mod tests {
    use super::*;
    use elig_terms::TermId;
    use proptest::prelude::*;

    #[test]
    fn test_department_shorthand_rewrites() {
        assert_eq!(normalize_course("CS 61A"), "COMPSCI 61A");
        assert_eq!(normalize_course("compsci 61a"), "COMPSCI 61A");
        assert_eq!(normalize_course("EE 16A"), "EECS 16A");
        assert_eq!(normalize_course("Stats 134"), "STAT 134");
        assert_eq!(normalize_course("eco 1"), "ECON 1");
    }

    #[test]
    fn test_shorthand_needs_a_boundary() {
        assert_eq!(normalize_course("CSE 100"), "CSE 100");
        assert_eq!(normalize_course("EECS 16A"), "EECS 16A");
        assert_eq!(normalize_course("BIOLOGY 1A"), "BIOLOGY 1A");
    }

    #[test]
    fn test_cross_listing_collapses_to_data() {
        assert_eq!(normalize_course("DATA/STAT C8"), "DATA 8");
        assert_eq!(normalize_course("CS / DATA C88C"), "DATA 88C");
    }

    #[test]
    fn test_multi_word_departments_collapse() {
        assert_eq!(normalize_course("IND ENG 115"), "INDENG 115");
        assert_eq!(normalize_course("POL SCI 3"), "POLSCI 3");
    }

    #[test]
    fn test_number_prefix_and_punctuation() {
        assert_eq!(normalize_course("Math (1A)"), "MATH 1A");
        assert_eq!(normalize_course("STAT C140"), "STAT 140");
        assert_eq!(normalize_course("PHILOS W12A"), "PHILOS 12A");
        assert_eq!(normalize_course("INFO 190-1"), "INFO 190");
    }

    #[test]
    fn test_non_courses_pass_through() {
        assert_eq!(normalize_course("  independent study "), "INDEPENDENT STUDY");
        assert_eq!(normalize_course("A-Level Further Math"), "A-LEVEL FURTHER MATH");
        assert_eq!(normalize_course("HL Math"), "HL MATH");
        assert_eq!(normalize_course(""), "");
    }

    #[test]
    fn test_normalize_slots_skips_transfer_rows() {
        let mut slots = vec![
            RequirementSlot {
                name: "LD #1".to_string(),
                course: "cs 61a".to_string(),
                grade: "A".to_string(),
                term: TermValue::Id(TermId(2252)),
                units: 0.0,
                verified: false,
            },
            RequirementSlot {
                name: "LD #4".to_string(),
                course: "transfer linear algebra".to_string(),
                grade: "B".to_string(),
                term: TermValue::Text("Transfer".to_string()),
                units: 0.0,
                verified: false,
            },
        ];
        normalize_slots(&mut slots);
        assert_eq!(slots[0].course, "COMPSCI 61A");
        assert_eq!(slots[1].course, "transfer linear algebra");
    }

    fn arb_course() -> impl Strategy<Value = String> {
        let dept = prop::sample::select(vec![
            "CS", "COMPSCI", "EE", "EECS", "DATA", "STAT", "STATS", "STATISTICS", "MATH",
            "ECON", "ECO", "MCB", "MCELLBI", "PHILOS", "BIOLOGY", "IND ENG", "POL SCI",
            "NUC ENG",
        ]);
        let prefix = prop::sample::select(vec!["", "C", "N", "W"]);
        let suffix = prop::sample::select(vec!["", "A", "B", "AC"]);
        let spacing = prop::sample::select(vec!["", " ", "  "]);
        (dept, prefix, 1u32..200, suffix, spacing, any::<bool>()).prop_map(
            |(dept, prefix, num, suffix, spacing, lower)| {
                let raw = format!("{dept}{spacing} {prefix}{num}{suffix}");
                if lower {
                    raw.to_lowercase()
                } else {
                    raw
                }
            },
        )
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_normalize_is_idempotent(course in arb_course()) {
            let once = normalize_course(&course);
            let twice = normalize_course(&once);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_normalized_courses_split_in_two(course in arb_course()) {
            let normalized = normalize_course(&course);
            prop_assert_eq!(normalized.split(' ').count(), 2);
        }
    }
}
