//! Grade marks and the point scale shared by GPA calculation and
//! highest-grade resolution

/// Placeholder mark for a planned or currently in-progress enrollment
pub const PLANNED: &str = "PL";

/// Mark assigned to a slot with no authoritative record and no observed
/// grades
pub const NOT_AVAILABLE: &str = "NA";

/// Mark the records system reports for an enrollment that has no grade yet
pub const UNGRADED: &str = "ENROLLED BUT NO GRADE";

/// Incomplete mark
pub const INCOMPLETE: &str = "I";

/// Letter grades and their point values, A+ through F
pub const LETTER_POINTS: &[(&str, f64)] = &[
    ("A+", 4.0),
    ("A", 4.0),
    ("A-", 3.7),
    ("B+", 3.3),
    ("B", 3.0),
    ("B-", 2.7),
    ("C+", 2.3),
    ("C", 2.0),
    ("C-", 1.7),
    ("D+", 1.3),
    ("D", 1.0),
    ("D-", 0.7),
    ("F", 0.0),
];

/// Non-letter marks ranked strictly below every letter grade when
/// choosing the highest observed mark
const BELOW_LETTER_MARKS: &[&str] = &["W", "NP", "I", "P", UNGRADED];

/// Marks that do not represent completed credit when counting satisfied
/// requirements. Withdrawals and raw test scores still count.
pub const NON_CREDIT_MARKS: &[&str] = &[PLANNED, "P", "NP", NOT_AVAILABLE, UNGRADED, INCOMPLETE];

/// Marks that do not satisfy a gate requirement: placeholders, pass/fail,
/// incompletes, and anything below a C-
pub const GATE_REJECT_MARKS: &[&str] = &[
    "P",
    "NP",
    PLANNED,
    "D+",
    "D-",
    "D",
    "F",
    NOT_AVAILABLE,
    UNGRADED,
    INCOMPLETE,
];

/// Marks that rule a slot out even when the course may still be in
/// progress. Planned and incomplete enrollments are allowed here.
pub const IN_PROGRESS_REJECT_MARKS: &[&str] = &["P", "NP", "D+", "D-", "D", "F", NOT_AVAILABLE];

/// Pass/no-pass marks surfaced by the problem-grade audit
pub const PASS_NO_PASS_MARKS: &[&str] = &["P", "NP"];

/// Letter grades below the C- threshold surfaced by the problem-grade audit
pub const BELOW_C_MINUS_MARKS: &[&str] = &["D+", "D", "D-", "F"];

/// Point value for a letter grade; `None` for anything not on the scale
pub fn letter_points(mark: &str) -> Option<f64> {
    LETTER_POINTS
        .iter()
        .find(|(letter, _)| *letter == mark)
        .map(|(_, points)| *points)
}

pub fn is_letter(mark: &str) -> bool {
    letter_points(mark).is_some()
}

/// Ranking value used when choosing the highest observed mark. Letters
/// keep their point values, the non-letter markers rank strictly below
/// every letter, and unrecognized marks rank at 0.0.
pub fn rank(mark: &str) -> f64 {
    if let Some(points) = letter_points(mark) {
        return points;
    }
    if BELOW_LETTER_MARKS.contains(&mark) {
        return -1.0;
    }
    0.0
}

/// The highest-ranked mark in the list. Ties keep the first occurrence.
pub fn highest(marks: &[String]) -> Option<&str> {
    let mut best: Option<(&str, f64)> = None;
    for mark in marks {
        let value = rank(mark);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((mark, value)),
        }
    }
    best.map(|(mark, _)| mark)
}

/// Grade-field marker for a slot reported at the current term that has no
/// authoritative enrollment record
pub fn no_record_marker(term: impl std::fmt::Display) -> String {
    format!("No enrollment record for {term}")
}

pub fn is_no_record_marker(mark: &str) -> bool {
    mark.starts_with("No enrollment record for")
}

/// Whether a mark counts as completed credit for requirement counting
pub fn is_credit(mark: &str) -> bool {
    !mark.is_empty() && !NON_CREDIT_MARKS.contains(&mark) && !is_no_record_marker(mark)
}

/// Whether a mark satisfies a gate requirement. The no-record marker is
/// an unverified claim and never passes; an absent slot (empty mark) is
/// not held against the applicant.
pub fn passes_gate(mark: &str) -> bool {
    !GATE_REJECT_MARKS.contains(&mark) && !is_no_record_marker(mark)
}
