//! Identity verification between an application and the student record

use std::fmt;

use serde::{Deserialize, Serialize};

use elig_terms::{TermId, TermValue};

use crate::roster::ReportedIdentity;
use crate::source::StudentProfile;

/// Identity field checked against the student record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityField {
    FirstTerm,
    GraduationTerm,
    Gpa,
    College,
    Major,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IdentityField::FirstTerm => "first term",
            IdentityField::GraduationTerm => "graduation term",
            IdentityField::Gpa => "gpa",
            IdentityField::College => "college",
            IdentityField::Major => "major",
        };
        f.write_str(name)
    }
}

/// A reported identity value that does not match the student record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub field: IdentityField,
    pub reported: String,
    pub actual: String,
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: reported {}, record shows {}",
            self.field, self.reported, self.actual
        )
    }
}

/// Check every reported identity field against the student record and
/// return the fields that could not be verified.
pub fn verify_identity(
    identity: &ReportedIdentity,
    profile: &StudentProfile,
    admit_term: Option<TermId>,
    gpa_tolerance: f64,
) -> Vec<Discrepancy> {
    let mut discrepancies = Vec::new();
    let mut flag = |field, reported: String, actual: String| {
        discrepancies.push(Discrepancy {
            field,
            reported,
            actual,
        });
    };

    if !first_term_matches(identity.first_term.as_ref(), admit_term) {
        flag(
            IdentityField::FirstTerm,
            render(identity.first_term.as_ref()),
            render(admit_term.as_ref()),
        );
    }

    if !graduation_matches(identity.graduation_term.as_ref(), profile.expected_graduation) {
        flag(
            IdentityField::GraduationTerm,
            render(identity.graduation_term.as_ref()),
            render(profile.expected_graduation.as_ref()),
        );
    }

    if !gpa_matches(identity.gpa.as_deref(), profile.gpa, gpa_tolerance) {
        flag(
            IdentityField::Gpa,
            render(identity.gpa.as_ref()),
            render(profile.gpa.as_ref()),
        );
    }

    if !college_matches(identity.college.as_deref(), &profile.colleges) {
        flag(
            IdentityField::College,
            identity.college.clone().unwrap_or_default(),
            profile.colleges.join(", "),
        );
    }

    if !major_matches(&identity.majors, &profile.majors) {
        flag(
            IdentityField::Major,
            identity.majors.join(", "),
            profile.majors.join(", "),
        );
    }

    discrepancies
}

/// The reported first term must be the admit term, or the admit term
/// pushed to the following fall when the student was admitted in summer.
fn first_term_matches(reported: Option<&TermValue>, admit: Option<TermId>) -> bool {
    match (reported, admit) {
        (Some(TermValue::Id(id)), Some(admit)) => *id == admit || *id == admit.folded_to_fall(),
        _ => false,
    }
}

fn graduation_matches(reported: Option<&TermValue>, actual: Option<TermId>) -> bool {
    match (reported, actual) {
        (None, None) => true,
        (Some(TermValue::Id(id)), Some(egt)) => *id == egt,
        _ => false,
    }
}

/// A reported GPA that does not parse always flags; an absent actual GPA
/// never does.
fn gpa_matches(reported: Option<&str>, actual: Option<f64>, tolerance: f64) -> bool {
    let Some(reported) = reported.and_then(|r| r.trim().parse::<f64>().ok()) else {
        return false;
    };
    match actual {
        Some(actual) => (reported - actual).abs() <= tolerance,
        None => true,
    }
}

/// Lowercase, expand the first `clg` and `&`, and strip everything that is
/// not alphanumeric. Both sides of a containment check go through this.
fn canonicalize(value: &str) -> String {
    let mut canon = value.to_lowercase();
    canon = canon.replacen("clg", "college", 1);
    canon = canon.replacen('&', "and", 1);
    canon.retain(|c| c.is_ascii_alphanumeric());
    canon
}

fn mutually_contains(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn college_matches(reported: Option<&str>, actual: &[String]) -> bool {
    let actual: Vec<String> = actual.iter().map(|c| canonicalize(c)).collect();
    reported.unwrap_or("").split(',').all(|part| {
        let part = canonicalize(part);
        actual.iter().any(|act| mutually_contains(act, &part))
    })
}

fn major_matches(reported: &[String], actual: &[String]) -> bool {
    let reported: Vec<&str> = reported
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .collect();
    // "Undeclared" listed next to an intended major is a known reporting
    // pattern, not a mismatch
    let has_undeclared = reported
        .iter()
        .any(|m| m.to_lowercase().contains("undeclared"));
    if has_undeclared && reported.len() > 1 {
        return true;
    }
    let actual: Vec<String> = actual.iter().map(|m| canonicalize(m)).collect();
    reported.iter().all(|rep| {
        let rep = canonicalize(rep);
        actual.iter().any(|act| mutually_contains(act, &rep))
    })
}

fn render<T: fmt::Display>(value: Option<&T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ReportedIdentity {
        ReportedIdentity {
            first_term: Some(TermValue::Id(TermId(2248))),
            graduation_term: Some(TermValue::Id(TermId(2302))),
            gpa: Some("3.80".to_string()),
            college: Some("College of Letters & Science".to_string()),
            majors: vec!["Letters & Sci Undeclared".to_string()],
        }
    }

    fn profile() -> StudentProfile {
        StudentProfile {
            gpa: Some(3.84),
            expected_graduation: Some(TermId(2302)),
            terms_in_attendance: Some(4),
            majors: vec!["Letters & Sci Undeclared UG".to_string()],
            colleges: vec!["Clg of Letters & Science".to_string()],
        }
    }

    #[test]
    fn test_matching_identity_has_no_discrepancies() {
        let flags = verify_identity(&identity(), &profile(), Some(TermId(2248)), 0.05);
        assert!(flags.is_empty(), "{flags:?}");
    }

    #[test]
    fn test_summer_admit_folds_to_fall() {
        let mut reported = identity();
        reported.first_term = Some(TermValue::Id(TermId(2248)));
        let flags = verify_identity(&reported, &profile(), Some(TermId(2245)), 0.05);
        assert!(!flags.iter().any(|d| d.field == IdentityField::FirstTerm));

        // a non-summer admit does not fold
        let flags = verify_identity(&reported, &profile(), Some(TermId(2242)), 0.05);
        assert!(flags.iter().any(|d| d.field == IdentityField::FirstTerm));
    }

    #[test]
    fn test_gpa_tolerance_boundary() {
        // delta of 0.06 flags
        let mut reported = identity();
        reported.gpa = Some("3.78".to_string());
        let flags = verify_identity(&reported, &profile(), Some(TermId(2248)), 0.05);
        assert!(flags.iter().any(|d| d.field == IdentityField::Gpa));

        // delta of 0.05 passes
        reported.gpa = Some("3.79".to_string());
        let flags = verify_identity(&reported, &profile(), Some(TermId(2248)), 0.05);
        assert!(!flags.iter().any(|d| d.field == IdentityField::Gpa));
    }

    #[test]
    fn test_unparseable_gpa_flags_even_without_actual() {
        let mut reported = identity();
        reported.gpa = Some("three point eight".to_string());
        let mut actual = profile();
        actual.gpa = None;
        let flags = verify_identity(&reported, &actual, Some(TermId(2248)), 0.05);
        assert!(flags.iter().any(|d| d.field == IdentityField::Gpa));

        // a parseable report with no actual GPA passes
        reported.gpa = Some(" 3.80 ".to_string());
        let flags = verify_identity(&reported, &actual, Some(TermId(2248)), 0.05);
        assert!(!flags.iter().any(|d| d.field == IdentityField::Gpa));
    }

    #[test]
    fn test_college_synonyms_verify() {
        let mut reported = identity();
        reported.college = Some("Clg of Letters and Science".to_string());
        let flags = verify_identity(&reported, &profile(), Some(TermId(2248)), 0.05);
        assert!(!flags.iter().any(|d| d.field == IdentityField::College));
    }

    #[test]
    fn test_empty_actual_colleges_flag() {
        let mut actual = profile();
        actual.colleges = Vec::new();
        let flags = verify_identity(&identity(), &actual, Some(TermId(2248)), 0.05);
        assert!(flags.iter().any(|d| d.field == IdentityField::College));
    }

    #[test]
    fn test_undeclared_with_second_major_skips_check() {
        let mut reported = identity();
        reported.majors = vec!["Undeclared".to_string(), "Data Science".to_string()];
        let mut actual = profile();
        actual.majors = vec!["Chemistry UG".to_string()];
        let flags = verify_identity(&reported, &actual, Some(TermId(2248)), 0.05);
        assert!(!flags.iter().any(|d| d.field == IdentityField::Major));

        // undeclared alone still has to match
        reported.majors = vec!["Undeclared".to_string()];
        let flags = verify_identity(&reported, &actual, Some(TermId(2248)), 0.05);
        assert!(flags.iter().any(|d| d.field == IdentityField::Major));
    }

    #[test]
    fn test_empty_reported_majors_verify() {
        let mut reported = identity();
        reported.majors = vec!["  ".to_string()];
        let flags = verify_identity(&reported, &profile(), Some(TermId(2248)), 0.05);
        assert!(!flags.iter().any(|d| d.field == IdentityField::Major));
    }

    #[test]
    fn test_missing_graduation_on_both_sides_verifies() {
        let mut reported = identity();
        reported.graduation_term = None;
        let mut actual = profile();
        actual.expected_graduation = None;
        let flags = verify_identity(&reported, &actual, Some(TermId(2248)), 0.05);
        assert!(!flags.iter().any(|d| d.field == IdentityField::GraduationTerm));

        // one side present flags
        actual.expected_graduation = Some(TermId(2302));
        let flags = verify_identity(&reported, &actual, Some(TermId(2248)), 0.05);
        assert!(flags.iter().any(|d| d.field == IdentityField::GraduationTerm));
    }

    #[test]
    fn test_missing_admit_term_flags_first_term() {
        let flags = verify_identity(&identity(), &profile(), None, 0.05);
        let flag = flags
            .iter()
            .find(|d| d.field == IdentityField::FirstTerm)
            .unwrap();
        assert_eq!(flag.actual, "none");
        assert_eq!(flag.reported, "2248");
    }
}
