//! Roster ingestion
//!
//! The roster is a JSON array of applications. Each application carries
//! the applicant's reported identity fields, ordered major choices, and
//! requirement slots to reconcile against the student record.

use std::path::Path;

use serde::{Deserialize, Serialize};

use elig_terms::TermValue;

use crate::CoreResult;

/// Applicant population, which selects the policy track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplicantKind {
    FirstYear,
    Transfer,
}

/// Identity fields as the applicant reported them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportedIdentity {
    /// First term in attendance
    #[serde(default)]
    pub first_term: Option<TermValue>,
    /// Expected graduation term
    #[serde(default)]
    pub graduation_term: Option<TermValue>,
    /// Cumulative GPA, free text
    #[serde(default)]
    pub gpa: Option<String>,
    /// Current college(s), comma separated
    #[serde(default)]
    pub college: Option<String>,
    /// Currently declared majors
    #[serde(default)]
    pub majors: Vec<String>,
}

/// One reported requirement row. Reconciliation rewrites the grade, term,
/// and units fields in place and sets the verified flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementSlot {
    /// Requirement name, e.g. `"LD #5"`
    pub name: String,
    /// Reported course, normalized to `<DEPT> <NUM>` at ingestion
    pub course: String,
    /// Reported grade, or `PL` for a planned course
    #[serde(default)]
    pub grade: String,
    /// Reported term: a term code, or text such as `Transfer`
    pub term: TermValue,
    /// Units from the enrollment record; 0 until reconciled
    #[serde(default)]
    pub units: f64,
    /// Set when an enrollment record confirmed this slot
    #[serde(default)]
    pub verified: bool,
}

/// One student's application as ingested from the roster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Application {
    pub sid: String,
    pub applicant_type: ApplicantKind,
    #[serde(default)]
    pub identity: ReportedIdentity,
    /// Majors applied to, in preference order
    #[serde(default)]
    pub major_choices: Vec<String>,
    /// First-choice domain emphasis, where the major has one
    #[serde(default)]
    pub domain_emphasis: Option<String>,
    #[serde(default)]
    pub slots: Vec<RequirementSlot>,
}

/// Load a roster from a JSON file. Malformed JSON is fatal.
pub fn load_roster(path: &Path) -> CoreResult<Vec<Application>> {
    let data = std::fs::read_to_string(path)?;
    let roster = serde_json::from_str(&data)?;
    Ok(roster)
}
