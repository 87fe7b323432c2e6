//! Authoritative student records
//!
//! The review engine pulls enrollment history and profile data through the
//! [`RecordSource`] trait. The live implementation talks to the campus
//! gateway; [`FileSource`] serves fixtures for offline runs and tests.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use elig_terms::TermId;

use crate::{CoreError, CoreResult};

/// One authoritative enrollment attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub term: TermId,
    /// Grade mark; the ungraded sentinel when the record carries none
    pub grade: String,
    #[serde(default)]
    pub units: f64,
}

/// Enrollment history for one student
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentHistory {
    /// Cleaned course display name to attempts, most recent term first,
    /// capped at three
    #[serde(default)]
    pub courses: HashMap<String, Vec<EnrollmentRecord>>,
    /// Earliest term with a graded enrollment
    #[serde(default)]
    pub admit_term: Option<TermId>,
}

impl EnrollmentHistory {
    /// Attempt by course name and 1-based recency rank
    pub fn attempt(&self, course: &str, rank: usize) -> Option<&EnrollmentRecord> {
        self.courses
            .get(course)
            .and_then(|attempts| attempts.get(rank - 1))
    }
}

/// Identity snapshot from the student record. All fields are empty when
/// the undergraduate career row is absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default)]
    pub gpa: Option<f64>,
    #[serde(default)]
    pub expected_graduation: Option<TermId>,
    #[serde(default)]
    pub terms_in_attendance: Option<u32>,
    #[serde(default)]
    pub majors: Vec<String>,
    #[serde(default)]
    pub colleges: Vec<String>,
}

/// Where authoritative student records come from
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Enrollment history for a student id
    async fn enrollment_history(&self, sid: &str) -> CoreResult<EnrollmentHistory>;

    /// Profile snapshot for a student id
    async fn student_profile(&self, sid: &str) -> CoreResult<StudentProfile>;
}

/// Both record lookups for one student, as stored in fixture files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRecord {
    #[serde(default)]
    pub history: EnrollmentHistory,
    #[serde(default)]
    pub profile: StudentProfile,
}

/// Record source backed by a JSON fixture keyed by student id
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    records: HashMap<String, StudentRecord>,
}

impl FileSource {
    pub fn new(records: HashMap<String, StudentRecord>) -> Self {
        Self { records }
    }

    /// Load records from a JSON file of `{ sid: record }`
    pub fn load(path: &Path) -> CoreResult<Self> {
        let data = std::fs::read_to_string(path)?;
        let records = serde_json::from_str(&data)?;
        Ok(Self { records })
    }

    pub fn insert(&mut self, sid: impl Into<String>, record: StudentRecord) {
        self.records.insert(sid.into(), record);
    }
}

#[async_trait]
impl RecordSource for FileSource {
    async fn enrollment_history(&self, sid: &str) -> CoreResult<EnrollmentHistory> {
        self.records
            .get(sid)
            .map(|r| r.history.clone())
            .ok_or_else(|| CoreError::Lookup(format!("no enrollment record for student {sid}")))
    }

    async fn student_profile(&self, sid: &str) -> CoreResult<StudentProfile> {
        self.records
            .get(sid)
            .map(|r| r.profile.clone())
            .ok_or_else(|| CoreError::Lookup(format!("no profile record for student {sid}")))
    }
}
