//! Eligibility Review Engine
//!
//! This crate provides the review pipeline for program-admission
//! eligibility: course-name normalization, reconciliation of reported
//! coursework against authoritative enrollment records, identity
//! verification, requirement aggregation, and per-major policy
//! evaluation.

pub mod aggregate;
pub mod eligibility;
pub mod identity;
pub mod normalize;
pub mod plan;
pub mod reconcile;
pub mod report;
pub mod roster;
pub mod source;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use elig_catalog::policies::{self, MajorPolicy};
use elig_terms::TermId;

pub use eligibility::Verdict;
pub use identity::{Discrepancy, IdentityField};
pub use roster::{Application, ApplicantKind, ReportedIdentity, RequirementSlot};
pub use source::{
    EnrollmentHistory, EnrollmentRecord, FileSource, RecordSource, StudentProfile, StudentRecord,
};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record lookup failed: {0}")]
    Lookup(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

/// Marker appended to the unverifiable list when a record lookup fails
/// and nothing about the application can be checked
pub const UNVERIFIABLE_APPLICATION: &str = "Not able to verify anything";

/// Complete review configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Term the review runs against; in-progress work is expected here
    pub current_term: TermId,
    /// Absolute tolerance when comparing reported and recorded GPA
    pub gpa_tolerance: f64,
    /// Maximum record lookups in flight at once
    pub max_concurrent_lookups: usize,
    /// Admission policies, one per reviewable major
    pub policies: Vec<MajorPolicy>,
}

impl ReviewConfig {
    /// Standard configuration for a given current term. The current term
    /// has no meaningful default; everything else does.
    pub fn new(current_term: TermId) -> Self {
        Self {
            current_term,
            gpa_tolerance: 0.05,
            max_concurrent_lookups: 4,
            policies: policies::default_policies(),
        }
    }
}

/// One student's full review outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentReview {
    pub sid: String,
    /// Record lookups failed; nothing below was checked
    pub lookup_failed: bool,
    /// Identity fields that disagree with the student record
    pub discrepancies: Vec<Discrepancy>,
    /// Requirement slots no enrollment record confirmed
    pub unverified: Vec<String>,
    /// Graduation-plan sanity flags
    pub graduation_flags: Vec<String>,
    /// Reconciled requirement slots, in reported order
    pub slots: Vec<RequirementSlot>,
    /// One assessment per reviewable major the applicant chose
    pub assessments: Vec<MajorAssessment>,
}

/// Per-major outcome for one applicant
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorAssessment {
    pub major: String,
    pub major_gpa: Option<f64>,
    /// Requirement slots graded Pass/No-Pass
    pub pass_no_pass: Vec<String>,
    /// Requirement slots graded below a C-
    pub below_c_minus: Vec<String>,
    pub verdict: Verdict,
    /// Upper-division plan audit flags
    pub plan_flags: Vec<String>,
}

/// Complete batch result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    /// Reviews in roster order
    pub reviews: Vec<StudentReview>,
    pub summary: ReviewSummary,
}

/// Batch summary for quick overview
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub students: usize,
    pub eligible: usize,
    pub conditional: usize,
    pub ineligible: usize,
    pub lookup_failures: usize,
}

/// Main review interface
pub struct Reviewer {
    config: ReviewConfig,
    source: Box<dyn RecordSource>,
}

impl std::fmt::Debug for Reviewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reviewer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Reviewer {
    /// Create a reviewer with the standard configuration for a term
    pub fn new(current_term: TermId, source: Box<dyn RecordSource>) -> CoreResult<Self> {
        Self::with_config(ReviewConfig::new(current_term), source)
    }

    /// Create a reviewer with a custom configuration. The policy tables
    /// are validated here; a malformed policy set aborts the run before
    /// any student is reviewed.
    pub fn with_config(config: ReviewConfig, source: Box<dyn RecordSource>) -> CoreResult<Self> {
        policies::validate_policies(&config.policies)
            .map_err(|err| CoreError::Config(err.to_string()))?;
        if config.max_concurrent_lookups == 0 {
            return Err(CoreError::Config(
                "max_concurrent_lookups must be at least 1".to_string(),
            ));
        }
        Ok(Self { config, source })
    }

    /// Get current configuration
    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    /// Review a whole roster with bounded lookup concurrency, preserving
    /// roster order in the result.
    pub async fn review_batch(&self, roster: Vec<Application>) -> ReviewBatch {
        let id = Uuid::new_v4();
        let started_at = Utc::now();
        info!(batch = %id, students = roster.len(), "starting review batch");

        let mut indexed: Vec<(usize, StudentReview)> = stream::iter(roster.into_iter().enumerate())
            .map(|(index, application)| async move {
                (index, self.review_student(application).await)
            })
            .buffer_unordered(self.config.max_concurrent_lookups)
            .collect()
            .await;
        indexed.sort_by_key(|(index, _)| *index);
        let reviews: Vec<StudentReview> = indexed.into_iter().map(|(_, review)| review).collect();

        let summary = ReviewSummary {
            students: reviews.len(),
            eligible: verdict_count(&reviews, Verdict::is_eligible),
            conditional: verdict_count(&reviews, Verdict::is_conditional),
            ineligible: verdict_count(&reviews, Verdict::is_ineligible),
            lookup_failures: reviews.iter().filter(|r| r.lookup_failed).count(),
        };
        let completed_at = Utc::now();
        info!(
            batch = %id,
            eligible = summary.eligible,
            conditional = summary.conditional,
            ineligible = summary.ineligible,
            lookup_failures = summary.lookup_failures,
            "review batch completed"
        );

        ReviewBatch {
            id,
            started_at,
            completed_at,
            reviews,
            summary,
        }
    }

    /// Review one application: normalize the reported courses, fetch the
    /// student record, reconcile every slot, verify identity, and assess
    /// each chosen major.
    ///
    /// A failed lookup degrades this student to "not able to verify
    /// anything" and never affects the rest of the batch.
    pub async fn review_student(&self, application: Application) -> StudentReview {
        let Application {
            sid,
            applicant_type,
            identity,
            major_choices,
            domain_emphasis,
            mut slots,
        } = application;
        debug!(%sid, "reviewing application");

        normalize::normalize_slots(&mut slots);

        // the two lookups are independent; run them together
        let (history, profile) = futures::join!(
            self.source.enrollment_history(&sid),
            self.source.student_profile(&sid),
        );
        let (history, profile) = match (history, profile) {
            (Ok(history), Ok(profile)) => (history, profile),
            (Err(err), _) | (_, Err(err)) => {
                warn!(%sid, %err, "record lookup failed");
                return StudentReview {
                    sid,
                    lookup_failed: true,
                    discrepancies: Vec::new(),
                    unverified: vec![UNVERIFIABLE_APPLICATION.to_string()],
                    graduation_flags: Vec::new(),
                    slots,
                    assessments: Vec::new(),
                };
            }
        };

        let unverified = reconcile::reconcile_slots(&mut slots, &history, self.config.current_term);
        if !unverified.is_empty() {
            debug!(%sid, count = unverified.len(), "slots could not be verified");
        }

        let discrepancies = identity::verify_identity(
            &identity,
            &profile,
            history.admit_term,
            self.config.gpa_tolerance,
        );

        let reported_egt = identity.graduation_term.as_ref().and_then(|t| t.id());
        let graduation_flags = plan::graduation_flags(
            reported_egt,
            profile.expected_graduation,
            &slots,
            self.config.current_term,
        );

        let terms_in_attendance = profile.terms_in_attendance.unwrap_or(0);
        let assessments = major_choices
            .iter()
            .filter_map(|choice| {
                let Some(policy) = self.policy_for(choice) else {
                    debug!(%sid, %choice, "no policy configured for major choice");
                    return None;
                };
                let major_gpa = aggregate::major_gpa(&slots, &policy.requirement_prefixes);
                let problems = aggregate::problem_grades(&slots, &policy.requirement_prefixes);
                let verdict = eligibility::evaluate(
                    policy,
                    &eligibility::EvalContext {
                        slots: &slots,
                        current_term: self.config.current_term,
                        applicant_type,
                        terms_in_attendance,
                        reported_majors: &identity.majors,
                        major_gpa,
                    },
                );
                let plan_flags =
                    plan::audit_plan(policy.plan_audit, &slots, domain_emphasis.as_deref());
                Some(MajorAssessment {
                    major: policy.major.clone(),
                    major_gpa,
                    pass_no_pass: problems.pass_no_pass,
                    below_c_minus: problems.below_c_minus,
                    verdict,
                    plan_flags,
                })
            })
            .collect();

        StudentReview {
            sid,
            lookup_failed: false,
            discrepancies,
            unverified,
            graduation_flags,
            slots,
            assessments,
        }
    }

    /// The policy for a reported major choice; policies match on a
    /// substring so "Data Science BA" selects the Data Science policy.
    fn policy_for(&self, choice: &str) -> Option<&MajorPolicy> {
        self.config
            .policies
            .iter()
            .find(|policy| choice.contains(&policy.major))
    }
}

fn verdict_count(reviews: &[StudentReview], matches: fn(&Verdict) -> bool) -> usize {
    reviews
        .iter()
        .flat_map(|review| &review.assessments)
        .filter(|assessment| matches(&assessment.verdict))
        .count()
}
