//! Per-major admission policies
//!
//! Policies are declarative: class-standing tiers, progress checks, and
//! named special cases are all data interpreted by the review engine.
//! Adjusting a major's rules means editing these tables, not the engine.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::{CatalogError, CatalogResult};

/// A named course-and-major pairing: reporting `course` for the slot is
/// accepted only when the applicant also reports a major containing
/// `major`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseMajorRule {
    pub course: String,
    pub major: String,
    pub fail: String,
}

/// One progress check inside a gate or tier. Counting checks use the
/// completed/enrolled buckets; slot checks look at a single requirement's
/// reconciled grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Check {
    /// Combined completed-plus-enrolled count over the prefixes meets a
    /// floor
    CombinedAtLeast {
        prefixes: Vec<String>,
        min: u32,
        fail: String,
    },
    /// Combined count must hit `total` exactly. When `one_short` is set,
    /// landing exactly one below downgrades to a conditional verdict
    /// instead of failing.
    CombinedExactly {
        prefixes: Vec<String>,
        total: u32,
        fail: String,
        one_short: Option<String>,
    },
    /// At least `min_completed` completed, and combined count exactly
    /// `total`
    CompletedAndCombined {
        prefixes: Vec<String>,
        min_completed: u32,
        total: u32,
        fail: String,
    },
    /// Every listed prefix has a completed slot
    AllCompleted {
        prefixes: Vec<String>,
        fail: String,
    },
    /// The slot's grade is not in the gate reject list
    SlotPassing { prefix: String, fail: String },
    /// At least one of the listed slots is passing
    AnySlotPassing {
        prefixes: Vec<String>,
        fail: String,
    },
    /// The slot is planned or passing
    SlotPlannedOrPassing { prefix: String, fail: String },
    /// The slot is completed or in progress this term. A term reported as
    /// `Other` triggers manual review, and an optional course-major rule
    /// applies.
    SlotUnderway {
        prefix: String,
        course_major: Option<CourseMajorRule>,
        manual_review: String,
        fail: String,
    },
    /// Major GPA meets the floor; below it, anything still in progress
    /// downgrades to conditional instead of failing
    GpaFloor {
        min: f64,
        in_progress_prefixes: Vec<String>,
        planned_prefix: Option<String>,
        fail: String,
        conditional: String,
    },
}

/// Progress rule for one class-standing band, covering terms in
/// attendance in `[min_terms, max_terms)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierRule {
    pub min_terms: u32,
    pub max_terms: u32,
    pub label: String,
    pub checks: Vec<Check>,
}

/// Tier ladder for one applicant population. Terms in attendance above
/// `max_terms` are categorically ineligible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub tiers: Vec<TierRule>,
    pub max_terms: Option<u32>,
}

/// Policy for one applicant population: a tier ladder, or a categorical
/// rejection with its reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TrackPolicy {
    Tiers(Track),
    Ineligible(String),
}

/// Which upper-division plan audit applies to a major
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanAudit {
    DataScience,
    ComputerScience,
    Statistics,
}

/// Declarative admission policy for one major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MajorPolicy {
    /// Substring matched against the applicant's choice-of-major strings
    pub major: String,
    /// Slot-name prefixes feeding the major GPA and problem-grade audit
    pub requirement_prefixes: Vec<String>,
    /// Preconditions checked before any tier logic
    pub gates: Vec<Check>,
    pub first_year: TrackPolicy,
    pub transfer: TrackPolicy,
    pub plan_audit: PlanAudit,
}

impl MajorPolicy {
    /// Check band shape and coverage. Malformed policies abort the run at
    /// load time rather than producing partial output.
    pub fn validate(&self) -> CatalogResult<()> {
        if self.major.is_empty() {
            return Err(self.invalid("major name is empty"));
        }
        if self.requirement_prefixes.is_empty() {
            return Err(self.invalid("requirement prefix list is empty"));
        }
        for (kind, policy) in [("first-year", &self.first_year), ("transfer", &self.transfer)] {
            let TrackPolicy::Tiers(track) = policy else {
                continue;
            };
            if track.tiers.is_empty() {
                return Err(self.invalid(&format!("{kind} track has no tiers")));
            }
            if track.tiers[0].min_terms != 0 {
                return Err(self.invalid(&format!("{kind} track does not start at 0 terms")));
            }
            let mut expected_min = 0;
            for tier in &track.tiers {
                if tier.min_terms != expected_min {
                    return Err(self.invalid(&format!(
                        "{kind} track has a gap or overlap at {} terms",
                        tier.min_terms
                    )));
                }
                if tier.min_terms >= tier.max_terms {
                    return Err(self.invalid(&format!(
                        "{kind} tier '{}' covers an empty band",
                        tier.label
                    )));
                }
                if tier.checks.is_empty() {
                    return Err(
                        self.invalid(&format!("{kind} tier '{}' has no checks", tier.label))
                    );
                }
                expected_min = tier.max_terms;
            }
            let last_max = track.tiers[track.tiers.len() - 1].max_terms;
            match track.max_terms {
                Some(ceiling) if last_max <= ceiling => {
                    return Err(self.invalid(&format!(
                        "{kind} tiers stop at {last_max} terms but the ceiling is {ceiling}"
                    )));
                }
                None if last_max != u32::MAX => {
                    return Err(self.invalid(&format!(
                        "{kind} track has no ceiling but tiers stop at {last_max} terms"
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn invalid(&self, problem: &str) -> CatalogError {
        CatalogError::InvalidPolicy {
            major: self.major.clone(),
            problem: problem.to_string(),
        }
    }
}

/// Validate a policy set as a whole
pub fn validate_policies(policies: &[MajorPolicy]) -> CatalogResult<()> {
    let mut seen = HashSet::new();
    for policy in policies {
        policy.validate()?;
        if !seen.insert(policy.major.clone()) {
            return Err(CatalogError::DuplicatePolicy(policy.major.clone()));
        }
    }
    Ok(())
}

fn group(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Data Science admission policy
pub fn data_science_policy() -> MajorPolicy {
    let lower_division = &["LD #1", "LD #2", "LD #4", "LD #5", "LD #6", "LD #7", "LD #10"][..];
    MajorPolicy {
        major: "Data Science".to_string(),
        requirement_prefixes: group(&[
            "LD #1", "LD #2", "LD #4", "LD #5", "LD #6", "LD #7", "LD #10", "DS UD",
        ]),
        gates: vec![
            Check::SlotPassing {
                prefix: "LD #5".to_string(),
                fail: "LD 5 is not passing".to_string(),
            },
            Check::AnySlotPassing {
                prefixes: group(&["LD #1", "LD #2", "LD #6"]),
                fail: "none of LD 1, LD 2, or LD 6 is passing".to_string(),
            },
        ],
        first_year: TrackPolicy::Tiers(Track {
            tiers: vec![
                TierRule {
                    min_terms: 0,
                    max_terms: 3,
                    label: "first year".to_string(),
                    checks: vec![Check::CombinedAtLeast {
                        prefixes: group(lower_division),
                        min: 3,
                        fail: "has not completed or enrolled in 3 lower division \
                               requirements as a first year"
                            .to_string(),
                    }],
                },
                TierRule {
                    min_terms: 3,
                    max_terms: 5,
                    label: "second year".to_string(),
                    checks: vec![Check::CombinedAtLeast {
                        prefixes: group(lower_division),
                        min: 5,
                        fail: "has not completed or enrolled in 5 lower division \
                               requirements as a second year"
                            .to_string(),
                    }],
                },
                TierRule {
                    min_terms: 5,
                    max_terms: 7,
                    label: "third year".to_string(),
                    checks: vec![Check::CombinedExactly {
                        prefixes: group(lower_division),
                        total: 7,
                        fail: "has not completed or enrolled in all 7 lower division \
                               requirements as a third year"
                            .to_string(),
                        one_short: None,
                    }],
                },
            ],
            max_terms: Some(6),
        }),
        transfer: TrackPolicy::Tiers(Track {
            tiers: vec![
                TierRule {
                    min_terms: 0,
                    max_terms: 7,
                    label: "new transfer".to_string(),
                    checks: vec![Check::CombinedExactly {
                        prefixes: group(lower_division),
                        total: 7,
                        fail: "has not completed or enrolled in all 7 lower division \
                               requirements as a new transfer"
                            .to_string(),
                        one_short: Some(
                            "a summer course is required to finish the lower division \
                             requirements"
                                .to_string(),
                        ),
                    }],
                },
                TierRule {
                    min_terms: 7,
                    max_terms: 8,
                    label: "continuing transfer".to_string(),
                    checks: vec![Check::CombinedExactly {
                        prefixes: group(lower_division),
                        total: 7,
                        fail: "has not completed or enrolled in all 7 lower division \
                               requirements as a continuing transfer"
                            .to_string(),
                        one_short: None,
                    }],
                },
            ],
            max_terms: Some(7),
        }),
        plan_audit: PlanAudit::DataScience,
    }
}

/// Computer Science admission policy
pub fn computer_science_policy() -> MajorPolicy {
    MajorPolicy {
        major: "Computer Science".to_string(),
        requirement_prefixes: group(&[
            "LD #1", "LD #2", "LD #4", "LD #6", "LD #7", "LD #8", "LD #9", "CS UD",
        ]),
        gates: vec![],
        first_year: TrackPolicy::Tiers(Track {
            tiers: vec![TierRule {
                min_terms: 0,
                max_terms: u32::MAX,
                label: "first year applicant".to_string(),
                checks: vec![
                    Check::SlotPassing {
                        prefix: "LD #1".to_string(),
                        fail: "has not completed LD 1".to_string(),
                    },
                    Check::SlotPassing {
                        prefix: "LD #2".to_string(),
                        fail: "has not completed LD 2".to_string(),
                    },
                    Check::SlotUnderway {
                        prefix: "LD #4".to_string(),
                        course_major: Some(CourseMajorRule {
                            course: "PHYSICS 89".to_string(),
                            major: "Physics".to_string(),
                            fail: "reports PHYSICS 89 for LD 4 without reporting a \
                                   Physics major"
                                .to_string(),
                        }),
                        manual_review: "manual review needed for LD 4".to_string(),
                        fail: "has not completed or enrolled in LD 4".to_string(),
                    },
                    Check::CompletedAndCombined {
                        prefixes: group(&["LD #6", "LD #7", "LD #9"]),
                        min_completed: 1,
                        total: 3,
                        fail: "does not have one completed and the rest underway of \
                               LD 6, LD 7, and LD 9"
                            .to_string(),
                    },
                    Check::GpaFloor {
                        min: 3.0,
                        in_progress_prefixes: group(&["LD #6", "LD #7", "LD #9"]),
                        planned_prefix: Some("LD #4".to_string()),
                        fail: "major GPA below 3.0".to_string(),
                        conditional: "major GPA below 3.0 with courses in progress".to_string(),
                    },
                ],
            }],
            max_terms: None,
        }),
        transfer: TrackPolicy::Ineligible(
            "transfer applicants are not eligible for comprehensive review".to_string(),
        ),
        plan_audit: PlanAudit::ComputerScience,
    }
}

/// Statistics admission policy
pub fn statistics_policy() -> MajorPolicy {
    MajorPolicy {
        major: "Statistics".to_string(),
        requirement_prefixes: group(&["LD #1", "LD #2", "LD #3", "LD #4", "LD #5", "ST UD"]),
        gates: vec![],
        first_year: TrackPolicy::Tiers(Track {
            tiers: vec![
                TierRule {
                    min_terms: 0,
                    max_terms: 3,
                    label: "first year".to_string(),
                    checks: vec![
                        Check::SlotPassing {
                            prefix: "LD #1".to_string(),
                            fail: "has not completed LD 1 as a first year".to_string(),
                        },
                        Check::CombinedExactly {
                            prefixes: group(&["LD #2", "LD #5"]),
                            total: 2,
                            fail: "has not completed or enrolled in LD 2 and LD 5 as a \
                                   first year"
                                .to_string(),
                            one_short: None,
                        },
                    ],
                },
                TierRule {
                    min_terms: 3,
                    max_terms: 5,
                    label: "second year".to_string(),
                    checks: vec![
                        Check::AllCompleted {
                            prefixes: group(&["LD #1", "LD #2", "LD #5"]),
                            fail: "has not completed LD 1, LD 2, and LD 5 as a second year"
                                .to_string(),
                        },
                        Check::CombinedExactly {
                            prefixes: group(&["LD #3", "LD #4"]),
                            total: 2,
                            fail: "has not completed or enrolled in LD 3 and LD 4 as a \
                                   second year"
                                .to_string(),
                            one_short: None,
                        },
                    ],
                },
                TierRule {
                    min_terms: 5,
                    max_terms: 7,
                    label: "third year".to_string(),
                    checks: vec![
                        Check::AllCompleted {
                            prefixes: group(&["LD #1", "LD #2", "LD #5"]),
                            fail: "has not completed LD 1, LD 2, and LD 5 as a third year"
                                .to_string(),
                        },
                        Check::CombinedExactly {
                            prefixes: group(&["LD #3", "LD #4"]),
                            total: 2,
                            fail: "has not completed or enrolled in LD 3 and LD 4 as a \
                                   third year"
                                .to_string(),
                            one_short: None,
                        },
                        Check::SlotPlannedOrPassing {
                            prefix: "ST UD#2".to_string(),
                            fail: "has not completed or enrolled in the probability upper \
                                   division course as a third year"
                                .to_string(),
                        },
                    ],
                },
            ],
            max_terms: Some(6),
        }),
        transfer: TrackPolicy::Tiers(Track {
            tiers: vec![TierRule {
                min_terms: 0,
                max_terms: u32::MAX,
                label: "transfer".to_string(),
                checks: vec![
                    Check::AllCompleted {
                        prefixes: group(&["LD #1", "LD #2"]),
                        fail: "has not completed LD 1 and LD 2 as a transfer".to_string(),
                    },
                    Check::SlotPassing {
                        prefix: "LD #5".to_string(),
                        fail: "has not completed or enrolled in LD 5 as a transfer".to_string(),
                    },
                    Check::CombinedExactly {
                        prefixes: group(&["LD #3", "LD #4"]),
                        total: 2,
                        fail: "does not have LD 3 and LD 4 completed or underway as a \
                               transfer"
                            .to_string(),
                        one_short: None,
                    },
                ],
            }],
            max_terms: None,
        }),
        plan_audit: PlanAudit::Statistics,
    }
}

/// The policy set reviews run with by default
pub fn default_policies() -> Vec<MajorPolicy> {
    vec![
        data_science_policy(),
        computer_science_policy(),
        statistics_policy(),
    ]
}

/// Static default policy set, validated once
pub static DEFAULT_POLICIES: Lazy<Vec<MajorPolicy>> = Lazy::new(|| {
    let policies = default_policies();
    validate_policies(&policies).expect("default policies are valid");
    policies
});
