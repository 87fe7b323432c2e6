//! Gateway response shapes
//!
//! The gateway wraps everything in an `apiResponse.response` envelope and
//! omits fields freely, so every level here defaults; a sparse response
//! decodes to an empty history or profile instead of failing.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use elig_catalog::grades;
use elig_core::{EnrollmentHistory, EnrollmentRecord, StudentProfile};
use elig_terms::{TermId, TermValue};

static VARIANT_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)[CNW](\d)").expect("variant prefix pattern"));

/// Drop the first cross-listing, summer, or web-variant letter before a
/// course number, so `STAT C140` groups with `STAT 140`.
pub fn clean_course_name(display_name: &str) -> String {
    VARIANT_PREFIX.replace(display_name, "$1").into_owned()
}

// ---- enrollments API ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentEnvelope {
    #[serde(default)]
    api_response: EnrollmentApiResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentApiResponse {
    #[serde(default)]
    response: EnrollmentPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentPayload {
    #[serde(default)]
    enrollments_by_student: EnrollmentsByStudent,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrollmentsByStudent {
    #[serde(default)]
    student_enrollments: Vec<StudentEnrollment>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentEnrollment {
    #[serde(default)]
    class_section: Option<ClassSection>,
    #[serde(default)]
    grades: Vec<GradeEntry>,
    #[serde(default)]
    enrolled_units: Option<EnrolledUnits>,
}

impl StudentEnrollment {
    fn term(&self) -> Option<TermId> {
        self.class_section
            .as_ref()?
            .class
            .as_ref()?
            .session
            .as_ref()?
            .term
            .as_ref()?
            .id
            .as_ref()?
            .id()
    }

    fn display_name(&self) -> Option<&str> {
        self.class_section
            .as_ref()?
            .class
            .as_ref()?
            .course
            .as_ref()?
            .display_name
            .as_deref()
    }

    fn mark(&self) -> Option<&str> {
        self.grades
            .first()?
            .mark
            .as_deref()
            .filter(|mark| !mark.is_empty())
    }

    fn units(&self) -> f64 {
        self.enrolled_units
            .as_ref()
            .and_then(|units| units.taken)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassSection {
    #[serde(default)]
    class: Option<ClassInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassInfo {
    #[serde(default)]
    session: Option<SessionInfo>,
    #[serde(default)]
    course: Option<CourseInfo>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    #[serde(default)]
    term: Option<TermRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TermRef {
    #[serde(default)]
    id: Option<TermValue>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CourseInfo {
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GradeEntry {
    #[serde(default)]
    mark: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnrolledUnits {
    #[serde(default)]
    taken: Option<f64>,
}

impl EnrollmentEnvelope {
    /// Group attempts by cleaned course name, keep the three most recent
    /// per course, and take the earliest graded term as the admit term.
    /// Records without a course name still count toward the admit term.
    pub fn into_history(self) -> EnrollmentHistory {
        let mut courses: HashMap<String, Vec<EnrollmentRecord>> = HashMap::new();
        let mut admit_term: Option<TermId> = None;

        let enrollments = self
            .api_response
            .response
            .enrollments_by_student
            .student_enrollments;
        for enrollment in &enrollments {
            let term = enrollment.term();
            let mark = enrollment.mark();

            if let (Some(term), Some(_)) = (term, mark) {
                if admit_term.map_or(true, |earliest| term < earliest) {
                    admit_term = Some(term);
                }
            }

            let Some(display_name) = enrollment.display_name() else {
                continue;
            };
            courses
                .entry(clean_course_name(display_name))
                .or_default()
                .push(EnrollmentRecord {
                    term: term.unwrap_or(TermId(0)),
                    grade: mark.unwrap_or(grades::UNGRADED).to_string(),
                    units: enrollment.units(),
                });
        }

        for attempts in courses.values_mut() {
            attempts.sort_by(|a, b| b.term.cmp(&a.term));
            attempts.truncate(3);
        }

        EnrollmentHistory { courses, admit_term }
    }
}

// ---- students API ----

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentEnvelope {
    #[serde(default)]
    api_response: StudentApiResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentApiResponse {
    #[serde(default)]
    response: StudentPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentPayload {
    #[serde(default)]
    academic_statuses: Vec<AcademicStatus>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcademicStatus {
    #[serde(default)]
    student_career: Option<StudentCareer>,
    // the gateway capitalizes the acronym
    #[serde(rename = "cumulativeGPA", default)]
    cumulative_gpa: Option<CumulativeGpa>,
    #[serde(default)]
    terms_in_attendance: Option<u32>,
    #[serde(default)]
    student_plans: Vec<StudentPlan>,
}

impl AcademicStatus {
    fn career_code(&self) -> Option<&str> {
        self.student_career
            .as_ref()?
            .academic_career
            .as_ref()?
            .code
            .as_deref()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentCareer {
    #[serde(default)]
    academic_career: Option<CodeRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CodeRef {
    #[serde(default)]
    code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CumulativeGpa {
    #[serde(default)]
    average: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentPlan {
    #[serde(default)]
    academic_plan: Option<AcademicPlan>,
    #[serde(default)]
    academic_program: Option<AcademicProgram>,
    #[serde(default)]
    expected_graduation_term: Option<TermRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcademicPlan {
    #[serde(rename = "type", default)]
    plan_type: Option<CodeRef>,
    #[serde(default)]
    plan: Option<DescriptionRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptionRef {
    #[serde(default)]
    formal_description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AcademicProgram {
    #[serde(default)]
    academic_group: Option<DescriptionRef>,
}

impl StudentEnvelope {
    /// Profile from the undergraduate career row; everything stays empty
    /// when no such row exists. Majors and colleges come from the major
    /// plans, and the expected graduation term follows the last major
    /// plan, even when that plan carries none.
    pub fn into_profile(self) -> StudentProfile {
        let statuses = self.api_response.response.academic_statuses;
        let Some(undergrad) = statuses
            .into_iter()
            .find(|status| status.career_code() == Some("UGRD"))
        else {
            return StudentProfile::default();
        };

        let mut profile = StudentProfile {
            // a zero from the gateway stands for no graded work yet
            gpa: undergrad
                .cumulative_gpa
                .and_then(|gpa| gpa.average)
                .filter(|average| *average != 0.0),
            terms_in_attendance: undergrad.terms_in_attendance.filter(|terms| *terms != 0),
            ..StudentProfile::default()
        };

        for plan in undergrad.student_plans {
            let StudentPlan {
                academic_plan,
                academic_program,
                expected_graduation_term,
            } = plan;
            let Some(academic_plan) = academic_plan else {
                continue;
            };
            let is_major = academic_plan
                .plan_type
                .as_ref()
                .and_then(|code| code.code.as_deref())
                == Some("MAJ");
            if !is_major {
                continue;
            }

            profile.expected_graduation = expected_graduation_term
                .and_then(|term| term.id)
                .and_then(|value| value.id());
            if let Some(major) = academic_plan.plan.and_then(|p| p.formal_description) {
                profile.majors.push(major);
            }
            if let Some(college) = academic_program
                .and_then(|program| program.academic_group)
                .and_then(|group| group.formal_description)
            {
                profile.colleges.push(college);
            }
        }
        profile
    }
}
