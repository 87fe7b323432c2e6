//! Graduation-plan flags and upper-division plan audits
//!
//! The eligibility checks in [`crate::eligibility`] decide whether an
//! applicant can be admitted; the audits here look at what the applicant
//! plans to take and raise human-readable flags for a reviewer. Nothing
//! in this module affects a verdict.

use elig_catalog::approved::{self, DomainEmphasis};
use elig_catalog::grades;
use elig_catalog::policies::PlanAudit;
use elig_terms::TermId;

use crate::aggregate::matches_requirement;
use crate::roster::RequirementSlot;

/// Sanity flags over the whole plan: summer terms, terms past either
/// graduation date, and planned courses in terms that already ended.
pub fn graduation_flags(
    reported_egt: Option<TermId>,
    record_egt: Option<TermId>,
    slots: &[RequirementSlot],
    current_term: TermId,
) -> Vec<String> {
    let mut flags = Vec::new();
    let terms: Vec<(&RequirementSlot, TermId)> = slots
        .iter()
        .filter_map(|slot| slot.term.id().map(|id| (slot, id)))
        .collect();

    if terms
        .iter()
        .any(|(slot, id)| id.is_summer() && slot.grade == grades::PLANNED)
    {
        flags.push("Summer terms planned".to_string());
    }
    if let Some(egt) = reported_egt {
        if terms.iter().any(|(_, id)| *id > egt) {
            flags.push("Terms planned after the application graduation term".to_string());
        }
    }
    if let Some(egt) = record_egt {
        if terms.iter().any(|(_, id)| *id > egt) {
            flags.push("Terms planned after the graduation term on record".to_string());
        }
    }
    for (slot, id) in &terms {
        if slot.grade == grades::PLANNED && *id < current_term {
            flags.push(format!(
                "{} is planned for {} which is not a current or future term",
                slot.name, id
            ));
        }
    }
    flags
}

/// Run the audit a major's policy asks for
pub fn audit_plan(
    audit: PlanAudit,
    slots: &[RequirementSlot],
    domain_emphasis: Option<&str>,
) -> Vec<String> {
    match audit {
        PlanAudit::DataScience => audit_data_science(slots, domain_emphasis),
        PlanAudit::ComputerScience => audit_computer_science(slots),
        PlanAudit::Statistics => audit_statistics(slots),
    }
}

/// Audit the Data Science upper-division plan
///
/// Checks each slot against the approved tables, holds the two depth
/// slots against each other, and tracks the single-use courses that may
/// satisfy at most one requirement.
pub fn audit_data_science(
    slots: &[RequirementSlot],
    domain_emphasis: Option<&str>,
) -> Vec<String> {
    let mut flags = Vec::new();
    let mut single_use: Vec<&str> = Vec::new();
    let mut depth_first: Option<&str> = None;
    let mut depth_second: Option<&str> = None;
    let emphasis: Option<&DomainEmphasis> =
        domain_emphasis.and_then(approved::domain_emphasis);

    for slot in slots {
        if slot.course.is_empty() {
            continue;
        }
        let course = slot.course.as_str();
        let name = slot.name.as_str();

        if matches_requirement(name, "LD #10")
            || matches_requirement(name, "DS UD#7")
            || matches_requirement(name, "DS UD#8")
        {
            if !emphasis.is_some_and(|e| e.courses.contains(&course)) {
                flags.push(format!(
                    "{course} may not satisfy {name} for first choice domain emphasis ({})",
                    domain_emphasis.unwrap_or("none")
                ));
            }
        } else if matches_requirement(name, "DS UD#1") {
            if course != approved::DS_CORE {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        } else if matches_requirement(name, "DS UD#2") {
            if !approved::DS_PROBABILITY.contains(&course) {
                flags.push(format!("{course} may not satisfy {name}"));
            } else if approved::DS_SINGLE_USE.contains(&course) {
                single_use.push(course);
            }
        } else if matches_requirement(name, "DS UD#3") || matches_requirement(name, "DS UD#4") {
            if !approved::DS_DEPTH.contains(&course) {
                flags.push(format!("{course} may not satisfy {name}"));
            } else if approved::DS_SINGLE_USE.contains(&course) {
                single_use.push(course);
            }
            if matches_requirement(name, "DS UD#3") {
                depth_first = Some(course);
            } else {
                depth_second = Some(course);
            }
        } else if matches_requirement(name, "DS UD#5") {
            if course == "DATA 188" {
                if slot.term.id() != Some(approved::DATA_188_ONLY_TERM) {
                    flags.push(format!(
                        "{course} taken in {} may not satisfy {name}",
                        slot.term
                    ));
                }
            } else if !approved::DS_MODELING.contains(&course) {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        } else if matches_requirement(name, "DS UD#6") {
            if course == "BIOENG 100" {
                if term_after(slot, approved::BIOENG_100_LAST_TERM) {
                    flags.push(format!("{course} may not satisfy {name}"));
                }
            } else if course == "AMERSTD 134" || course == "AFRICAM 134" {
                if term_after(slot, approved::AMERSTD_134_LAST_TERM) {
                    flags.push(format!("{course} may not satisfy {name}"));
                }
            } else if !approved::DS_HUMAN_CONTEXT.contains(&course) {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        }
    }

    if let (Some(first), Some(second)) = (depth_first, depth_second) {
        if first == second {
            flags.push(format!(
                "The same class {first} was listed for both Computational and \
                 Inferential Depth courses"
            ));
        }
    }
    if single_use.len() > 1 {
        flags.push(format!(
            "Only one of the following can be used to satisfy major requirements, \
             but {} are listed",
            single_use.join(", ")
        ));
    }
    flags
}

/// Audit the Computer Science upper-division plan
pub fn audit_computer_science(slots: &[RequirementSlot]) -> Vec<String> {
    let mut flags = Vec::new();

    for slot in slots {
        if slot.course.is_empty() {
            continue;
        }
        let course = slot.course.as_str();
        let name = slot.name.as_str();
        let (dept, number) = split_course(course);

        if matches_requirement(name, "CS UD#1") {
            if !approved::CS_DESIGN.contains(&course) {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        } else if matches_requirement(name, "CS UD#2") || matches_requirement(name, "CS UD#3") {
            if dept != "COMPSCI"
                || number.is_some_and(|n| approved::CS_NUMBERS_REJECTED.contains(&n))
            {
                flags.push(format!("{course} may not satisfy {name} (CS Upper Div)"));
            } else if number.is_some_and(|n| approved::CS_NUMBERS_REVIEW.contains(&n)) {
                flags.push(format!(
                    "{course} may not satisfy {name} (CS Upper Div); course may not \
                     be technical"
                ));
            }
        } else if matches_requirement(name, "CS UD#4") || matches_requirement(name, "CS UD#5") {
            if !matches!(dept, "COMPSCI" | "ELENG" | "EECS" | "EE")
                || number.is_some_and(|n| approved::CS_NUMBERS_REJECTED.contains(&n))
            {
                flags.push(format!("{course} may not satisfy {name}"));
            } else if number.is_some_and(|n| approved::CS_NUMBERS_REVIEW.contains(&n)) {
                flags.push(format!(
                    "{course} may not satisfy {name}; course may not be technical"
                ));
            }
        } else if matches_requirement(name, "CS UD#6") {
            if approved::CS_TECH_ELECTIVE_COURSES.contains(&course) {
                continue;
            }
            if number.is_some_and(|n| approved::CS_TECH_ELECTIVE_NUMBERS_REJECTED.contains(&n))
                || !approved::CS_TECH_ELECTIVE_DEPARTMENTS.contains(&dept)
            {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        }
    }
    flags
}

/// Audit the Statistics upper-division plan
///
/// Slot checks run first; the elective and cluster summaries run only
/// when the plan listed at least one course for those groups.
pub fn audit_statistics(slots: &[RequirementSlot]) -> Vec<String> {
    let mut flags = Vec::new();
    let mut electives: Vec<&str> = Vec::new();
    let mut clusters: Vec<&str> = Vec::new();
    let mut cluster_depts: Vec<&str> = Vec::new();
    let mut has_lab_elective = false;

    for slot in slots {
        if slot.course.is_empty() {
            continue;
        }
        let course = slot.course.as_str();
        let name = slot.name.as_str();

        if matches_requirement(name, "ST UD#1") {
            if course == approved::ST_COMPUTING {
                continue;
            }
            if course == "DATA 100" {
                flags.push(
                    "Student lists DATA 100 for Concepts in Computing with Data; \
                     STAT 33B also required"
                        .to_string(),
                );
            } else {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        } else if matches_requirement(name, "ST UD#2") {
            if !approved::ST_PROBABILITY.contains(&course) {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        } else if matches_requirement(name, "ST UD#3") {
            if course != approved::ST_CORE {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        } else if matches_requirement(name, "ST UD#4")
            || matches_requirement(name, "ST UD#5")
            || matches_requirement(name, "ST UD#6")
        {
            push_unique(&mut electives, course);
            if approved::ST_ELECTIVES_LAB.contains(&course) {
                has_lab_elective = true;
            } else if !approved::ST_ELECTIVES_NO_LAB.contains(&course) {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        } else if matches_requirement(name, "ST UD#7")
            || matches_requirement(name, "ST UD#8")
            || matches_requirement(name, "ST UD#9")
        {
            push_unique(&mut clusters, course);
            if approved::ST_CLUSTER.contains(&course) {
                if let Some((dept, _)) = course.split_once(' ') {
                    push_unique(&mut cluster_depts, dept);
                }
            } else {
                flags.push(format!("{course} may not satisfy {name}"));
            }
        }
    }

    if !clusters.is_empty() {
        if clusters.len() < 3 {
            flags.push(format!(
                "Student chose duplicate courses for cluster: {}",
                clusters.join(", ")
            ));
        }
        // cross-listed pairs fold into one department for the count
        if cluster_depts.contains(&"ECON") && cluster_depts.contains(&"UGBA") {
            cluster_depts.retain(|dept| *dept != "UGBA");
        }
        if cluster_depts.contains(&"EECS") && cluster_depts.contains(&"COMPSCI") {
            cluster_depts.retain(|dept| *dept != "EECS");
        }
        if cluster_depts.len() > 2 {
            flags.push(format!(
                "Student chose cluster courses from more than two departments: {}",
                cluster_depts.join(", ")
            ));
        }
    }
    if !electives.is_empty() {
        let (first, second) = approved::ST_OVERLAPPING_ELECTIVES;
        if electives.contains(&first) && electives.contains(&second) {
            flags.push(format!(
                "Student chose both {first} and {second} which may overlap on the \
                 topic of forecasting"
            ));
        }
        if electives.len() < 3 {
            flags.push(format!(
                "Student chose duplicate electives: {}",
                electives.join(", ")
            ));
        }
        if !has_lab_elective {
            flags.push("Student did not choose any electives with a lab".to_string());
        }
    }
    flags
}

fn term_after(slot: &RequirementSlot, last: TermId) -> bool {
    slot.term.id().is_some_and(|id| id > last)
}

fn split_course(course: &str) -> (&str, Option<u32>) {
    match course.split_once(' ') {
        Some((dept, number)) => (dept, number.parse().ok()),
        None => (course, None),
    }
}

fn push_unique<'a>(list: &mut Vec<&'a str>, value: &'a str) {
    if !list.iter().any(|existing| *existing == value) {
        list.push(value);
    }
}
