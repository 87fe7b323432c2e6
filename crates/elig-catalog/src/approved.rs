//! Approved-course tables for the upper-division plan audits
//!
//! Course names here are in canonical `<DEPT> <NUM>` form. The lists for
//! technical electives, statistics clusters, and domain emphases are
//! institutional configuration maintained alongside the major policies;
//! the entries below are the currently published sets.

use elig_terms::TermId;

// ---------------------------------------------------------------------------
// Data Science

/// The single course accepted for the Data Science core slot
pub const DS_CORE: &str = "DATA 100";

/// Probability courses accepted for the Data Science probability slot
pub const DS_PROBABILITY: &[&str] = &[
    "DATA 140",
    "STAT 140",
    "EECS 126",
    "ELENG 126",
    "INDENG 172",
    "MATH 106",
    "STAT 134",
];

/// Computational and inferential depth courses
pub const DS_DEPTH: &[&str] = &[
    "ASTRON 128",
    "BIOENG 142",
    "CHEM 142",
    "CHEM 191",
    "COMPSCI 191",
    "PHYSICS 191",
    "COMPSCI 161",
    "COMPSCI 162",
    "COMPSCI 164",
    "COMPSCI 168",
    "COMPSCI 169",
    "COMPSCI 169L",
    "COMPSCI 169A",
    "COMPSCI 170",
    "INDENG 165",
    "DATA 101",
    "COMPSCI 186",
    "COMPSCI 188",
    "CPH 100",
    "DATA 146",
    "DATA 144",
    "DATA 145",
    "ECON 140",
    "ECON 141",
    "EECS 127",
    "ELENG 120",
    "ELENG 122",
    "ELENG 123",
    "ELENG 129",
    "ENVECON 118",
    "IAS 118",
    "ESPM 174",
    "INDENG 115",
    "INDENG 135",
    "INDENG 142B",
    "INDENG 160",
    "INDENG 162",
    "INDENG 164",
    "INDENG 166",
    "INDENG 173",
    "INDENG 174",
    "INFO 159",
    "INFO 190",
    "MATH 156",
    "NUCENG 175",
    "PHYSICS 188",
    "STAT 135",
    "STAT 150",
    "STAT 151A",
    "STAT 152",
    "STAT 153",
    "STAT 158",
    "STAT 159",
    "STAT 165",
    "UGBA 142",
];

/// Modeling, learning, and decision-making courses
pub const DS_MODELING: &[&str] = &[
    "DATA 182",
    "COMPSCI 182",
    "DATA 182L",
    "COMPSCI 182L",
    "COMPSCI 189",
    "DATA 102",
    "STAT 102",
    "INDENG 142A",
    "STAT 154",
];

/// Human contexts and ethics courses
pub const DS_HUMAN_CONTEXT: &[&str] = &[
    "ANTHRO 168",
    "CYPLAN 101",
    "DATA 104",
    "HISTORY 184D",
    "STS 104",
    "DIGHUM 100",
    "ESPM 167",
    "PUBHLTH 160",
    "INFO 101",
    "INFO 188",
    "ISF 100J",
    "NWMEDIA 151AC",
    "PHILOS 121",
    "POLECON 159",
];

/// Courses that can satisfy at most one Data Science requirement even
/// though they appear on several lists
pub const DS_SINGLE_USE: &[&str] = &["EECS 126", "INDENG 173", "STAT 150"];

/// DATA 188 counts for the modeling slot only in this term
pub const DATA_188_ONLY_TERM: TermId = TermId(2262);

/// BIOENG 100 counts for the human-context slot only through this term
pub const BIOENG_100_LAST_TERM: TermId = TermId(2258);

/// AMERSTD 134 and AFRICAM 134 count for the human-context slot only
/// through this term
pub const AMERSTD_134_LAST_TERM: TermId = TermId(2262);

/// A domain emphasis and the courses approved for it
#[derive(Debug, Clone, Copy)]
pub struct DomainEmphasis {
    pub name: &'static str,
    pub courses: &'static [&'static str],
}

/// Published Data Science domain emphases
pub const DOMAIN_EMPHASES: &[DomainEmphasis] = &[
    DomainEmphasis {
        name: "Applied Mathematics and Modeling",
        courses: &[
            "MATH 53",
            "MATH 54",
            "MATH 104",
            "MATH 110",
            "MATH 118",
            "MATH 128A",
            "MATH 170",
            "PHYSICS 188",
        ],
    },
    DomainEmphasis {
        name: "Business and Industrial Analytics",
        courses: &[
            "UGBA 10",
            "ECON 2",
            "UGBA 104",
            "UGBA 141",
            "UGBA 142",
            "UGBA 147",
            "INDENG 142B",
            "INDENG 166",
        ],
    },
    DomainEmphasis {
        name: "Cognition",
        courses: &[
            "COGSCI 1",
            "PSYCH 2",
            "COGSCI 100",
            "COGSCI 131",
            "PSYCH 101",
            "COMPSCI 182",
            "NEUROSC 125",
        ],
    },
    DomainEmphasis {
        name: "Social Policy and Law",
        courses: &[
            "SOCIOL 1",
            "LEGALST 39",
            "LEGALST 123",
            "PUBPOL 101",
            "ECON 130",
            "SOCIOL 106",
            "POLECON 159",
        ],
    },
    DomainEmphasis {
        name: "Urban Science",
        courses: &[
            "CYPLAN 35",
            "GEOG 80",
            "CYPLAN 101",
            "CYPLAN 115",
            "GEOG 187",
            "LDARCH 121",
        ],
    },
];

/// Look up a domain emphasis by its published name
pub fn domain_emphasis(name: &str) -> Option<&'static DomainEmphasis> {
    DOMAIN_EMPHASES.iter().find(|e| e.name == name)
}

// ---------------------------------------------------------------------------
// Computer Science

/// Design courses accepted for the Computer Science design slot
pub const CS_DESIGN: &[&str] = &[
    "COMPSCI 152",
    "COMPSCI 160",
    "COMPSCI 161",
    "COMPSCI 162",
    "COMPSCI 164",
    "COMPSCI 168",
    "COMPSCI 169A",
    "COMPSCI 169L",
    "COMPSCI 180",
    "COMPSCI 182",
    "COMPSCI 184",
    "COMPSCI 185",
    "COMPSCI 186",
    "ELENG 128",
    "ELENG 130",
    "ELENG 140",
    "ELENG 143",
    "ELENG 192",
    "EECS 106A",
    "EECS 106B",
    "EECS 149",
    "EECS 151",
];

/// Course numbers never accepted for upper-division slots
pub const CS_NUMBERS_REJECTED: &[u32] = &[199, 198, 197, 195];

/// Course numbers that need a second look before acceptance
pub const CS_NUMBERS_REVIEW: &[u32] = &[194, 191, 190];

/// Course numbers never accepted as technical electives
pub const CS_TECH_ELECTIVE_NUMBERS_REJECTED: &[u32] = &[199, 198, 197, 196, 195, 194, 190];

/// Individually approved technical electives outside the blanket
/// departments
pub const CS_TECH_ELECTIVE_COURSES: &[&str] = &[
    "ASTRON 128",
    "BIOENG 131",
    "CHEM 120A",
    "DATA 144",
    "INFO 159",
    "MCELLBI 166",
    "NUCENG 101",
    "PHYSICS 111A",
    "STAT 153",
    "UGBA 142",
];

/// Departments whose upper-division courses count as technical electives
pub const CS_TECH_ELECTIVE_DEPARTMENTS: &[&str] = &[
    "COMPSCI",
    "EECS",
    "ELENG",
    "DATA",
    "MATH",
    "STAT",
    "INDENG",
    "PHYSICS",
];

// ---------------------------------------------------------------------------
// Statistics

/// The computing core course; DATA 100 is flagged with a named note
/// instead of a plain rejection
pub const ST_COMPUTING: &str = "STAT 133";

/// Probability courses accepted for the Statistics probability slot
pub const ST_PROBABILITY: &[&str] = &["STAT 134", "DATA 140", "EECS 126", "MATH 106"];

/// The statistics core course
pub const ST_CORE: &str = "STAT 135";

/// Electives that carry a lab component
pub const ST_ELECTIVES_LAB: &[&str] = &[
    "DATA 102",
    "STAT 102",
    "STAT 151A",
    "STAT 152",
    "STAT 153",
    "STAT 154",
    "STAT 156",
    "STAT 158",
    "STAT 159",
];

/// Electives without a lab component
pub const ST_ELECTIVES_NO_LAB: &[&str] = &["STAT 150", "STAT 155", "STAT 157", "STAT 165"];

/// Elective pair with overlapping forecasting content
pub const ST_OVERLAPPING_ELECTIVES: (&str, &str) = ("STAT 157", "STAT 165");

/// Approved cluster courses for the Statistics applied cluster
pub const ST_CLUSTER: &[&str] = &[
    "COMPSCI 161",
    "COMPSCI 170",
    "COMPSCI 186",
    "COMPSCI 188",
    "COMPSCI 189",
    "EECS 126",
    "EECS 127",
    "ECON 100A",
    "ECON 101A",
    "ECON 140",
    "ECON 141",
    "UGBA 103",
    "UGBA 147",
    "MATH 104",
    "MATH 110",
    "MATH 113",
    "MATH 118",
    "MATH 128A",
    "MATH 170",
    "MATH 185",
    "DATA 100",
    "DATA 102",
    "INDENG 160",
    "INDENG 173",
    "PHYSICS 105",
    "PHYSICS 112",
];
