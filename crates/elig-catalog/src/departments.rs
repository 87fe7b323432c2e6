//! Department rewrite rules applied during course-name normalization

/// A department-prefix rewrite. The rule applies only at the start of a
/// course string and only when the prefix ends at a word boundary or runs
/// straight into the course number, so `CS 61A` rewrites while `CSE 100`
/// does not.
#[derive(Debug, Clone, Copy)]
pub struct RewriteRule {
    pub from: &'static str,
    pub to: &'static str,
}

impl RewriteRule {
    pub fn matches(&self, course: &str) -> bool {
        let Some(rest) = course.strip_prefix(self.from) else {
            return false;
        };
        match rest.chars().next() {
            None => true,
            Some(c) => c.is_ascii_digit() || !(c.is_ascii_alphanumeric() || c == '_'),
        }
    }

    pub fn apply(&self, course: &str) -> Option<String> {
        if self.matches(course) {
            Some(format!("{}{}", self.to, &course[self.from.len()..]))
        } else {
            None
        }
    }
}

/// Abbreviations and long forms mapped to the canonical catalog
/// department. Evaluated in order, first match wins, applied at most once.
pub const REWRITE_RULES: &[RewriteRule] = &[
    RewriteRule { from: "CS", to: "COMPSCI" },
    RewriteRule { from: "EE", to: "EECS" },
    RewriteRule { from: "SOCIOLOGY", to: "SOCIOL" },
    RewriteRule { from: "STATISTICS", to: "STAT" },
    RewriteRule { from: "STATS", to: "STAT" },
    RewriteRule { from: "ECO", to: "ECON" },
    RewriteRule { from: "BIO", to: "BIOLOGY" },
    RewriteRule { from: "MATHEMATICS", to: "MATH" },
    RewriteRule { from: "MCB", to: "MCELLBI" },
    RewriteRule { from: "CIV", to: "CIVENG" },
    RewriteRule { from: "PHIL", to: "PHILOS" },
];

/// First matching rewrite, or `None` when no rule applies
pub fn rewrite_department(course: &str) -> Option<String> {
    REWRITE_RULES.iter().find_map(|rule| rule.apply(course))
}

/// Course names that represent external exam credit rather than campus
/// enrollments, compared after normalization
pub const TEST_SCORE_COURSES: &[&str] =
    &["CALC BC", "CALC AB", "A-LEVEL FURTHER MATH", "HL MATH"];

pub fn is_test_score_course(course: &str) -> bool {
    TEST_SCORE_COURSES.contains(&course)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_at_number_boundary() {
        assert_eq!(rewrite_department("CS 61A"), Some("COMPSCI 61A".to_string()));
        assert_eq!(rewrite_department("CS61A"), Some("COMPSCI61A".to_string()));
        assert_eq!(rewrite_department("EE 16A"), Some("EECS 16A".to_string()));
        assert_eq!(rewrite_department("STATS 20"), Some("STAT 20".to_string()));
    }

    #[test]
    fn test_rewrite_requires_boundary() {
        // CSE is a different department
        assert_eq!(rewrite_department("CSE 100"), None);
        // ECON already canonical; ECO only matches at a boundary
        assert_eq!(rewrite_department("ECON 1"), None);
        assert_eq!(rewrite_department("ECO 1"), Some("ECON 1".to_string()));
        assert_eq!(rewrite_department("BIOLOGY 1A"), None);
        assert_eq!(rewrite_department("BIO 1A"), Some("BIOLOGY 1A".to_string()));
    }

    #[test]
    fn test_first_match_wins() {
        // STATISTICS is listed before STATS and must win
        assert_eq!(
            rewrite_department("STATISTICS 134"),
            Some("STAT 134".to_string())
        );
        assert_eq!(
            rewrite_department("MATHEMATICS 1B"),
            Some("MATH 1B".to_string())
        );
    }

    #[test]
    fn test_rewrites_are_stable() {
        // no rule output matches another rule's prefix at a boundary
        for rule in REWRITE_RULES {
            let rewritten = format!("{} 101", rule.to);
            assert_eq!(rewrite_department(&rewritten), None, "{rewritten}");
        }
    }

    #[test]
    fn test_test_score_courses() {
        assert!(is_test_score_course("CALC BC"));
        assert!(is_test_score_course("HL MATH"));
        assert!(!is_test_score_course("MATH 1A"));
    }
}
