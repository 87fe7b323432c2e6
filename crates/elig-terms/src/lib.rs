//! Academic term identifier encoding and parsing
//!
//! This crate handles the four-digit CYYS term codes used by the student
//! records system: a century digit, two year digits, and a season digit
//! (Spring 2, Summer 5, Fall 8). Spring 2026 encodes as 2262.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Season component of a term code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Season {
    Spring,
    Summer,
    Fall,
}

impl Season {
    /// The digit this season occupies in a CYYS code
    pub fn digit(&self) -> u16 {
        match self {
            Season::Spring => 2,
            Season::Summer => 5,
            Season::Fall => 8,
        }
    }

    pub fn from_digit(digit: u16) -> Option<Season> {
        match digit {
            2 => Some(Season::Spring),
            5 => Some(Season::Summer),
            8 => Some(Season::Fall),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Season::Spring => write!(f, "Spring"),
            Season::Summer => write!(f, "Summer"),
            Season::Fall => write!(f, "Fall"),
        }
    }
}

/// A four-digit CYYS term code
///
/// Codes order chronologically, so comparisons like "before the current
/// term" work directly on the wrapped value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TermId(pub u16);

impl TermId {
    /// Calendar year, assuming the 2000s century digit
    pub fn year(&self) -> u16 {
        2000 + (self.0 / 10) % 100
    }

    /// Season, when the trailing digit is a valid season code
    pub fn season(&self) -> Option<Season> {
        Season::from_digit(self.0 % 10)
    }

    pub fn is_summer(&self) -> bool {
        self.0 % 10 == 5
    }

    /// Summer terms fold forward to the Fall of the same year; admits who
    /// start in Summer are treated as starting the following Fall.
    pub fn folded_to_fall(&self) -> TermId {
        if self.is_summer() {
            TermId(self.0 + 3)
        } else {
            *self
        }
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A reported term field: a parsed code, or the original text when the
/// value does not encode a term. Parsing is total; unrecognized input is
/// carried through unchanged rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TermValue {
    Id(TermId),
    Text(String),
}

impl<'de> Deserialize<'de> for TermValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        RawTerm::deserialize(deserializer).map(TermValue::from)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTerm {
    Num(u16),
    Text(String),
}

impl From<RawTerm> for TermValue {
    fn from(raw: RawTerm) -> Self {
        match raw {
            RawTerm::Num(code) => TermValue::Id(TermId(code)),
            RawTerm::Text(text) => parse_term(&text),
        }
    }
}

impl TermValue {
    pub fn id(&self) -> Option<TermId> {
        match self {
            TermValue::Id(id) => Some(*id),
            TermValue::Text(_) => None,
        }
    }

    pub fn is_id(&self) -> bool {
        matches!(self, TermValue::Id(_))
    }
}

impl fmt::Display for TermValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermValue::Id(id) => write!(f, "{id}"),
            TermValue::Text(text) => write!(f, "{text}"),
        }
    }
}

static SHORT_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(sp|su|fa)(\d{2})$").expect("short term pattern"));
static LONG_TERM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)(spring|summer|fall)\s+(\d{4})$").expect("long term pattern"));

/// Parse the compact form: season prefix plus two year digits (`Sp26`,
/// `fa25`), case-insensitive. The century digit is fixed at 2.
pub fn parse_short(input: &str) -> Option<TermId> {
    let lowered = input.to_lowercase();
    let caps = SHORT_TERM.captures(lowered.trim())?;
    let season = match &caps[1] {
        "sp" => Season::Spring,
        "su" => Season::Summer,
        _ => Season::Fall,
    };
    let year: u16 = caps[2].parse().ok()?;
    Some(TermId(2000 + year * 10 + season.digit()))
}

/// Parse the long form: season word plus four-digit year (`Spring 2026`).
/// The code keeps the year's own millennium digit.
pub fn parse_long(input: &str) -> Option<TermId> {
    let caps = LONG_TERM.captures(input.trim())?;
    let season = match caps[1].to_lowercase().as_str() {
        "spring" => Season::Spring,
        "summer" => Season::Summer,
        _ => Season::Fall,
    };
    let year: u16 = caps[2].parse().ok()?;
    Some(TermId((year / 1000) * 1000 + (year % 100) * 10 + season.digit()))
}

/// Parse any reported term form: compact, long, or a bare numeric code.
/// Anything else flows through as text.
pub fn parse_term(input: &str) -> TermValue {
    if let Some(id) = parse_short(input) {
        return TermValue::Id(id);
    }
    if let Some(id) = parse_long(input) {
        return TermValue::Id(id);
    }
    if let Ok(code) = input.trim().parse::<u16>() {
        return TermValue::Id(TermId(code));
    }
    TermValue::Text(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short() {
        assert_eq!(parse_short("Sp26"), Some(TermId(2262)));
        assert_eq!(parse_short("fa25"), Some(TermId(2258)));
        assert_eq!(parse_short("SU24"), Some(TermId(2245)));
        assert_eq!(parse_short(" fa23 "), Some(TermId(2238)));
        assert_eq!(parse_short("sp2026"), None);
        assert_eq!(parse_short("wi26"), None);
        assert_eq!(parse_short("Test Score"), None);
    }

    #[test]
    fn test_parse_long() {
        assert_eq!(parse_long("Spring 2026"), Some(TermId(2262)));
        assert_eq!(parse_long("fall 2025"), Some(TermId(2258)));
        assert_eq!(parse_long("SUMMER 2024"), Some(TermId(2245)));
        assert_eq!(parse_long("Winter 2026"), None);
        assert_eq!(parse_long("Spring 26"), None);
    }

    #[test]
    fn test_parse_term_falls_through_to_text() {
        assert_eq!(parse_term("2262"), TermValue::Id(TermId(2262)));
        assert_eq!(parse_term("Fa23"), TermValue::Id(TermId(2238)));
        assert_eq!(
            parse_term("Test Score"),
            TermValue::Text("Test Score".to_string())
        );
        assert_eq!(parse_term(""), TermValue::Text(String::new()));
    }

    #[test]
    fn test_folded_to_fall() {
        assert_eq!(TermId(2255).folded_to_fall(), TermId(2258));
        assert_eq!(TermId(2262).folded_to_fall(), TermId(2262));
        assert_eq!(TermId(2258).folded_to_fall(), TermId(2258));
    }

    #[test]
    fn test_term_accessors() {
        let term = TermId(2262);
        assert_eq!(term.year(), 2026);
        assert_eq!(term.season(), Some(Season::Spring));
        assert!(!term.is_summer());
        assert!(TermId(2255).is_summer());
        assert_eq!(TermId(2260).season(), None);
    }

    #[test]
    fn test_chronological_ordering() {
        assert!(TermId(2258) < TermId(2262));
        assert!(TermId(2252) < TermId(2255));
        assert!(TermId(2255) < TermId(2258));
    }

    #[test]
    fn test_term_value_deserializes_both_shapes() {
        let id: TermValue = serde_json::from_str("2262").unwrap();
        assert_eq!(id, TermValue::Id(TermId(2262)));

        let short: TermValue = serde_json::from_str("\"Fa23\"").unwrap();
        assert_eq!(short, TermValue::Id(TermId(2238)));

        let text: TermValue = serde_json::from_str("\"Test Score\"").unwrap();
        assert_eq!(text, TermValue::Text("Test Score".to_string()));
    }

    #[test]
    fn test_term_value_serializes_untagged() {
        let json = serde_json::to_string(&TermValue::Id(TermId(2262))).unwrap();
        assert_eq!(json, "2262");
        let json = serde_json::to_string(&TermValue::Text("Other".to_string())).unwrap();
        assert_eq!(json, "\"Other\"");
    }
}
