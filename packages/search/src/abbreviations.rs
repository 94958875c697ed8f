//! Street type and directional abbreviation table.
//!
//! Maps the long forms found in survey addresses and user queries to the
//! short forms used for matching. Applied symmetrically to queries and
//! candidate addresses so that "100 NORTH MAIN STREET" matches
//! "100 N MAIN ST".

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Long form to abbreviation, street types first, then directionals.
const TABLE: &[(&str, &str)] = &[
    ("STREET", "ST"),
    ("AVENUE", "AVE"),
    ("BOULEVARD", "BLVD"),
    ("PLACE", "PL"),
    ("ROAD", "RD"),
    ("DRIVE", "DR"),
    ("LANE", "LN"),
    ("COURT", "CT"),
    ("TERRACE", "TER"),
    ("NORTH", "N"),
    ("SOUTH", "S"),
    ("EAST", "E"),
    ("WEST", "W"),
];

static ABBREVIATIONS: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| TABLE.iter().copied().collect());

/// Matches any long form as a whole word.
static LONG_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = TABLE
        .iter()
        .map(|(long, _)| *long)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})\b")).expect("valid regex")
});

/// Returns the abbreviation for a long-form token, or the token
/// unchanged.
#[must_use]
pub fn abbreviate_token(token: &str) -> &str {
    ABBREVIATIONS.get(token).copied().unwrap_or(token)
}

/// Replaces every whole-word long form in an uppercased string.
///
/// Long forms embedded in longer words (`WESTON`, `STREETER`) are left
/// alone.
#[must_use]
pub fn abbreviate(input: &str) -> String {
    LONG_FORM_RE
        .replace_all(input, |caps: &regex::Captures<'_>| {
            abbreviate_token(&caps[0]).to_string()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abbreviates_street_types() {
        assert_eq!(abbreviate_token("STREET"), "ST");
        assert_eq!(abbreviate_token("AVENUE"), "AVE");
        assert_eq!(abbreviate_token("BOULEVARD"), "BLVD");
        assert_eq!(abbreviate_token("TERRACE"), "TER");
    }

    #[test]
    fn abbreviates_directionals() {
        assert_eq!(abbreviate_token("NORTH"), "N");
        assert_eq!(abbreviate_token("WEST"), "W");
    }

    #[test]
    fn passes_through_unknown_tokens() {
        assert_eq!(abbreviate_token("MAIN"), "MAIN");
        assert_eq!(abbreviate_token("ST"), "ST");
        assert_eq!(abbreviate_token("108"), "108");
    }

    #[test]
    fn replaces_whole_words_only() {
        assert_eq!(abbreviate("12 WEST STREET"), "12 W ST");
        assert_eq!(abbreviate("12 WESTON STREETER"), "12 WESTON STREETER");
        assert_eq!(abbreviate("NORTHAMPTON ROAD"), "NORTHAMPTON RD");
    }
}
