//! Address normalization for search.
//!
//! A deterministic pipeline applied to both the query and every candidate
//! address, so that "108th St." and "108 ST" compare equal. The pipeline
//! is idempotent: normalizing an already-normalized string is a no-op.

use std::sync::LazyLock;

use regex::Regex;

use crate::abbreviations;

/// A house or street number followed by an ordinal suffix (`108TH`).
static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]+)(?:ST|ND|RD|TH)\b").expect("valid regex"));

/// Normalizes an address or query string.
///
/// The pipeline:
/// 1. Uppercase
/// 2. Strip periods
/// 3. Strip ordinal suffixes (`108TH` → `108`)
/// 4. Abbreviate whole-word street types and directionals (STREET→ST, NORTH→N, etc.)
/// 5. Collapse whitespace and trim
#[must_use]
pub fn normalize(input: &str) -> String {
    let upper = input.to_uppercase().replace('.', "");
    let no_ordinals = ORDINAL_RE.replace_all(&upper, "$1");
    let abbreviated = abbreviations::abbreviate(&no_ordinals);

    abbreviated.split_whitespace().collect::<Vec<_>>().join(" ")
}
