#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Typo-tolerant address search.
//!
//! Queries and candidate addresses are normalized with the same pipeline
//! ([`normalize::normalize`]) and then scored:
//!
//! * prefix match: `-1`
//! * substring match: `0`
//! * otherwise the edit distance between the query and the candidate's
//!   prefix of the same length, dropped when it reaches
//!   [`SearchConfig::max_distance`]
//!
//! Results are sorted by ascending score; equal scores keep input order.

pub mod abbreviations;
pub mod normalize;

use serde::{Deserialize, Serialize};
use survey_map_catalog_models::{Entity, EntityId};

/// Search tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Minimum normalized query length for full searches and lookups.
    #[serde(default = "default_full_min_length")]
    pub full_min_length: usize,

    /// Minimum normalized query length for inline suggestions.
    #[serde(default = "default_suggest_min_length")]
    pub suggest_min_length: usize,

    /// Maximum number of inline suggestions.
    #[serde(default = "default_suggest_limit")]
    pub suggest_limit: usize,

    /// Maximum number of lookup results.
    #[serde(default = "default_lookup_limit")]
    pub lookup_limit: usize,

    /// Candidates at or above this edit distance are excluded.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,
}

const fn default_full_min_length() -> usize {
    3
}

const fn default_suggest_min_length() -> usize {
    2
}

const fn default_suggest_limit() -> usize {
    5
}

const fn default_lookup_limit() -> usize {
    10
}

const fn default_max_distance() -> usize {
    10
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            full_min_length: default_full_min_length(),
            suggest_min_length: default_suggest_min_length(),
            suggest_limit: default_suggest_limit(),
            lookup_limit: default_lookup_limit(),
            max_distance: default_max_distance(),
        }
    }
}

/// Which caller is searching. Determines the minimum query length and
/// the result cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Full result set for a search route. Unbounded.
    Full,
    /// Inline suggestion list while typing.
    Suggest,
    /// Broader lookup.
    Lookup,
}

impl SearchMode {
    /// Minimum normalized query length for this mode.
    #[must_use]
    pub const fn min_length(self, config: &SearchConfig) -> usize {
        match self {
            Self::Full | Self::Lookup => config.full_min_length,
            Self::Suggest => config.suggest_min_length,
        }
    }

    /// Result cap for this mode, `None` for unbounded.
    #[must_use]
    pub const fn limit(self, config: &SearchConfig) -> Option<usize> {
        match self {
            Self::Full => None,
            Self::Suggest => Some(config.suggest_limit),
            Self::Lookup => Some(config.lookup_limit),
        }
    }
}

/// A ranked match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    /// Matched entity.
    pub id: EntityId,
    /// Match score; lower is better.
    pub score: i32,
}

/// Result of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SearchOutcome {
    /// The query was too short to search. Distinct from an empty result.
    InsufficientInput {
        /// Required minimum normalized length.
        min_length: usize,
    },
    /// Ranked matches (possibly empty).
    Matches {
        /// Hits, best first.
        hits: Vec<SearchHit>,
    },
}

impl SearchOutcome {
    /// Matched ids in rank order. Empty for insufficient input.
    #[must_use]
    pub fn ids(&self) -> Vec<EntityId> {
        match self {
            Self::InsufficientInput { .. } => Vec::new(),
            Self::Matches { hits } => hits.iter().map(|h| h.id).collect(),
        }
    }
}

/// Scores a normalized candidate against a normalized query.
///
/// Returns `None` when the candidate should be excluded.
#[must_use]
pub fn score(query: &str, candidate: &str, max_distance: usize) -> Option<i32> {
    if candidate.starts_with(query) {
        return Some(-1);
    }
    if candidate.contains(query) {
        return Some(0);
    }

    let prefix: String = candidate.chars().take(query.chars().count()).collect();
    let distance = strsim::levenshtein(query, &prefix);

    (distance < max_distance).then(|| i32::try_from(distance).unwrap_or(i32::MAX))
}

/// Ranks `(id, address)` candidates against a query.
///
/// Candidates with blank addresses never match.
#[must_use]
pub fn rank<I, S>(
    query: &str,
    candidates: I,
    mode: SearchMode,
    config: &SearchConfig,
) -> SearchOutcome
where
    I: IntoIterator<Item = (EntityId, S)>,
    S: AsRef<str>,
{
    let query = normalize::normalize(query);
    let min_length = mode.min_length(config);

    if query.chars().count() < min_length {
        log::debug!("Search query {query:?} below minimum length {min_length}");
        return SearchOutcome::InsufficientInput { min_length };
    }

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter_map(|(id, address)| {
            let candidate = normalize::normalize(address.as_ref());
            if candidate.is_empty() {
                return None;
            }
            score(&query, &candidate, config.max_distance)
                .map(|score| SearchHit { id, score })
        })
        .collect();

    hits.sort_by_key(|hit| hit.score);

    if let Some(limit) = mode.limit(config) {
        hits.truncate(limit);
    }

    log::debug!(
        "Search {query:?} ({mode:?}) matched {} entities",
        hits.len()
    );

    SearchOutcome::Matches { hits }
}

/// Searches entity addresses.
#[must_use]
pub fn search(
    query: &str,
    entities: &[Entity],
    mode: SearchMode,
    config: &SearchConfig,
) -> SearchOutcome {
    rank(
        query,
        entities.iter().map(|e| (e.id, e.address.full())),
        mode,
        config,
    )
}
