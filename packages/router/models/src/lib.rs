#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Route types for the survey map.
//!
//! A [`Route`] is the typed form of a navigation token:
//!
//! ```text
//! token := "home"
//!        | "property/" id
//!        | "district/" percent-encoded-name
//!        | "search/" percent-encoded-query
//!        | "landmarks"
//!        | "districts"
//!        | "survey" [ "/" dimension [ "/" percent-encoded-value ] ]
//! ```
//!
//! `Display` writes a token and `FromStr` reads one back; the two
//! round-trip for every route whose text payloads are non-blank.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use survey_map_catalog_models::{EntityId, SurveyDimension};
use thiserror::Error;

/// The current view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Route {
    /// Landing view.
    #[default]
    Home,
    /// A single entity.
    Property(EntityId),
    /// A single region and its members.
    District(String),
    /// Full search results for a query.
    Search(String),
    /// Landmarks and district-contributing entities.
    Landmarks,
    /// List of all regions.
    DistrictsList,
    /// Survey dimension picker.
    SurveyRoot,
    /// Values of one survey dimension.
    SurveyDimension(SurveyDimension),
    /// Entities with one value of a survey dimension.
    SurveyDimensionValue(SurveyDimension, String),
}

/// Errors that can occur while parsing a navigation token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteParseError {
    /// The first segment names no route.
    #[error("Unknown route '{0}'")]
    UnknownRoute(String),

    /// A route that needs a payload had none, or a blank one.
    #[error("Route '{route}' requires a non-blank payload")]
    MissingPayload {
        /// Route head (e.g. `"district"`).
        route: &'static str,
    },

    /// Property id was not a non-negative integer.
    #[error("Invalid property id '{0}'")]
    InvalidId(String),

    /// Survey dimension segment was not recognized.
    #[error("Unknown survey dimension '{0}'")]
    UnknownDimension(String),

    /// Payload percent-decoded to invalid UTF-8.
    #[error("Invalid percent-encoding in '{0}'")]
    InvalidEncoding(String),

    /// More segments than the route accepts.
    #[error("Unexpected trailing segments in '{0}'")]
    TrailingSegments(String),
}

impl Route {
    /// Parses a token, falling back to [`Route::Home`] for anything
    /// unrecognized.
    #[must_use]
    pub fn parse_or_home(token: &str) -> Self {
        token.parse().unwrap_or_else(|e: RouteParseError| {
            log::debug!("Unrecognized navigation token {token:?}: {e}; resolving to home");
            Self::Home
        })
    }

    /// Returns `true` for [`Route::Property`].
    #[must_use]
    pub const fn is_property(&self) -> bool {
        matches!(self, Self::Property(_))
    }
}

fn decode(raw: &str, route: &'static str) -> Result<String, RouteParseError> {
    let decoded = urlencoding::decode(raw)
        .map_err(|_| RouteParseError::InvalidEncoding(raw.to_string()))?
        .into_owned();

    if decoded.trim().is_empty() {
        return Err(RouteParseError::MissingPayload { route });
    }

    Ok(decoded)
}

fn dimension(raw: &str) -> Result<SurveyDimension, RouteParseError> {
    raw.parse()
        .map_err(|_| RouteParseError::UnknownDimension(raw.to_string()))
}

impl FromStr for Route {
    type Err = RouteParseError;

    /// Parses a token. A leading `#` and surrounding `/` are ignored, and
    /// an empty token is [`Route::Home`].
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let trimmed = token.trim().trim_start_matches('#').trim_matches('/');

        if trimmed.is_empty() {
            return Ok(Self::Home);
        }

        let segments: Vec<&str> = trimmed.split('/').collect();

        match segments.as_slice() {
            ["home"] => Ok(Self::Home),
            ["landmarks"] => Ok(Self::Landmarks),
            ["districts"] => Ok(Self::DistrictsList),
            ["survey"] => Ok(Self::SurveyRoot),
            ["property", id] => id
                .parse()
                .map(Self::Property)
                .map_err(|_| RouteParseError::InvalidId((*id).to_string())),
            ["district", name] => decode(name, "district").map(Self::District),
            ["search", query] => decode(query, "search").map(Self::Search),
            ["survey", dim] => dimension(dim).map(Self::SurveyDimension),
            ["survey", dim, value] => Ok(Self::SurveyDimensionValue(
                dimension(dim)?,
                decode(value, "survey")?,
            )),
            ["property"] => Err(RouteParseError::MissingPayload { route: "property" }),
            ["district"] => Err(RouteParseError::MissingPayload { route: "district" }),
            ["search"] => Err(RouteParseError::MissingPayload { route: "search" }),
            [
                "home" | "landmarks" | "districts" | "survey" | "property" | "district" | "search",
                ..,
            ] => Err(RouteParseError::TrailingSegments(trimmed.to_string())),
            [head, ..] => Err(RouteParseError::UnknownRoute((*head).to_string())),
            [] => Ok(Self::Home),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Property(id) => write!(f, "property/{id}"),
            Self::District(name) => write!(f, "district/{}", urlencoding::encode(name)),
            Self::Search(query) => write!(f, "search/{}", urlencoding::encode(query)),
            Self::Landmarks => f.write_str("landmarks"),
            Self::DistrictsList => f.write_str("districts"),
            Self::SurveyRoot => f.write_str("survey"),
            Self::SurveyDimension(dim) => write!(f, "survey/{dim}"),
            Self::SurveyDimensionValue(dim, value) => {
                write!(f, "survey/{dim}/{}", urlencoding::encode(value))
            }
        }
    }
}

impl From<Route> for String {
    fn from(route: Route) -> Self {
        route.to_string()
    }
}

impl TryFrom<String> for Route {
    type Error = RouteParseError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

/// A region filter that survives property-to-property navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "camelCase")]
pub enum DistrictContext {
    /// Locked to one region.
    Region(String),
    /// Every region visible, none selected.
    AllRegions,
}
