#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey catalog types shared across the survey map.
//!
//! These are the preprocessed, read-only records the rest of the system
//! works against: entities (survey-listed buildings), their categorical
//! attributes, and the small coordinate types used for containment and
//! viewport tests. Geometry-heavy input records live in
//! `survey_map_catalog`; this crate has no geometry dependencies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Stable identity of a surveyed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// A WGS84 point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl Coordinates {
    /// Creates a coordinate pair.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` if both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// An axis-aligned map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl BoundingBox {
    /// Returns `true` if the point lies inside the box (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: &Coordinates) -> bool {
        point.lng >= self.west
            && point.lng <= self.east
            && point.lat >= self.south
            && point.lat <= self.north
    }
}

/// Error returned when a bounding box string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidBoundingBoxError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for InvalidBoundingBoxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid bounding box '{}': expected west,south,east,north",
            self.input
        )
    }
}

impl std::error::Error for InvalidBoundingBoxError {}

impl FromStr for BoundingBox {
    type Err = InvalidBoundingBoxError;

    /// Parses `west,south,east,north`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || InvalidBoundingBoxError {
            input: s.to_string(),
        };

        let parts = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| err())?;

        let [west, south, east, north] = parts.as_slice() else {
            return Err(err());
        };

        if west > east || south > north {
            return Err(err());
        }

        Ok(Self {
            west: *west,
            south: *south,
            east: *east,
            north: *north,
        })
    }
}

/// The categorical dimensions an entity can be browsed by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SurveyDimension {
    /// Survey rating color.
    Color,
    /// Construction decade bucket.
    Decade,
    /// Architect of record.
    Architect,
    /// Building style.
    Style,
}

/// Construction-decade bucket derived from the free-text built date.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    IntoStaticStr,
)]
pub enum DecadeBucket {
    #[serde(rename = "1870s or earlier")]
    #[strum(serialize = "1870s or earlier")]
    Before1880,
    #[serde(rename = "1880s")]
    #[strum(serialize = "1880s")]
    Decade1880s,
    #[serde(rename = "1890s")]
    #[strum(serialize = "1890s")]
    Decade1890s,
    #[serde(rename = "1900s")]
    #[strum(serialize = "1900s")]
    Decade1900s,
    #[serde(rename = "1910s")]
    #[strum(serialize = "1910s")]
    Decade1910s,
    #[serde(rename = "1920s")]
    #[strum(serialize = "1920s")]
    Decade1920s,
    #[serde(rename = "1930s")]
    #[strum(serialize = "1930s")]
    Decade1930s,
    #[serde(rename = "1940 or later")]
    #[strum(serialize = "1940 or later")]
    From1940,
}

/// Inclusive lower year bound of each bounded bucket, oldest first.
const DECADE_TABLE: &[(i32, DecadeBucket)] = &[
    (1880, DecadeBucket::Decade1880s),
    (1890, DecadeBucket::Decade1890s),
    (1900, DecadeBucket::Decade1900s),
    (1910, DecadeBucket::Decade1910s),
    (1920, DecadeBucket::Decade1920s),
    (1930, DecadeBucket::Decade1930s),
    (1940, DecadeBucket::From1940),
];

impl DecadeBucket {
    /// Maps a construction year onto its bucket.
    #[must_use]
    pub fn from_year(year: i32) -> Self {
        DECADE_TABLE
            .iter()
            .rev()
            .find(|(start, _)| year >= *start)
            .map_or(Self::Before1880, |(_, bucket)| *bucket)
    }

    /// Display label (e.g. `"1880s"`).
    #[must_use]
    pub fn label(self) -> &'static str {
        self.into()
    }
}

/// Street address of an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// House number, kept as text (`"12A"`, `"100-102"`).
    pub house_number: Option<String>,
    /// Street name (`"MAIN ST"`).
    pub street: String,
}

impl Address {
    /// Single-line form used for display and search.
    #[must_use]
    pub fn full(&self) -> String {
        match self.house_number.as_deref().map(str::trim) {
            Some(number) if !number.is_empty() => format!("{number} {}", self.street.trim()),
            _ => self.street.trim().to_string(),
        }
    }
}

/// Categorical attributes recorded by the survey.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityAttributes {
    /// Survey rating color (e.g. `"Red"`).
    pub color: Option<String>,
    /// Built date exactly as recorded (e.g. `"ca. 1895"`).
    pub built: Option<String>,
    /// Decade bucket derived from [`Self::built`].
    pub decade: Option<DecadeBucket>,
    /// Architect of record.
    pub architect: Option<String>,
    /// Building style.
    pub style: Option<String>,
    /// Individually designated landmark.
    pub landmark: bool,
    /// Contributes to a historic district.
    pub contributing: bool,
}

/// A preprocessed survey entity.
///
/// Built once from an input record with its derived fields (decade and
/// centroid) attached; read-only for the rest of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique entity identifier.
    pub id: EntityId,
    /// Street address.
    pub address: Address,
    /// Categorical attributes.
    pub attributes: EntityAttributes,
    /// Representative point, or `None` if the geometry was degenerate.
    pub centroid: Option<Coordinates>,
}

impl Entity {
    /// Returns the entity's value for a categorical dimension.
    ///
    /// Blank values count as absent.
    #[must_use]
    pub fn dimension_value(&self, dimension: SurveyDimension) -> Option<&str> {
        let value = match dimension {
            SurveyDimension::Color => self.attributes.color.as_deref(),
            SurveyDimension::Decade => self.attributes.decade.map(DecadeBucket::label),
            SurveyDimension::Architect => self.attributes.architect.as_deref(),
            SurveyDimension::Style => self.attributes.style.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Landmark or district-contributing.
    #[must_use]
    pub const fn is_landmark_or_contributing(&self) -> bool {
        self.attributes.landmark || self.attributes.contributing
    }
}
