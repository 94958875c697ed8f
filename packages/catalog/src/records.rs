//! Raw input record types.
//!
//! [`EntityRecord`] is an entity as it arrives from the loader, still
//! carrying its geometry. Preprocessing turns it into a
//! [`survey_map_catalog_models::Entity`] and the geometry is dropped.
//! [`Region`] is kept as-is for the lifetime of the session.

use std::collections::BTreeSet;

use geo::MultiPolygon;
use survey_map_catalog_models::{Address, Coordinates, EntityAttributes, EntityId};

/// An entity before preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    /// Unique entity identifier.
    pub id: EntityId,
    /// Street address.
    pub address: Address,
    /// Categorical attributes. `decade` is always `None` here; it is
    /// derived from `built` during preprocessing.
    pub attributes: EntityAttributes,
    /// Footprint or point geometry, if any.
    pub geometry: Option<geo::Geometry<f64>>,
    /// Precomputed representative point supplied by the input, if any.
    pub position: Option<Coordinates>,
}

impl EntityRecord {
    /// Creates a record with no attributes or geometry.
    #[must_use]
    pub fn new(id: EntityId, address: Address) -> Self {
        Self {
            id,
            address,
            attributes: EntityAttributes::default(),
            geometry: None,
            position: None,
        }
    }
}

/// A named region polygon (historic district).
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Unique region name.
    pub name: String,
    /// Display color as given by the input (e.g. `"#c0392b"`).
    pub color: Option<String>,
    /// Region boundary.
    pub polygon: MultiPolygon<f64>,
}

impl Region {
    /// Creates a region without a display color.
    #[must_use]
    pub fn new(name: impl Into<String>, polygon: MultiPolygon<f64>) -> Self {
        Self {
            name: name.into(),
            color: None,
            polygon,
        }
    }
}

/// Concatenates region collections into one logical region set.
///
/// Order is preserved: every region of the first collection comes before
/// any region of the second, and so on. A name seen again later is an
/// input contract violation; the later region is dropped with a warning.
#[must_use]
pub fn merge_regions<I>(collections: I) -> Vec<Region>
where
    I: IntoIterator<Item = Vec<Region>>,
{
    let mut seen = BTreeSet::new();
    let mut merged = Vec::new();

    for region in collections.into_iter().flatten() {
        if !seen.insert(region.name.clone()) {
            log::warn!("Duplicate region name '{}'; keeping the first", region.name);
            continue;
        }
        merged.push(region);
    }

    merged
}
