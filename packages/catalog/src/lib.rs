#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey input loading and one-time preprocessing.
//!
//! Parses the entity and region `GeoJSON` collections into typed records,
//! derives each entity's decade bucket and centroid exactly once, and
//! holds the result as an immutable [`Catalog`] for the rest of the
//! session. Input defects are logged and the offending record is skipped
//! or degraded; nothing here fails on bad data except unreadable input.

pub mod input;
pub mod preprocess;
pub mod records;

use std::collections::BTreeMap;

use survey_map_catalog_models::{Entity, EntityId};
use thiserror::Error;

pub use records::{EntityRecord, Region, merge_regions};

/// Errors that can occur while loading survey input.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading an input file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input was not valid `GeoJSON`.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON property conversion failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input was well-formed but not shaped as expected.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Description of what went wrong.
        message: String,
    },
}

/// The loaded, preprocessed dataset.
///
/// Entities keep their input order; ids are unique (later duplicates are
/// dropped at construction). Regions keep their merged input order with
/// unique names.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
    regions: Vec<Region>,
    positions: BTreeMap<EntityId, usize>,
}

impl Catalog {
    /// Builds a catalog from already-preprocessed entities.
    #[must_use]
    pub fn new(entities: Vec<Entity>, regions: Vec<Region>) -> Self {
        let mut positions = BTreeMap::new();
        let mut unique = Vec::with_capacity(entities.len());

        for entity in entities {
            if positions.contains_key(&entity.id) {
                log::warn!(
                    "Duplicate entity id {}; keeping the first record",
                    entity.id
                );
                continue;
            }
            positions.insert(entity.id, unique.len());
            unique.push(entity);
        }

        let regions = merge_regions([regions]);

        Self {
            entities: unique,
            regions,
            positions,
        }
    }

    /// Preprocesses raw records and builds the catalog.
    #[must_use]
    pub fn from_records(records: Vec<EntityRecord>, regions: Vec<Region>) -> Self {
        Self::new(preprocess::preprocess(records), regions)
    }

    /// All entities in input order.
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// All regions in input order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Looks up an entity by id.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.positions.get(&id).map(|&i| &self.entities[i])
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if no entities were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_map_catalog_models::{Address, EntityAttributes};

    fn entity(id: u64) -> Entity {
        Entity {
            id: EntityId(id),
            address: Address::default(),
            attributes: EntityAttributes::default(),
            centroid: None,
        }
    }

    #[test]
    fn drops_duplicate_entity_ids() {
        let mut dup = entity(1);
        dup.attributes.color = Some("Red".to_string());
        let catalog = Catalog::new(vec![entity(1), entity(2), dup], vec![]);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entity(EntityId(1)).unwrap().attributes.color, None);
        assert_eq!(catalog.entities()[1].id, EntityId(2));
        assert!(catalog.entity(EntityId(3)).is_none());
    }
}
