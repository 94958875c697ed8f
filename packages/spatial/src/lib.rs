#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! In-memory region membership index.
//!
//! Built once after load from entity centroids and region polygons, then
//! read on every navigation. Entity centroids go into an R-tree; each
//! region's envelope is queried against it and the candidates are tested
//! with point-in-polygon containment.
//!
//! Regions may overlap. Each region's member list is computed
//! independently, so an entity can belong to several regions, but the
//! reverse lookup ([`MembershipIndex::region_of`]) names only the first
//! region in input order that contains it.

use std::collections::{BTreeMap, BTreeSet};

use geo::{BoundingRect, Contains, MultiPolygon};
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};
use survey_map_catalog::Region;
use survey_map_catalog_models::{Entity, EntityId};

/// An entity centroid stored in the R-tree, tagged with its input position.
type CentroidEntry = GeomWithData<[f64; 2], usize>;

/// Members of one region, in entity input order.
#[derive(Debug, Clone, Default)]
struct Members {
    ordered: Vec<EntityId>,
    set: BTreeSet<EntityId>,
}

/// Bidirectional region/entity membership.
///
/// Invariant: if `region_of(e) == Some(r)` then `entities_in(r)` contains
/// `e`. Entities without a centroid appear in neither direction.
#[derive(Debug, Clone, Default)]
pub struct MembershipIndex {
    regions: Vec<String>,
    forward: BTreeMap<String, Members>,
    reverse: BTreeMap<EntityId, String>,
}

impl MembershipIndex {
    /// Builds the index.
    ///
    /// Regions are visited in input order; within a region, members are
    /// recorded in entity input order.
    #[must_use]
    pub fn build(entities: &[Entity], regions: &[Region]) -> Self {
        let centroids: RTree<CentroidEntry> = RTree::bulk_load(
            entities
                .iter()
                .enumerate()
                .filter_map(|(i, e)| e.centroid.map(|c| CentroidEntry::new([c.lng, c.lat], i)))
                .collect(),
        );

        log::info!(
            "Building membership index: {} regions x {} located entities",
            regions.len(),
            centroids.size()
        );

        let mut index = Self::default();

        for region in regions {
            if index.forward.contains_key(&region.name) {
                log::warn!("Duplicate region name '{}' ignored by index", region.name);
                continue;
            }

            let members = Self::members_of(region, entities, &centroids);

            for id in &members.ordered {
                index
                    .reverse
                    .entry(*id)
                    .or_insert_with(|| region.name.clone());
            }

            log::debug!(
                "Region '{}' contains {} entities",
                region.name,
                members.ordered.len()
            );

            index.regions.push(region.name.clone());
            index.forward.insert(region.name.clone(), members);
        }

        log::info!(
            "Membership index built: {} of {} entities attributed to a region",
            index.reverse.len(),
            entities.len()
        );

        index
    }

    fn members_of(
        region: &Region,
        entities: &[Entity],
        centroids: &RTree<CentroidEntry>,
    ) -> Members {
        let Some(envelope) = compute_envelope(&region.polygon) else {
            log::warn!(
                "Region '{}' has an empty polygon; it will have no members",
                region.name
            );
            return Members::default();
        };

        let mut positions: Vec<usize> = centroids
            .locate_in_envelope(&envelope)
            .map(|entry| entry.data)
            .filter(|&i| {
                let point = centroid_point(&entities[i]);
                point.is_some_and(|p| region.polygon.contains(&p))
            })
            .collect();
        positions.sort_unstable();

        let ordered: Vec<EntityId> = positions.into_iter().map(|i| entities[i].id).collect();
        let set = ordered.iter().copied().collect();

        Members { ordered, set }
    }

    /// Entities whose centroid lies inside the named region, in entity
    /// input order. Unknown regions have no members.
    #[must_use]
    pub fn entities_in(&self, region: &str) -> &[EntityId] {
        self.forward
            .get(region)
            .map(|m| m.ordered.as_slice())
            .unwrap_or_default()
    }

    /// The first region (in input order) containing the entity's centroid.
    #[must_use]
    pub fn region_of(&self, id: EntityId) -> Option<&str> {
        self.reverse.get(&id).map(String::as_str)
    }

    /// Returns `true` if the entity is a member of the named region.
    #[must_use]
    pub fn contains(&self, region: &str, id: EntityId) -> bool {
        self.forward
            .get(region)
            .is_some_and(|m| m.set.contains(&id))
    }

    /// Returns `true` if the region was indexed.
    #[must_use]
    pub fn has_region(&self, region: &str) -> bool {
        self.forward.contains_key(region)
    }

    /// Indexed region names in input order.
    pub fn region_names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(String::as_str)
    }

    /// Number of indexed regions.
    #[must_use]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Number of entities attributed to some region.
    #[must_use]
    pub fn attributed_count(&self) -> usize {
        self.reverse.len()
    }
}

fn centroid_point(entity: &Entity) -> Option<geo::Point<f64>> {
    entity.centroid.map(|c| geo::Point::new(c.lng, c.lat))
}

/// Compute the bounding box envelope for a [`MultiPolygon`].
fn compute_envelope(mp: &MultiPolygon<f64>) -> Option<AABB<[f64; 2]>> {
    mp.bounding_rect()
        .map(|rect| AABB::from_corners([rect.min().x, rect.min().y], [rect.max().x, rect.max().y]))
}
