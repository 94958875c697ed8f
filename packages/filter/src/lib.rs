#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter and highlight composition.
//!
//! Named base filters ([`FilterKey`]) resolve to entity subsets that are
//! cached for the session, since the catalog and index never change after
//! load. A viewport narrowing is applied on top of the cached subset on
//! every request and is never cached itself. The composer also owns the
//! exclusive highlight state.

pub mod highlight;
pub mod predicate;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator as _;
use survey_map_catalog::Catalog;
use survey_map_catalog_models::{BoundingBox, DecadeBucket, EntityId, SurveyDimension};
use survey_map_spatial::MembershipIndex;

pub use highlight::{HighlightOrigin, HighlightState};
pub use predicate::{Predicate, predicate_for};

/// A cacheable base filter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FilterKey {
    /// Categorical dimension, optionally narrowed to one value.
    Dimension {
        /// Dimension to test.
        dimension: SurveyDimension,
        /// Required value, or `None` for any value.
        value: Option<String>,
    },
    /// Members of a region.
    Region {
        /// Region name.
        name: String,
    },
    /// Landmarks and district-contributing entities.
    LandmarkOrContributing,
}

impl FilterKey {
    /// Region membership filter.
    #[must_use]
    pub fn region(name: impl Into<String>) -> Self {
        Self::Region { name: name.into() }
    }

    /// Categorical filter.
    #[must_use]
    pub fn dimension(dimension: SurveyDimension, value: Option<&str>) -> Self {
        Self::Dimension {
            dimension,
            value: value.map(ToString::to_string),
        }
    }

    /// The predicate this key stands for.
    #[must_use]
    pub fn predicate(&self) -> Predicate {
        match self {
            Self::Dimension { dimension, value } => predicate_for(*dimension, value.as_deref()),
            Self::Region { name } => Predicate::Region(name.clone()),
            Self::LandmarkOrContributing => Predicate::LandmarkOrContributing,
        }
    }

    /// Highlight origin for a highlight produced by this filter.
    #[must_use]
    pub fn origin(&self) -> HighlightOrigin {
        HighlightOrigin(match self {
            Self::Dimension {
                dimension,
                value: None,
            } => dimension.to_string(),
            Self::Dimension {
                dimension,
                value: Some(value),
            } => format!("{dimension}/{value}"),
            Self::Region { name } => format!("district/{name}"),
            Self::LandmarkOrContributing => "landmarks".to_string(),
        })
    }
}

/// A distinct dimension value and how many entities carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facet {
    /// Dimension value label.
    pub value: String,
    /// Number of matching entities.
    pub count: usize,
}

/// Subset cache plus highlight state.
#[derive(Debug, Clone, Default)]
pub struct FilterComposer {
    cache: BTreeMap<FilterKey, Vec<EntityId>>,
    highlight: HighlightState,
}

impl FilterComposer {
    /// Creates an empty composer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities matching `key`, optionally narrowed to a viewport, in
    /// entity input order.
    pub fn subset(
        &mut self,
        key: &FilterKey,
        viewport: Option<&BoundingBox>,
        catalog: &Catalog,
        index: &MembershipIndex,
    ) -> Vec<EntityId> {
        let base = self.base_subset(key, catalog, index);

        let Some(bbox) = viewport else {
            return base.to_vec();
        };

        let visible = Predicate::Viewport(*bbox);
        base.iter()
            .copied()
            .filter(|id| {
                catalog
                    .entity(*id)
                    .is_some_and(|e| visible.matches(e, index))
            })
            .collect()
    }

    fn base_subset(
        &mut self,
        key: &FilterKey,
        catalog: &Catalog,
        index: &MembershipIndex,
    ) -> &[EntityId] {
        self.cache.entry(key.clone()).or_insert_with(|| {
            log::debug!("Computing subset for {key:?}");
            key.predicate().select(catalog.entities(), index)
        })
    }

    /// Returns `true` if the base subset for `key` is cached.
    #[must_use]
    pub fn is_cached(&self, key: &FilterKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Drops every cached subset.
    pub fn invalidate(&mut self) {
        self.cache.clear();
    }

    /// Distinct values of a dimension with entity counts, optionally
    /// restricted to a viewport.
    ///
    /// Values that differ only in ASCII case are counted together under the
    /// first spelling seen, matching how a dimension filter compares them.
    /// Decades are listed in chronological order; other dimensions
    /// alphabetically.
    #[must_use]
    pub fn facets(
        dimension: SurveyDimension,
        viewport: Option<&BoundingBox>,
        catalog: &Catalog,
        index: &MembershipIndex,
    ) -> Vec<Facet> {
        let mut scope = predicate_for(dimension, None);
        if let Some(bbox) = viewport {
            scope = scope.and(Predicate::Viewport(*bbox));
        }
        let visible = catalog
            .entities()
            .iter()
            .filter(|e| scope.matches(e, index));

        if dimension == SurveyDimension::Decade {
            let mut counts: BTreeMap<DecadeBucket, usize> = BTreeMap::new();
            for bucket in visible.filter_map(|e| e.attributes.decade) {
                *counts.entry(bucket).or_default() += 1;
            }
            return DecadeBucket::iter()
                .filter_map(|bucket| {
                    counts.get(&bucket).map(|&count| Facet {
                        value: bucket.label().to_string(),
                        count,
                    })
                })
                .collect();
        }

        let mut counts: BTreeMap<String, Facet> = BTreeMap::new();
        for value in visible.filter_map(|e| e.dimension_value(dimension)) {
            counts
                .entry(value.to_ascii_lowercase())
                .or_insert_with(|| Facet {
                    value: value.to_string(),
                    count: 0,
                })
                .count += 1;
        }
        counts.into_values().collect()
    }

    /// Toggles the highlight owned by a filter's subset. Returns `true` if
    /// a highlight is active afterwards.
    pub fn toggle_filter_highlight(
        &mut self,
        key: &FilterKey,
        viewport: Option<&BoundingBox>,
        catalog: &Catalog,
        index: &MembershipIndex,
    ) -> bool {
        let ids = self.subset(key, viewport, catalog, index);
        self.highlight.toggle(key.origin(), ids)
    }

    /// Unconditionally clears the highlight.
    pub fn clear_highlight(&mut self) {
        self.highlight.clear();
    }

    /// Current highlight state.
    #[must_use]
    pub const fn highlight(&self) -> &HighlightState {
        &self.highlight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, polygon};
    use survey_map_catalog::Region;
    use survey_map_catalog_models::{Address, Coordinates, Entity, EntityAttributes};

    fn entity(id: u64, decade: Option<DecadeBucket>, style: Option<&str>, lng: f64) -> Entity {
        Entity {
            id: EntityId(id),
            address: Address::default(),
            attributes: EntityAttributes {
                decade,
                style: style.map(ToString::to_string),
                contributing: id % 2 == 0,
                ..EntityAttributes::default()
            },
            centroid: Some(Coordinates::new(0.5, lng)),
        }
    }

    fn fixture() -> (Catalog, MembershipIndex) {
        let entities = vec![
            entity(1, Some(DecadeBucket::Decade1920s), Some("Tudor"), 0.5),
            entity(2, Some(DecadeBucket::Decade1880s), Some("Colonial"), 1.5),
            entity(3, Some(DecadeBucket::Decade1920s), Some("Tudor"), 2.5),
            entity(4, None, None, 0.25),
        ];
        let region = Region::new(
            "Elm Park",
            MultiPolygon(vec![polygon![
                (x: 0.0, y: 0.0),
                (x: 2.0, y: 0.0),
                (x: 2.0, y: 1.0),
                (x: 0.0, y: 1.0),
                (x: 0.0, y: 0.0),
            ]]),
        );
        let index = MembershipIndex::build(&entities, std::slice::from_ref(&region));
        (Catalog::new(entities, vec![region]), index)
    }

    fn catalog_of(entities: Vec<Entity>) -> (Catalog, MembershipIndex) {
        let catalog = Catalog::new(entities, vec![]);
        let index = MembershipIndex::build(catalog.entities(), catalog.regions());
        (catalog, index)
    }

    fn raw(ids: &[EntityId]) -> Vec<u64> {
        ids.iter().map(|id| id.0).collect()
    }

    fn facet(value: &str, count: usize) -> Facet {
        Facet {
            value: value.to_string(),
            count,
        }
    }

    #[test]
    fn caches_base_subsets() {
        let (catalog, index) = fixture();
        let mut composer = FilterComposer::new();
        let key = FilterKey::dimension(SurveyDimension::Style, Some("Tudor"));

        assert!(!composer.is_cached(&key));
        assert_eq!(raw(&composer.subset(&key, None, &catalog, &index)), [1, 3]);
        assert!(composer.is_cached(&key));
        assert_eq!(raw(&composer.subset(&key, None, &catalog, &index)), [1, 3]);

        composer.invalidate();
        assert!(!composer.is_cached(&key));
    }

    #[test]
    fn viewport_narrows_without_touching_cache() {
        let (catalog, index) = fixture();
        let mut composer = FilterComposer::new();
        let key = FilterKey::dimension(SurveyDimension::Style, None);
        let bbox = BoundingBox {
            west: 1.0,
            south: 0.0,
            east: 3.0,
            north: 1.0,
        };

        assert_eq!(
            raw(&composer.subset(&key, Some(&bbox), &catalog, &index)),
            [2, 3]
        );
        assert_eq!(
            raw(&composer.subset(&key, None, &catalog, &index)),
            [1, 2, 3]
        );
    }

    #[test]
    fn unlocated_entities_are_outside_every_viewport() {
        let mut unlocated = entity(5, None, Some("Tudor"), 0.0);
        unlocated.centroid = None;
        let (catalog, index) = catalog_of(vec![entity(1, None, Some("Tudor"), 0.5), unlocated]);
        let mut composer = FilterComposer::new();
        let key = FilterKey::dimension(SurveyDimension::Style, Some("Tudor"));
        let world = BoundingBox {
            west: -180.0,
            south: -90.0,
            east: 180.0,
            north: 90.0,
        };

        assert_eq!(raw(&composer.subset(&key, None, &catalog, &index)), [1, 5]);
        assert_eq!(
            raw(&composer.subset(&key, Some(&world), &catalog, &index)),
            [1]
        );
        assert_eq!(
            FilterComposer::facets(SurveyDimension::Style, Some(&world), &catalog, &index),
            [facet("Tudor", 1)]
        );
    }

    #[test]
    fn region_and_landmark_subsets() {
        let (catalog, index) = fixture();
        let mut composer = FilterComposer::new();

        assert_eq!(
            raw(&composer.subset(&FilterKey::region("Elm Park"), None, &catalog, &index)),
            [1, 2, 4]
        );
        assert_eq!(
            raw(&composer.subset(&FilterKey::LandmarkOrContributing, None, &catalog, &index)),
            [2, 4]
        );
        assert!(
            composer
                .subset(&FilterKey::region("Nowhere"), None, &catalog, &index)
                .is_empty()
        );
    }

    #[test]
    fn facets_count_values() {
        let (catalog, index) = fixture();

        let decades = FilterComposer::facets(SurveyDimension::Decade, None, &catalog, &index);
        assert_eq!(decades, [facet("1880s", 1), facet("1920s", 2)]);

        let styles = FilterComposer::facets(SurveyDimension::Style, None, &catalog, &index);
        assert_eq!(styles, [facet("Colonial", 1), facet("Tudor", 2)]);
    }

    #[test]
    fn facets_fold_case_like_the_filter_they_drive() {
        let (catalog, index) = catalog_of(vec![
            entity(1, None, Some("Tudor"), 0.5),
            entity(2, None, Some("tudor"), 1.5),
            entity(3, None, Some("Colonial"), 2.5),
        ]);

        let styles = FilterComposer::facets(SurveyDimension::Style, None, &catalog, &index);
        assert_eq!(styles, [facet("Colonial", 1), facet("Tudor", 2)]);

        let key = FilterKey::dimension(SurveyDimension::Style, Some(&styles[1].value));
        let selected = FilterComposer::new().subset(&key, None, &catalog, &index);
        assert_eq!(selected.len(), styles[1].count);
    }

    #[test]
    fn facets_respect_viewport() {
        let (catalog, index) = fixture();
        let bbox = BoundingBox {
            west: 2.0,
            south: 0.0,
            east: 3.0,
            north: 1.0,
        };

        assert_eq!(
            FilterComposer::facets(SurveyDimension::Style, Some(&bbox), &catalog, &index),
            [facet("Tudor", 1)]
        );
    }

    #[test]
    fn filter_highlight_toggles() {
        let (catalog, index) = fixture();
        let mut composer = FilterComposer::new();
        let tudor = FilterKey::dimension(SurveyDimension::Style, Some("Tudor"));
        let district = FilterKey::region("Elm Park");

        assert!(composer.toggle_filter_highlight(&tudor, None, &catalog, &index));
        assert!(composer.toggle_filter_highlight(&district, None, &catalog, &index));
        assert_eq!(composer.highlight().origin(), Some(&district.origin()));
        assert_eq!(composer.highlight().ids().len(), 3);

        assert!(!composer.toggle_filter_highlight(&district, None, &catalog, &index));
        assert!(!composer.highlight().is_active());
    }

    #[test]
    fn origins_are_distinct_per_key() {
        let origin = |key: FilterKey| key.origin().0;

        assert_eq!(
            origin(FilterKey::dimension(SurveyDimension::Color, None)),
            "color"
        );
        assert_eq!(
            origin(FilterKey::dimension(SurveyDimension::Color, Some("Red"))),
            "color/Red"
        );
        assert_eq!(origin(FilterKey::region("Elm Park")), "district/Elm Park");
    }
}
