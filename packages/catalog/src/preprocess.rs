//! One-time derivation of decade buckets and centroids.
//!
//! Runs once after input load. Every failure here is soft: an entity
//! without a parseable built date has no decade, and an entity without a
//! computable centroid is kept but excluded from every centroid-based
//! lookup downstream.

use std::sync::LazyLock;

use geo::Centroid;
use regex::Regex;
use survey_map_catalog_models::{Coordinates, DecadeBucket, Entity};

use crate::EntityRecord;

/// First run of four ASCII digits in a free-text date.
static YEAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{4}").expect("valid regex"));

/// Derives the decade bucket from a free-text built date
/// (`"ca. 1895"`, `"1902-1904"`, `"Unknown"`).
#[must_use]
pub fn decade_from_built(built: &str) -> Option<DecadeBucket> {
    let year: i32 = YEAR_RE.find(built)?.as_str().parse().ok()?;
    Some(DecadeBucket::from_year(year))
}

/// Computes the representative point for a record.
///
/// A precomputed position on the input wins; otherwise the centroid of
/// the geometry is used.
#[must_use]
pub fn centroid_of(record: &EntityRecord) -> Option<Coordinates> {
    if let Some(position) = record.position.filter(Coordinates::is_finite) {
        return Some(position);
    }

    let point = record.geometry.as_ref()?.centroid()?;
    let coords = Coordinates::new(point.y(), point.x());
    coords.is_finite().then_some(coords)
}

/// Turns raw records into entities with derived fields attached.
#[must_use]
pub fn preprocess(records: Vec<EntityRecord>) -> Vec<Entity> {
    let mut missing_centroids = 0usize;
    let mut missing_decades = 0usize;

    let entities: Vec<Entity> = records
        .into_iter()
        .map(|record| {
            let centroid = centroid_of(&record);
            if centroid.is_none() {
                missing_centroids += 1;
                log::warn!(
                    "Entity {} has no usable geometry; excluded from spatial lookups",
                    record.id
                );
            }

            let mut attributes = record.attributes;
            attributes.decade = attributes.built.as_deref().and_then(decade_from_built);
            if attributes.decade.is_none() {
                missing_decades += 1;
                log::debug!(
                    "Entity {} has no parseable built date ({:?})",
                    record.id,
                    attributes.built
                );
            }

            Entity {
                id: record.id,
                address: record.address,
                attributes,
                centroid,
            }
        })
        .collect();

    log::info!(
        "Preprocessed {} entities ({missing_centroids} without centroid, {missing_decades} without decade)",
        entities.len()
    );

    entities
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, LineString, Point, Polygon, polygon};
    use survey_map_catalog_models::{Address, EntityId};

    fn record(geometry: Option<Geometry<f64>>) -> EntityRecord {
        let mut record = EntityRecord::new(EntityId(7), Address::default());
        record.geometry = geometry;
        record
    }

    #[test]
    fn parses_first_four_digit_run() {
        assert_eq!(
            decade_from_built("ca. 1895"),
            Some(DecadeBucket::Decade1890s)
        );
        assert_eq!(
            decade_from_built("1902-1939"),
            Some(DecadeBucket::Decade1900s)
        );
        assert_eq!(decade_from_built("1850"), Some(DecadeBucket::Before1880));
        assert_eq!(
            decade_from_built("1962 addition"),
            Some(DecadeBucket::From1940)
        );
    }

    #[test]
    fn unparseable_built_date_has_no_decade() {
        assert_eq!(decade_from_built("Unknown"), None);
        assert_eq!(decade_from_built("c. 189-"), None);
        assert_eq!(decade_from_built(""), None);
    }

    #[test]
    fn precomputed_position_wins_over_geometry() {
        let mut r = record(Some(Geometry::Point(Point::new(1.0, 2.0))));
        r.position = Some(Coordinates::new(42.0, -71.0));
        assert_eq!(centroid_of(&r), Some(Coordinates::new(42.0, -71.0)));
    }

    #[test]
    fn polygon_centroid_is_lat_lng() {
        let poly = polygon![
            (x: -71.0, y: 42.0),
            (x: -70.0, y: 42.0),
            (x: -70.0, y: 43.0),
            (x: -71.0, y: 43.0),
            (x: -71.0, y: 42.0),
        ];
        let c = centroid_of(&record(Some(Geometry::Polygon(poly)))).unwrap();
        assert!((c.lat - 42.5).abs() < 1e-9);
        assert!((c.lng + 70.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_geometry_has_no_centroid() {
        let empty = Polygon::new(LineString::new(vec![]), vec![]);
        assert_eq!(centroid_of(&record(Some(Geometry::Polygon(empty)))), None);
        assert_eq!(centroid_of(&record(None)), None);
    }

    #[test]
    fn preprocess_keeps_entities_without_centroid() {
        let mut with_date = record(None);
        with_date.attributes.built = Some("1921".to_string());
        let entities = preprocess(vec![with_date]);

        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].centroid, None);
        assert_eq!(
            entities[0].attributes.decade,
            Some(DecadeBucket::Decade1920s)
        );
    }
}
