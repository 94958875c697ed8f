//! `GeoJSON` input parsing.
//!
//! Entities and regions both arrive as `FeatureCollection`s. Property
//! names vary between survey exports, so each field is looked up under a
//! short list of accepted keys. Features that cannot be turned into a
//! record are skipped with a warning.

use std::path::Path;

use geo::MultiPolygon;
use geojson::{Feature, GeoJson, JsonObject};
use serde_json::Value;
use survey_map_catalog_models::{Address, Coordinates, EntityId};

use crate::{CatalogError, EntityRecord, Region};

const ID_KEYS: &[&str] = &["id", "ID", "OBJECTID"];
const HOUSE_NUMBER_KEYS: &[&str] = &["house_number", "number", "st_num"];
const STREET_KEYS: &[&str] = &["street", "st_name"];
const ADDRESS_KEYS: &[&str] = &["address", "full_address"];
const COLOR_KEYS: &[&str] = &["color", "rating"];
const BUILT_KEYS: &[&str] = &["built", "date_built", "year_built"];
const ARCHITECT_KEYS: &[&str] = &["architect"];
const STYLE_KEYS: &[&str] = &["style"];
const LANDMARK_KEYS: &[&str] = &["landmark"];
const CONTRIBUTING_KEYS: &[&str] = &["contributing", "district_contributing"];
const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LNG_KEYS: &[&str] = &["lng", "lon", "longitude"];
const NAME_KEYS: &[&str] = &["name", "NAME", "district"];
const REGION_COLOR_KEYS: &[&str] = &["color", "fill"];

/// Parses an entity `FeatureCollection`.
///
/// # Errors
///
/// Returns [`CatalogError`] if the input is not a `GeoJSON`
/// `FeatureCollection`.
pub fn load_entities_geojson(input: &str) -> Result<Vec<EntityRecord>, CatalogError> {
    let features = parse_features(input)?;
    let total = features.len();

    let records: Vec<EntityRecord> = features
        .into_iter()
        .filter_map(entity_from_feature)
        .collect();

    if records.len() < total {
        log::warn!(
            "Skipped {} of {total} entity features without a usable id",
            total - records.len()
        );
    }
    log::info!("Loaded {} entity records", records.len());

    Ok(records)
}

/// Parses a region `FeatureCollection`.
///
/// # Errors
///
/// Returns [`CatalogError`] if the input is not a `GeoJSON`
/// `FeatureCollection`.
pub fn load_regions_geojson(input: &str) -> Result<Vec<Region>, CatalogError> {
    let regions: Vec<Region> = parse_features(input)?
        .into_iter()
        .filter_map(region_from_feature)
        .collect();

    log::info!("Loaded {} regions", regions.len());

    Ok(regions)
}

/// Reads and parses an entity `FeatureCollection` file.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be read or parsed.
pub fn load_entities_from_path(path: impl AsRef<Path>) -> Result<Vec<EntityRecord>, CatalogError> {
    load_entities_geojson(&std::fs::read_to_string(path)?)
}

/// Reads and parses a region `FeatureCollection` file.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be read or parsed.
pub fn load_regions_from_path(path: impl AsRef<Path>) -> Result<Vec<Region>, CatalogError> {
    load_regions_geojson(&std::fs::read_to_string(path)?)
}

fn parse_features(input: &str) -> Result<Vec<Feature>, CatalogError> {
    let kind = match input.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => return Ok(fc.features),
        GeoJson::Feature(_) => "a single Feature",
        GeoJson::Geometry(_) => "a bare Geometry",
    };

    Err(CatalogError::Conversion {
        message: format!("expected a FeatureCollection, found {kind}"),
    })
}

fn entity_from_feature(feature: Feature) -> Option<EntityRecord> {
    let empty = JsonObject::new();
    let props = feature.properties.as_ref().unwrap_or(&empty);

    let id = feature
        .id
        .as_ref()
        .and_then(|id| match id {
            geojson::feature::Id::Number(n) => n.as_u64(),
            geojson::feature::Id::String(s) => s.trim().parse().ok(),
        })
        .or_else(|| prop_u64(props, ID_KEYS))
        .map(EntityId)?;

    let street = prop_str(props, STREET_KEYS);
    let address = match street {
        Some(street) => Address {
            house_number: prop_str(props, HOUSE_NUMBER_KEYS),
            street,
        },
        None => Address {
            house_number: None,
            street: prop_str(props, ADDRESS_KEYS).unwrap_or_default(),
        },
    };

    let mut record = EntityRecord::new(id, address);
    record.attributes.color = prop_str(props, COLOR_KEYS);
    record.attributes.built = prop_str(props, BUILT_KEYS);
    record.attributes.architect = prop_str(props, ARCHITECT_KEYS);
    record.attributes.style = prop_str(props, STYLE_KEYS);
    record.attributes.landmark = prop_flag(props, LANDMARK_KEYS);
    record.attributes.contributing = prop_flag(props, CONTRIBUTING_KEYS);

    record.position = prop_f64(props, LAT_KEYS)
        .zip(prop_f64(props, LNG_KEYS))
        .map(|(lat, lng)| Coordinates::new(lat, lng));

    record.geometry = feature.geometry.and_then(|geometry| {
        geometry
            .try_into()
            .inspect_err(|e| log::warn!("Entity {id} has unconvertible geometry: {e}"))
            .ok()
    });

    Some(record)
}

fn region_from_feature(feature: Feature) -> Option<Region> {
    let empty = JsonObject::new();
    let props = feature.properties.as_ref().unwrap_or(&empty);

    let Some(name) = prop_str(props, NAME_KEYS) else {
        log::warn!("Skipping region feature without a name");
        return None;
    };

    let Some(polygon) = feature
        .geometry
        .and_then(|g| geo::Geometry::<f64>::try_from(g).ok())
        .and_then(into_multipolygon)
    else {
        log::warn!("Skipping region '{name}': geometry is not a polygon");
        return None;
    };

    Some(Region {
        name,
        color: prop_str(props, REGION_COLOR_KEYS),
        polygon,
    })
}

fn into_multipolygon(geometry: geo::Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

fn prop<'a>(props: &'a JsonObject, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| props.get(*k))
        .find(|v| !v.is_null())
}

/// Non-blank string property. Numbers are accepted and stringified.
fn prop_str(props: &JsonObject, keys: &[&str]) -> Option<String> {
    let value = match prop(props, keys)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

fn prop_u64(props: &JsonObject, keys: &[&str]) -> Option<u64> {
    match prop(props, keys)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn prop_f64(props: &JsonObject, keys: &[&str]) -> Option<f64> {
    match prop(props, keys)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Boolean-ish property: `true`, `1`, `"Y"`, `"yes"`, `"true"`.
fn prop_flag(props: &JsonObject, keys: &[&str]) -> bool {
    match prop(props, keys) {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "y" | "yes" | "true" | "1"
        ),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENTITIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 42,
                "properties": {
                    "house_number": "100",
                    "street": "Main St",
                    "color": "Red",
                    "built": "ca. 1895",
                    "architect": "H. H. Richardson",
                    "landmark": "Y"
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "id": "43", "address": "12 Elm Ave", "lat": 42.1, "lng": -71.2 },
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": { "street": "No Id Rd" },
                "geometry": null
            }
        ]
    }"#;

    const REGIONS: &str = r##"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Elm Park", "color": "#336699" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Point District" },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0, 0], [2, 0], [2, 2], [0, 2], [0, 0]]]
                }
            }
        ]
    }"##;

    #[test]
    fn loads_entity_properties() {
        let records = load_entities_geojson(ENTITIES).unwrap();
        assert_eq!(records.len(), 2, "feature without id should be skipped");

        let first = &records[0];
        assert_eq!(first.id, EntityId(42));
        assert_eq!(first.address.full(), "100 Main St");
        assert_eq!(first.attributes.color.as_deref(), Some("Red"));
        assert_eq!(
            first.attributes.architect.as_deref(),
            Some("H. H. Richardson")
        );
        assert!(first.attributes.landmark);
        assert!(!first.attributes.contributing);
        assert!(first.geometry.is_some());
        assert_eq!(first.position, None);
    }

    #[test]
    fn reads_id_and_position_from_properties() {
        let records = load_entities_geojson(ENTITIES).unwrap();
        let second = &records[1];
        assert_eq!(second.id, EntityId(43));
        assert_eq!(second.address.full(), "12 Elm Ave");
        assert_eq!(second.position, Some(Coordinates::new(42.1, -71.2)));
        assert!(second.geometry.is_none());
    }

    #[test]
    fn loads_only_polygonal_named_regions() {
        let regions = load_regions_geojson(REGIONS).unwrap();
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].name, "Elm Park");
        assert_eq!(regions[0].color.as_deref(), Some("#336699"));
        assert_eq!(regions[0].polygon.0.len(), 1);
    }

    #[test]
    fn rejects_non_collection_input() {
        let point = r#"{"type": "Point", "coordinates": [0, 0]}"#;
        let err = load_regions_geojson(point).unwrap_err();
        assert!(matches!(err, CatalogError::Conversion { .. }), "{err}");
        assert!(load_entities_geojson("not json").is_err());
    }
}
