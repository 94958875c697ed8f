//! Entity predicates.
//!
//! A [`Predicate`] is a closed description of a filter. It can be
//! evaluated against any entity, compared, and combined with
//! [`Predicate::and`].

use survey_map_catalog_models::{BoundingBox, Entity, EntityId, SurveyDimension};
use survey_map_spatial::MembershipIndex;

/// A filter over the entity collection.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Entities with a value in `dimension`, optionally narrowed to one
    /// value (ASCII case-insensitive).
    Dimension {
        /// Dimension to test.
        dimension: SurveyDimension,
        /// Required value, or `None` for any value.
        value: Option<String>,
    },
    /// Members of the named region.
    Region(String),
    /// Entities whose centroid lies inside the box.
    Viewport(BoundingBox),
    /// Landmarks and district-contributing entities.
    LandmarkOrContributing,
    /// Every inner predicate must match. Empty matches everything.
    All(Vec<Self>),
}

/// Builds a categorical predicate.
#[must_use]
pub fn predicate_for(dimension: SurveyDimension, value: Option<&str>) -> Predicate {
    Predicate::Dimension {
        dimension,
        value: value.map(ToString::to_string),
    }
}

impl Predicate {
    /// Logical AND of two predicates.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut parts = match self {
            Self::All(parts) => parts,
            single => vec![single],
        };
        match other {
            Self::All(more) => parts.extend(more),
            single => parts.push(single),
        }
        Self::All(parts)
    }

    /// Evaluates the predicate against one entity.
    #[must_use]
    pub fn matches(&self, entity: &Entity, index: &MembershipIndex) -> bool {
        match self {
            Self::Dimension { dimension, value } => {
                match (entity.dimension_value(*dimension), value.as_deref()) {
                    (None, _) => false,
                    (Some(_), None) => true,
                    (Some(actual), Some(wanted)) => actual.eq_ignore_ascii_case(wanted.trim()),
                }
            }
            Self::Region(name) => index.contains(name, entity.id),
            Self::Viewport(bbox) => entity.centroid.is_some_and(|c| bbox.contains(&c)),
            Self::LandmarkOrContributing => entity.is_landmark_or_contributing(),
            Self::All(parts) => parts.iter().all(|p| p.matches(entity, index)),
        }
    }

    /// Ids of all matching entities, in entity input order.
    #[must_use]
    pub fn select(&self, entities: &[Entity], index: &MembershipIndex) -> Vec<EntityId> {
        entities
            .iter()
            .filter(|e| self.matches(e, index))
            .map(|e| e.id)
            .collect()
    }
}
