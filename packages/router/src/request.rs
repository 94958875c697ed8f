//! What the presentation layer should display for a resolved route.

use serde::{Deserialize, Serialize};
use survey_map_catalog_models::{EntityId, SurveyDimension};
use survey_map_filter::FilterKey;

/// Contents of the list panel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ListRequest {
    /// No entity list.
    #[default]
    Nothing,
    /// Entities matching a base filter.
    Filter {
        /// Filter to apply.
        filter: FilterKey,
    },
    /// Full search results.
    Search {
        /// Raw query text.
        query: String,
    },
    /// Names of every region.
    RegionNames,
    /// Distinct values of a dimension, alongside every entity that has one.
    Facets {
        /// Dimension to summarize.
        dimension: SurveyDimension,
    },
}

impl ListRequest {
    /// Base filter behind an entity list, if the list shows one.
    #[must_use]
    pub fn filter(&self) -> Option<FilterKey> {
        match self {
            Self::Filter { filter } => Some(filter.clone()),
            Self::Facets { dimension } => Some(FilterKey::dimension(*dimension, None)),
            Self::Nothing | Self::Search { .. } | Self::RegionNames => None,
        }
    }
}

/// Side-effect request emitted with every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRequest {
    /// List panel contents.
    pub list: ListRequest,
    /// Entity to open in the detail panel. `None` when the route names a
    /// missing entity.
    pub focus: Option<EntityId>,
    /// Region to emphasize on the map.
    pub emphasized_region: Option<String>,
    /// Draw every region outline.
    pub show_all_regions: bool,
}
