//! Output records handed to the presentation layer.

use serde::{Deserialize, Serialize};
use survey_map_catalog_models::EntityId;
use survey_map_filter::{Facet, HighlightOrigin};
use survey_map_router::ListRequest;
use survey_map_router_models::{DistrictContext, Route};
use survey_map_search::SearchOutcome;

/// The fully resolved view after an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationUpdate {
    /// Resolved route.
    pub route: Route,
    /// Sticky region filter.
    pub active_context: Option<DistrictContext>,
    /// What the list panel shows.
    pub panel: ListRequest,
    /// Entity ids for the list panel, in display order.
    pub list: Vec<EntityId>,
    /// Entity ids to emphasize, in id order.
    pub highlighted: Vec<EntityId>,
    /// Filter that owns the highlight, if any.
    pub highlight_origin: Option<HighlightOrigin>,
    /// Region to emphasize on the map.
    pub emphasized_region: Option<String>,
    /// Draw every region outline.
    pub show_all_regions: bool,
    /// Entity open in the detail panel.
    pub focus: Option<EntityId>,
    /// Open inline suggestions.
    pub suggestions: Vec<EntityId>,
    /// Value counts for a dimension listing.
    pub facets: Vec<Facet>,
    /// Region names for the district listing.
    pub regions: Vec<String>,
    /// Full search outcome for a search route.
    pub search: Option<SearchOutcome>,
}

/// Counts reported once the input has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    /// Entities kept after id de-duplication.
    pub entities: usize,
    /// Entities with a usable centroid.
    pub located: usize,
    /// Regions kept after name de-duplication.
    pub regions: usize,
    /// Entities attributed to some region.
    pub attributed: usize,
}
