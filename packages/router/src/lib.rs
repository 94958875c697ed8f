#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View-state router.
//!
//! All mutable navigation state lives in an explicit [`RouterState`] that
//! is moved into [`resolve`] and handed back in the resulting
//! [`Transition`], together with a [`DisplayRequest`] for the presentation
//! layer. The router never renders and never fails: unknown tokens resolve
//! to [`Route::Home`] and missing entities or regions resolve to empty
//! content.

pub mod debounce;
pub mod history;
pub mod request;

use std::time::Duration;

use survey_map_catalog_models::EntityId;
use survey_map_filter::FilterKey;
use survey_map_router_models::{DistrictContext, Route};

pub use debounce::{DEFAULT_DEBOUNCE_WINDOW, Debouncer};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryStack};
pub use request::{DisplayRequest, ListRequest};

/// Read-only membership queries the router needs.
pub trait RouteLookup {
    /// First region containing the entity.
    fn region_of(&self, id: EntityId) -> Option<&str>;

    /// Returns `true` if the entity exists.
    fn has_entity(&self, id: EntityId) -> bool;

    /// Returns `true` if the region exists.
    fn has_region(&self, name: &str) -> bool;
}

/// Everything the router carries between events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouterState {
    /// Current route.
    pub route: Route,
    /// Visited routes.
    pub history: HistoryStack,
    /// Sticky region filter.
    pub active_context: Option<DistrictContext>,
    /// Transient single-entity highlight (hover).
    pub building_highlight: Option<EntityId>,
    /// Open inline suggestion list.
    pub suggestions: Vec<EntityId>,
    /// Pending viewport refresh.
    pub refresh: Debouncer,
}

impl RouterState {
    /// Creates an empty state with the given history capacity and refresh
    /// debounce window.
    #[must_use]
    pub fn new(history_capacity: usize, debounce_window: Duration) -> Self {
        Self {
            history: HistoryStack::with_capacity(history_capacity),
            refresh: Debouncer::new(debounce_window),
            ..Self::default()
        }
    }
}

/// Result of resolving one navigation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State to carry into the next event.
    pub state: RouterState,
    /// What the presentation layer should show.
    pub request: DisplayRequest,
}

/// Resolves a raw navigation token.
#[must_use]
pub fn resolve(state: RouterState, token: &str, lookup: &impl RouteLookup) -> Transition {
    navigate(state, Route::parse_or_home(token), lookup)
}

/// Resolves an already-parsed route.
#[must_use]
pub fn navigate(mut state: RouterState, route: Route, lookup: &impl RouteLookup) -> Transition {
    let first_visit = state.history.is_empty();
    let previous = std::mem::replace(&mut state.route, route.clone());

    state.history.push(route.clone());
    state.building_highlight = None;
    state.suggestions.clear();
    state.refresh.cancel();

    let active = state.active_context.take();
    state.active_context = next_context(&route, &previous, active, first_visit, lookup);

    let request = display_request(&route, state.active_context.as_ref(), lookup);

    log::debug!(
        "Resolved {previous} -> {route} (context: {:?}, history: {})",
        state.active_context,
        state.history.len()
    );

    Transition { state, request }
}

/// Leaves a property view, returning to the most recent non-property
/// route or [`Route::Home`].
#[must_use]
pub fn close_property(state: RouterState, lookup: &impl RouteLookup) -> Transition {
    let target = state
        .history
        .last_non_property()
        .cloned()
        .unwrap_or_default();

    navigate(state, target, lookup)
}

fn next_context(
    route: &Route,
    previous: &Route,
    active: Option<DistrictContext>,
    first_visit: bool,
    lookup: &impl RouteLookup,
) -> Option<DistrictContext> {
    let id = match route {
        Route::District(name) => {
            return lookup
                .has_region(name)
                .then(|| DistrictContext::Region(name.clone()));
        }
        Route::Property(id) => *id,
        _ => return None,
    };

    if active.is_some() {
        return active;
    }

    if let Route::District(name) = previous
        && lookup.has_region(name)
    {
        return Some(DistrictContext::Region(name.clone()));
    }

    if let Some(region) = lookup.region_of(id) {
        let same_region = match previous {
            Route::Property(other) => lookup.region_of(*other) == Some(region),
            _ => false,
        };
        if same_region {
            return Some(DistrictContext::Region(region.to_string()));
        }
    }

    if first_visit || *previous == Route::DistrictsList {
        return Some(DistrictContext::AllRegions);
    }

    None
}

fn display_request(
    route: &Route,
    context: Option<&DistrictContext>,
    lookup: &impl RouteLookup,
) -> DisplayRequest {
    match route {
        Route::Home | Route::SurveyRoot => DisplayRequest::default(),
        Route::Property(id) => {
            let focus = lookup.has_entity(*id).then_some(*id);
            match context {
                Some(DistrictContext::Region(name)) => DisplayRequest {
                    list: ListRequest::Filter {
                        filter: FilterKey::region(name.clone()),
                    },
                    focus,
                    emphasized_region: Some(name.clone()),
                    show_all_regions: false,
                },
                Some(DistrictContext::AllRegions) => DisplayRequest {
                    focus,
                    show_all_regions: true,
                    ..DisplayRequest::default()
                },
                None => DisplayRequest {
                    focus,
                    emphasized_region: lookup.region_of(*id).map(ToString::to_string),
                    ..DisplayRequest::default()
                },
            }
        }
        Route::District(name) => DisplayRequest {
            list: ListRequest::Filter {
                filter: FilterKey::region(name.clone()),
            },
            emphasized_region: lookup.has_region(name).then(|| name.clone()),
            ..DisplayRequest::default()
        },
        Route::Search(query) => DisplayRequest {
            list: ListRequest::Search {
                query: query.clone(),
            },
            ..DisplayRequest::default()
        },
        Route::Landmarks => DisplayRequest {
            list: ListRequest::Filter {
                filter: FilterKey::LandmarkOrContributing,
            },
            ..DisplayRequest::default()
        },
        Route::DistrictsList => DisplayRequest {
            list: ListRequest::RegionNames,
            show_all_regions: true,
            ..DisplayRequest::default()
        },
        Route::SurveyDimension(dimension) => DisplayRequest {
            list: ListRequest::Facets {
                dimension: *dimension,
            },
            ..DisplayRequest::default()
        },
        Route::SurveyDimensionValue(dimension, value) => DisplayRequest {
            list: ListRequest::Filter {
                filter: FilterKey::dimension(*dimension, Some(value)),
            },
            ..DisplayRequest::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use survey_map_catalog_models::SurveyDimension;

    /// Entities 42 and 43 in Elm Park, 50 in Oak Hill, 99 outside any region.
    struct Fixture {
        regions: BTreeMap<EntityId, &'static str>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                regions: [
                    (EntityId(42), "Elm Park"),
                    (EntityId(43), "Elm Park"),
                    (EntityId(50), "Oak Hill"),
                ]
                .into_iter()
                .collect(),
            }
        }
    }

    impl RouteLookup for Fixture {
        fn region_of(&self, id: EntityId) -> Option<&str> {
            self.regions.get(&id).copied()
        }

        fn has_entity(&self, id: EntityId) -> bool {
            self.regions.contains_key(&id) || id == EntityId(99)
        }

        fn has_region(&self, name: &str) -> bool {
            matches!(name, "Elm Park" | "Oak Hill")
        }
    }

    fn run(tokens: &[&str]) -> Transition {
        let lookup = Fixture::new();
        let mut transition = resolve(RouterState::default(), "home", &lookup);
        for token in tokens {
            transition = resolve(transition.state, token, &lookup);
        }
        transition
    }

    fn elm_park() -> Option<DistrictContext> {
        Some(DistrictContext::Region("Elm Park".to_string()))
    }

    #[test]
    fn district_context_survives_property_navigation() {
        let lookup = Fixture::new();
        let t = resolve(RouterState::default(), "district/Elm%20Park", &lookup);
        assert_eq!(t.state.active_context, elm_park());

        let t = resolve(t.state, "property/42", &lookup);
        assert_eq!(t.state.active_context, elm_park());
        assert_eq!(t.request.emphasized_region.as_deref(), Some("Elm Park"));
        assert_eq!(t.request.focus, Some(EntityId(42)));

        let t = resolve(t.state, "property/43", &lookup);
        assert_eq!(t.state.route, Route::Property(EntityId(43)));
        assert_eq!(t.state.active_context, elm_park());
        assert_eq!(
            t.request.list,
            ListRequest::Filter {
                filter: FilterKey::region("Elm Park")
            }
        );
    }

    #[test]
    fn property_to_property_in_same_region_sets_context() {
        let t = run(&["property/42"]);
        assert_eq!(t.state.active_context, None);
        assert_eq!(t.request.emphasized_region.as_deref(), Some("Elm Park"));

        let t = resolve(t.state, "property/43", &Fixture::new());
        assert_eq!(t.state.active_context, elm_park());
    }

    #[test]
    fn property_in_other_region_without_context_clears() {
        let t = run(&["property/42", "property/50"]);
        assert_eq!(t.state.active_context, None);
    }

    #[test]
    fn initial_property_shows_all_regions() {
        let t = resolve(RouterState::default(), "property/42", &Fixture::new());
        assert_eq!(t.state.active_context, Some(DistrictContext::AllRegions));
        assert!(t.request.show_all_regions);
        assert_eq!(t.request.emphasized_region, None);
    }

    #[test]
    fn property_from_districts_list_shows_all_regions() {
        let t = run(&["districts", "property/50"]);
        assert_eq!(t.state.active_context, Some(DistrictContext::AllRegions));

        // An active context survives property navigation.
        let t = resolve(t.state, "property/42", &Fixture::new());
        assert_eq!(t.state.active_context, Some(DistrictContext::AllRegions));
    }

    #[test]
    fn unrelated_routes_clear_context() {
        let t = run(&["district/Elm%20Park", "landmarks"]);
        assert_eq!(t.state.active_context, None);

        let t = run(&["district/Elm%20Park", "property/42", "search/main"]);
        assert_eq!(t.state.active_context, None);
    }

    #[test]
    fn garbage_token_resolves_home() {
        let t = run(&["district/Elm%20Park", "garbage/token"]);
        assert_eq!(t.state.route, Route::Home);
        assert_eq!(t.state.active_context, None);
        assert_eq!(t.request, DisplayRequest::default());
    }

    #[test]
    fn missing_references_degrade_to_no_match() {
        let t = run(&["property/7"]);
        assert_eq!(t.state.route, Route::Property(EntityId(7)));
        assert_eq!(t.request.focus, None);

        let t = run(&["district/Nowhere"]);
        assert_eq!(t.state.route, Route::District("Nowhere".to_string()));
        assert_eq!(t.state.active_context, None);
        assert_eq!(t.request.emphasized_region, None);
    }

    #[test]
    fn transitions_clear_transient_state() {
        let lookup = Fixture::new();
        let mut state = RouterState {
            building_highlight: Some(EntityId(42)),
            suggestions: vec![EntityId(42), EntityId(43)],
            ..RouterState::default()
        };
        state.refresh.schedule(Duration::ZERO);

        let t = resolve(state, "landmarks", &lookup);
        assert_eq!(t.state.building_highlight, None);
        assert!(t.state.suggestions.is_empty());
        assert!(!t.state.refresh.is_pending());
    }

    #[test]
    fn history_records_distinct_visits() {
        let t = run(&["landmarks", "landmarks", "districts"]);
        let visited: Vec<String> = t.state.history.iter().map(ToString::to_string).collect();
        assert_eq!(visited, ["home", "landmarks", "districts"]);
    }

    #[test]
    fn close_property_returns_to_last_list() {
        let lookup = Fixture::new();
        let t = run(&["district/Elm%20Park", "property/42", "property/43"]);

        let t = close_property(t.state, &lookup);
        assert_eq!(t.state.route, Route::District("Elm Park".to_string()));
        assert_eq!(t.state.active_context, elm_park());

        let t = close_property(RouterState::default(), &lookup);
        assert_eq!(t.state.route, Route::Home);
    }

    #[test]
    fn survey_routes_request_facets_and_filters() {
        let t = run(&["survey/style"]);
        assert_eq!(
            t.request.list,
            ListRequest::Facets {
                dimension: SurveyDimension::Style
            }
        );

        let t = run(&["survey/color/Red"]);
        assert_eq!(
            t.request.list.filter(),
            Some(FilterKey::dimension(SurveyDimension::Color, Some("Red")))
        );
    }
}
