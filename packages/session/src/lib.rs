#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Survey map session.
//!
//! A [`Session`] owns every piece of per-session state: the catalog and
//! membership index (built once by [`Session::load`]), the filter composer
//! and the router state. Events are processed one at a time on the
//! caller's thread. Until [`Session::load`] has run, every event is
//! dropped and returns `None`.

pub mod config;
pub mod update;

use std::collections::BTreeSet;
use std::time::Duration;

use survey_map_catalog::{Catalog, EntityRecord, Region};
use survey_map_catalog_models::{BoundingBox, EntityId};
use survey_map_filter::{FilterComposer, FilterKey};
use survey_map_router::{DisplayRequest, ListRequest, RouteLookup, RouterState, Transition};
use survey_map_router_models::{DistrictContext, Route};
use survey_map_search::{SearchMode, SearchOutcome};
use survey_map_spatial::MembershipIndex;

pub use config::{ConfigError, SessionConfig};
pub use update::{LoadSummary, PresentationUpdate};

/// Data that becomes available once input is loaded. Read-only afterwards.
#[derive(Debug)]
struct Loaded {
    catalog: Catalog,
    index: MembershipIndex,
}

impl RouteLookup for Loaded {
    fn region_of(&self, id: EntityId) -> Option<&str> {
        self.index.region_of(id)
    }

    fn has_entity(&self, id: EntityId) -> bool {
        self.catalog.entity(id).is_some()
    }

    fn has_region(&self, name: &str) -> bool {
        self.index.has_region(name)
    }
}

/// One browsing session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    data: Option<Loaded>,
    router: RouterState,
    request: DisplayRequest,
    composer: FilterComposer,
    follow_view: bool,
    viewport: Option<BoundingBox>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Session {
    /// Creates an empty session. Events are dropped until
    /// [`Session::load`] runs.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        let router = RouterState::new(config.history_capacity, config.debounce_window());
        Self {
            config,
            data: None,
            router,
            request: DisplayRequest::default(),
            composer: FilterComposer::new(),
            follow_view: false,
            viewport: None,
        }
    }

    /// Preprocesses entity records, merges regions and builds the
    /// membership index. Runs synchronously.
    pub fn load(&mut self, records: Vec<EntityRecord>, regions: Vec<Region>) -> LoadSummary {
        if self.data.is_some() {
            log::warn!("Session reloaded; discarding cached subsets");
            self.composer.invalidate();
        }

        let catalog = Catalog::from_records(records, regions);
        let index = MembershipIndex::build(catalog.entities(), catalog.regions());

        let summary = LoadSummary {
            entities: catalog.len(),
            located: catalog
                .entities()
                .iter()
                .filter(|e| e.centroid.is_some())
                .count(),
            regions: index.region_count(),
            attributed: index.attributed_count(),
        };

        log::info!(
            "Session loaded: {} entities ({} located), {} regions, {} attributed",
            summary.entities,
            summary.located,
            summary.regions,
            summary.attributed
        );

        self.data = Some(Loaded { catalog, index });

        summary
    }

    /// Returns `true` once input has been loaded.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> Option<&Catalog> {
        self.data.as_ref().map(|d| &d.catalog)
    }

    /// Loaded membership index.
    #[must_use]
    pub fn index(&self) -> Option<&MembershipIndex> {
        self.data.as_ref().map(|d| &d.index)
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current route.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.router.route
    }

    /// Sticky region filter, if any.
    #[must_use]
    pub const fn active_context(&self) -> Option<&DistrictContext> {
        self.router.active_context.as_ref()
    }

    /// Full router state.
    #[must_use]
    pub const fn router(&self) -> &RouterState {
        &self.router
    }

    /// Resolves a navigation token.
    pub fn navigate(&mut self, token: &str) -> Option<PresentationUpdate> {
        let Some(data) = &self.data else {
            log::debug!("Dropping navigation to {token:?}: session not loaded");
            return None;
        };

        let state = std::mem::take(&mut self.router);
        let transition = survey_map_router::resolve(state, token, data);
        Some(self.apply(transition))
    }

    /// Leaves the current property view.
    pub fn close_property(&mut self) -> Option<PresentationUpdate> {
        let data = self.data.as_ref()?;

        let state = std::mem::take(&mut self.router);
        let transition = survey_map_router::close_property(state, data);
        Some(self.apply(transition))
    }

    fn apply(&mut self, transition: Transition) -> PresentationUpdate {
        self.router = transition.state;
        self.request = transition.request;
        self.present()
    }

    /// Turns viewport narrowing of filter lists on or off.
    pub fn set_follow_view(&mut self, follow: bool) -> Option<PresentationUpdate> {
        self.data.as_ref()?;

        self.follow_view = follow;
        self.router.refresh.cancel();
        Some(self.present())
    }

    /// Records a new viewport. When following the view, schedules a
    /// debounced refresh; nothing is presented until [`Session::tick`]
    /// fires it.
    pub fn set_viewport(
        &mut self,
        viewport: BoundingBox,
        now: Duration,
    ) -> Option<PresentationUpdate> {
        self.data.as_ref()?;

        self.viewport = Some(viewport);
        if self.follow_view {
            self.router.refresh.schedule(now);
        }
        None
    }

    /// Advances time, running a pending viewport refresh if it is due.
    pub fn tick(&mut self, now: Duration) -> Option<PresentationUpdate> {
        self.data.as_ref()?;

        if self.router.refresh.poll(now) {
            log::debug!("Running debounced viewport refresh");
            Some(self.present())
        } else {
            None
        }
    }

    /// Inline suggestions for partial input. The hits are kept as the
    /// open suggestion list until the next transition.
    pub fn suggest(&mut self, input: &str) -> Option<SearchOutcome> {
        let data = self.data.as_ref()?;

        let outcome = survey_map_search::search(
            input,
            data.catalog.entities(),
            SearchMode::Suggest,
            &self.config.search,
        );
        self.router.suggestions = outcome.ids();
        Some(outcome)
    }

    /// Broader lookup, without touching the suggestion list.
    #[must_use]
    pub fn lookup(&self, input: &str) -> Option<SearchOutcome> {
        let data = self.data.as_ref()?;

        Some(survey_map_search::search(
            input,
            data.catalog.entities(),
            SearchMode::Lookup,
            &self.config.search,
        ))
    }

    /// Toggles the highlight owned by a filter.
    pub fn toggle_highlight(&mut self, key: &FilterKey) -> Option<PresentationUpdate> {
        let data = self.data.as_ref()?;

        let viewport = self.effective_viewport();
        self.composer
            .toggle_filter_highlight(key, viewport.as_ref(), &data.catalog, &data.index);
        Some(self.present())
    }

    /// Sets or clears the transient single-entity highlight.
    pub fn hover(&mut self, id: Option<EntityId>) -> Option<PresentationUpdate> {
        self.data.as_ref()?;

        self.router.building_highlight = id;
        Some(self.present())
    }

    /// Clears the filter highlight.
    pub fn clear_highlight(&mut self) -> Option<PresentationUpdate> {
        self.data.as_ref()?;

        self.composer.clear_highlight();
        Some(self.present())
    }

    /// Re-presents the current view without changing state.
    #[must_use]
    pub fn current(&mut self) -> Option<PresentationUpdate> {
        self.data.as_ref()?;
        Some(self.present())
    }

    fn effective_viewport(&self) -> Option<BoundingBox> {
        self.viewport.filter(|_| self.follow_view)
    }

    fn present(&mut self) -> PresentationUpdate {
        let viewport = self.effective_viewport();
        let viewport = viewport.as_ref();
        let Self {
            data,
            router,
            request,
            composer,
            config,
            ..
        } = self;

        let mut update = PresentationUpdate {
            route: router.route.clone(),
            active_context: router.active_context.clone(),
            panel: request.list.clone(),
            list: Vec::new(),
            highlighted: Vec::new(),
            highlight_origin: composer.highlight().origin().cloned(),
            emphasized_region: request.emphasized_region.clone(),
            show_all_regions: request.show_all_regions,
            focus: request.focus,
            suggestions: router.suggestions.clone(),
            facets: Vec::new(),
            regions: Vec::new(),
            search: None,
        };

        let Some(data) = data.as_ref() else {
            return update;
        };

        match &request.list {
            ListRequest::Nothing => {}
            ListRequest::Filter { filter } => {
                update.list = composer.subset(filter, viewport, &data.catalog, &data.index);
            }
            ListRequest::Facets { dimension } => {
                let filter = FilterKey::dimension(*dimension, None);
                update.list = composer.subset(&filter, viewport, &data.catalog, &data.index);
                update.facets =
                    FilterComposer::facets(*dimension, viewport, &data.catalog, &data.index);
            }
            ListRequest::Search { query } => {
                let outcome = survey_map_search::search(
                    query,
                    data.catalog.entities(),
                    SearchMode::Full,
                    &config.search,
                );
                update.list = outcome.ids();
                update.search = Some(outcome);
            }
            ListRequest::RegionNames => {
                update.regions = data.index.region_names().map(ToString::to_string).collect();
            }
        }

        let mut highlighted: BTreeSet<EntityId> = composer.highlight().ids().clone();
        highlighted.extend(router.building_highlight);
        update.highlighted = highlighted.into_iter().collect();

        update
    }
}
