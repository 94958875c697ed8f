//! Bounded navigation history.

use std::collections::VecDeque;

use survey_map_router_models::Route;

/// Default number of routes kept.
pub const DEFAULT_HISTORY_CAPACITY: usize = 300;

/// Visited routes, oldest first.
///
/// A push is skipped when the route equals the current top. When the stack
/// grows past its capacity the oldest entry is evicted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack {
    entries: VecDeque<Route>,
    capacity: usize,
}

impl Default for HistoryStack {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryStack {
    /// Creates an empty stack holding at most `capacity` routes (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Pushes `route` unless it equals the top. Returns `true` if pushed.
    pub fn push(&mut self, route: Route) -> bool {
        if self.top() == Some(&route) {
            return false;
        }

        self.entries.push_back(route);

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        true
    }

    /// Most recently pushed route.
    #[must_use]
    pub fn top(&self) -> Option<&Route> {
        self.entries.back()
    }

    /// Most recent route that is not a property view.
    #[must_use]
    pub fn last_non_property(&self) -> Option<&Route> {
        self.entries.iter().rev().find(|r| !r.is_property())
    }

    /// Number of routes held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` before the first visit.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Routes from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use survey_map_catalog_models::EntityId;

    #[test]
    fn caps_at_capacity_evicting_oldest() {
        let mut history = HistoryStack::default();
        for i in 0..301 {
            assert!(history.push(Route::Property(EntityId(i))));
        }

        assert_eq!(history.len(), 300);
        assert_eq!(history.iter().next(), Some(&Route::Property(EntityId(1))));
        assert_eq!(history.top(), Some(&Route::Property(EntityId(300))));
    }

    #[test]
    fn skips_duplicate_top() {
        let mut history = HistoryStack::default();
        assert!(history.push(Route::Landmarks));
        assert!(!history.push(Route::Landmarks));
        assert!(history.push(Route::Home));
        assert!(history.push(Route::Landmarks));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn finds_last_non_property_route() {
        let mut history = HistoryStack::default();
        assert_eq!(history.last_non_property(), None);

        history.push(Route::District("Elm Park".to_string()));
        history.push(Route::Property(EntityId(1)));
        history.push(Route::Property(EntityId(2)));

        assert_eq!(
            history.last_non_property(),
            Some(&Route::District("Elm Park".to_string()))
        );
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut history = HistoryStack::with_capacity(0);
        history.push(Route::Home);
        history.push(Route::Landmarks);
        assert_eq!(history.len(), 1);
        assert_eq!(history.top(), Some(&Route::Landmarks));
    }
}
