//! Exclusive highlight state.
//!
//! At most one origin owns the emphasized subset at a time. Setting a new
//! origin replaces the old one; toggling the active origin clears it.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use survey_map_catalog_models::EntityId;

/// Identifies the filter or selection that produced a highlight.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightOrigin(pub String);

impl fmt::Display for HighlightOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for HighlightOrigin {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The currently emphasized subset, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightState {
    origin: Option<HighlightOrigin>,
    ids: BTreeSet<EntityId>,
}

impl HighlightState {
    /// Replaces any existing highlight.
    pub fn set(&mut self, origin: HighlightOrigin, ids: impl IntoIterator<Item = EntityId>) {
        log::debug!("Highlight set by '{origin}'");
        self.origin = Some(origin);
        self.ids = ids.into_iter().collect();
    }

    /// Clears the highlight if `origin` already owns it, otherwise sets it.
    ///
    /// Returns `true` if the highlight is active afterwards.
    pub fn toggle(
        &mut self,
        origin: HighlightOrigin,
        ids: impl IntoIterator<Item = EntityId>,
    ) -> bool {
        if self.origin.as_ref() == Some(&origin) {
            self.clear();
            false
        } else {
            self.set(origin, ids);
            true
        }
    }

    /// Unconditionally clears the highlight.
    pub fn clear(&mut self) {
        self.origin = None;
        self.ids.clear();
    }

    /// The owning origin, if a highlight is active.
    #[must_use]
    pub const fn origin(&self) -> Option<&HighlightOrigin> {
        self.origin.as_ref()
    }

    /// Highlighted ids in id order.
    #[must_use]
    pub const fn ids(&self) -> &BTreeSet<EntityId> {
        &self.ids
    }

    /// Returns `true` if a highlight is active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.origin.is_some()
    }
}
