//! Selection store
//!
//! Holds the user's team, the active filters and the theme. All mutation
//! goes through named methods, each of which keeps two invariants:
//!
//! - the selection never holds more than [`MAX_TEAM_SIZE`] entries
//! - an id appears in the selection at most once
//!
//! The store does no I/O. Persisting is done by callers through
//! [`SelectionStore::snapshot`] and [`SelectionStore::from_snapshot`].

mod snapshot;
mod types;

pub use snapshot::{PersistedSelection, PersistedState, SNAPSHOT_VERSION};
pub use types::{AddOutcome, CardStyle, SelectedItem, ThemeSettings, ThemeUpdate};

use std::collections::HashSet;
use tracing::{debug, trace};

use crate::catalog::CatalogItem;
use crate::filter::FilterState;

/// Maximum number of entries in a team
pub const MAX_TEAM_SIZE: usize = 6;

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selection: Vec<SelectedItem>,
    filters: FilterState,
    theme: ThemeSettings,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless it is already selected or the team is full
    pub fn add(&mut self, item: CatalogItem) -> AddOutcome {
        if self.is_selected(item.id()) {
            trace!("{} already selected", item.id());
            return AddOutcome::AlreadySelected;
        }
        if !self.can_add_more() {
            debug!("Team is full, ignoring {}", item.id());
            return AddOutcome::CapacityExceeded;
        }

        debug!("Selected {} ({})", item.id(), item.name());
        self.selection.push(SelectedItem::new(item));
        AddOutcome::Added
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.selection.len();
        self.selection.retain(|s| s.id() != id);
        before != self.selection.len()
    }

    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Move the entry at `from` to position `to`.
    ///
    /// Out-of-range indices leave the selection unchanged and return false.
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        let len = self.selection.len();
        if from >= len || to >= len {
            debug!("Rejected reorder {} -> {} (len {})", from, to, len);
            return false;
        }
        if from != to {
            let moved = self.selection.remove(from);
            self.selection.insert(to, moved);
        }
        true
    }

    /// Replace the selection with the first entries of `items`, up to the
    /// team size. Repeated ids keep their first occurrence.
    pub fn set_random(&mut self, items: impl IntoIterator<Item = CatalogItem>) {
        let mut seen = HashSet::new();
        self.selection = items
            .into_iter()
            .filter(|item| seen.insert(item.id()))
            .take(MAX_TEAM_SIZE)
            .map(SelectedItem::new)
            .collect();
        debug!("Random team of {}", self.selection.len());
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filters.search_term = term.into();
    }

    pub fn set_selected_type(&mut self, kind: Option<String>) {
        self.filters.selected_type = kind;
    }

    pub fn set_selected_generation(&mut self, generation: Option<u8>) {
        self.filters.selected_generation = generation;
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
    }

    pub fn update_theme(&mut self, update: ThemeUpdate) {
        self.theme.merge(update);
    }

    pub fn count(&self) -> usize {
        self.selection.len()
    }

    pub fn can_add_more(&self) -> bool {
        self.selection.len() < MAX_TEAM_SIZE
    }

    pub fn is_selected(&self, id: u32) -> bool {
        self.selection.iter().any(|s| s.id() == id)
    }

    pub fn selection(&self) -> &[SelectedItem] {
        &self.selection
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn theme(&self) -> &ThemeSettings {
        &self.theme
    }

    /// Display names of the team, in order
    pub fn selected_names(&self) -> Vec<String> {
        self.selection.iter().map(|s| s.display_name()).collect()
    }

    pub fn snapshot(&self) -> PersistedSelection {
        PersistedSelection {
            state: PersistedState {
                selected_pokemon: self.selection.clone(),
                theme_settings: Some(self.theme.clone()),
            },
            version: SNAPSHOT_VERSION,
        }
    }

    /// Rebuild a store from a snapshot.
    ///
    /// Snapshots come from outside the process, so capacity and uniqueness
    /// are applied again; surplus and repeated entries are dropped.
    /// Selection timestamps are kept.
    pub fn from_snapshot(snapshot: PersistedSelection) -> Self {
        if snapshot.version != SNAPSHOT_VERSION {
            debug!(
                "Restoring snapshot version {} (current {})",
                snapshot.version, SNAPSHOT_VERSION
            );
        }

        let mut seen = HashSet::new();
        let selection: Vec<SelectedItem> = snapshot
            .state
            .selected_pokemon
            .into_iter()
            .filter(|s| seen.insert(s.id()))
            .take(MAX_TEAM_SIZE)
            .collect();

        Self {
            selection,
            filters: FilterState::default(),
            theme: snapshot.state.theme_settings.unwrap_or_default(),
        }
    }
}
