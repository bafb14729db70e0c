// LOC tree browser state.
// Loaded breakdown, navigation position and list selection for the current entry.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;

use ghloc::LocBreakdown;
use ghloc::error::GhlocError;

use super::navigation::NavigationStack;

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// Browser over one repository/branch breakdown.
#[derive(Debug)]
pub struct TreeState {
    pub data: LoadingState<Arc<LocBreakdown>>,
    pub nav: NavigationStack,
    pub list_state: ListState,
    /// When the shown breakdown was fetched from the service.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl TreeState {
    pub fn new(repo: impl Into<String>) -> Self {
        Self {
            data: LoadingState::Idle,
            nav: NavigationStack::new(repo),
            list_state: ListState::default(),
            fetched_at: None,
        }
    }

    pub fn set_loading(&mut self) {
        self.data = LoadingState::Loading;
    }

    pub fn set_error(&mut self, error: String) {
        self.data = LoadingState::Error(error);
    }

    /// Install a breakdown and walk as far down `path` as it goes.
    ///
    /// Returns `PathNotFound` for the first missing segment; navigation then
    /// stays at the deepest entry that exists.
    pub fn set_loaded(
        &mut self,
        root: LocBreakdown,
        fetched_at: Option<DateTime<Utc>>,
        path: &[String],
    ) -> Result<(), GhlocError> {
        self.data = LoadingState::Loaded(Arc::new(root));
        self.fetched_at = fetched_at;
        self.nav.reset();

        let mut outcome = Ok(());
        for (depth, segment) in path.iter().enumerate() {
            let exists = self
                .current_node()
                .is_some_and(|node| node.child(segment).is_some());
            if !exists {
                outcome = Err(GhlocError::path_not_found(&path[..=depth]));
                break;
            }
            self.nav.push(segment.clone());
        }
        self.reset_selection();
        outcome
    }

    /// Node for the current navigation position.
    pub fn current_node(&self) -> Option<&LocBreakdown> {
        let root = self.data.data()?;
        root.descend(&self.nav.path()).ok()
    }

    /// Children of the current node, largest first.
    pub fn entries(&self) -> Vec<(&str, &LocBreakdown)> {
        self.current_node()
            .map(|node| node.sorted_children())
            .unwrap_or_default()
    }

    /// Name of the selected child.
    pub fn selected_entry(&self) -> Option<String> {
        let index = self.list_state.selected()?;
        self.entries().get(index).map(|(name, _)| name.to_string())
    }

    /// Select the next entry in the list.
    pub fn select_next(&mut self) {
        let len = self.entries().len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i >= len - 1 => i,
            Some(i) => i + 1,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Select the previous entry in the list.
    pub fn select_prev(&mut self) {
        if self.entries().is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Drill into the selected entry. Returns the entry, if any.
    pub fn enter_selected(&mut self) -> Option<&LocBreakdown> {
        let name = self.selected_entry()?;
        self.nav.push(name);
        self.reset_selection();
        self.current_node()
    }

    /// Go back to the parent, re-selecting the entry we came from.
    pub fn go_back(&mut self) -> bool {
        let came_from = self.nav.path().last().cloned();
        if !self.nav.pop() {
            return false;
        }
        let index = came_from.and_then(|name| {
            self.entries()
                .iter()
                .position(|(entry, _)| *entry == name)
        });
        match index {
            Some(i) => self.list_state.select(Some(i)),
            None => self.reset_selection(),
        }
        true
    }

    /// Reset selection to first entry.
    pub fn reset_selection(&mut self) {
        if self.entries().is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }
}
