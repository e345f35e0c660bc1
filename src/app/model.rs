//! Application model types: `App` and `View`.
//!
//! The `App` struct holds the merged catalog, the active view, selection
//! and the playback flags used by the UI and runtime.

use crate::catalog::{Catalog, Direction, Origin, Track};
use crate::session::SessionHandle;

/// The screens the application can show.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum View {
    /// Landing screen with a short welcome.
    Home,
    /// Local-only picks ("Popular Songs").
    Profile,
    /// The full merged catalog with filtering and previews.
    Library,
    /// Full-screen controls for the shared playback session.
    Player,
}

/// The main application model.
pub struct App {
    pub view: View,
    pub catalog: Catalog,
    /// Index into the current visible track list.
    pub selected: usize,

    pub filter_mode: bool,
    pub filter_query: String,

    pub shuffle: bool,
    pub loop_enabled: bool,

    pub session_handle: Option<SessionHandle>,
}

impl App {
    pub fn new(catalog: Catalog, shuffle: bool, loop_enabled: bool) -> Self {
        Self {
            view: View::Home,
            catalog,
            selected: 0,
            filter_mode: false,
            filter_query: String::new(),
            shuffle,
            loop_enabled,
            session_handle: None,
        }
    }

    /// Attach the shared session snapshot used to render playback state.
    pub fn set_session_handle(&mut self, handle: SessionHandle) {
        self.session_handle = Some(handle);
    }

    /// The track list the active view shows. The library view is the merged
    /// catalog narrowed by the filter; the profile view is local-only.
    pub fn visible_tracks(&self) -> Vec<&Track> {
        let entries = self.catalog.snapshot();
        match self.view {
            View::Profile => entries
                .into_iter()
                .filter(|t| t.origin == Origin::Local)
                .collect(),
            _ => {
                let query = self.filter_query.trim().to_lowercase();
                if query.is_empty() {
                    entries
                } else {
                    // Plain substring match on the display line, case-insensitive.
                    entries
                        .into_iter()
                        .filter(|t| t.display.to_lowercase().contains(&query))
                        .collect()
                }
            }
        }
    }

    pub fn selected_track(&self) -> Option<&Track> {
        let visible = self.visible_tracks();
        visible.get(self.selected.min(visible.len().saturating_sub(1))).copied()
    }

    /// Move selection down, wrapping around the visible list.
    pub fn select_next(&mut self) {
        let len = self.visible_tracks().len();
        if len > 0 {
            self.selected = (self.selected.min(len - 1) + 1) % len;
        }
    }

    /// Move selection up, wrapping around the visible list.
    pub fn select_prev(&mut self) {
        let len = self.visible_tracks().len();
        if len > 0 {
            let current = self.selected.min(len - 1);
            self.selected = (current + len - 1) % len;
        }
    }

    pub fn set_view(&mut self, view: View) {
        self.view = view;
        self.clamp_selection();
    }

    /// Enter filter mode; subsequent characters narrow the library view.
    pub fn enter_filter_mode(&mut self) {
        self.filter_mode = true;
    }

    /// Leave filter mode, keeping the query applied.
    pub fn exit_filter_mode(&mut self) {
        self.filter_mode = false;
    }

    /// Drop the query entirely and leave filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_mode = false;
        self.clamp_selection();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter_query.push(c);
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter_query.pop();
        self.clamp_selection();
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn toggle_loop(&mut self) {
        self.loop_enabled = !self.loop_enabled;
    }

    /// The track that plays after `id` ends or is skipped forward: a random
    /// pick under shuffle, the cyclic successor otherwise.
    pub fn advance_from(&self, id: &str) -> Option<Track> {
        if self.shuffle {
            self.catalog.random_pick().cloned()
        } else {
            self.catalog.neighbor(id, Direction::Next).cloned()
        }
    }

    /// The track before `id` in catalog order. Shuffle does not apply to
    /// backward steps.
    pub fn previous_from(&self, id: &str) -> Option<Track> {
        self.catalog.neighbor(id, Direction::Previous).cloned()
    }

    /// Keep `selected` inside the visible list after it shrinks.
    fn clamp_selection(&mut self) {
        let len = self.visible_tracks().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}
