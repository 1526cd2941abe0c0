//! Runtime state of the view.
//!
//! `State` holds what every part of the UI needs (selection, location, error
//! reporter, focus). Module crates keep their own data in the extension map,
//! registered at startup via `Module::init_state()`.

mod selection;

pub use selection::{
    Selection, TAB_BRANCHES, TAB_FILES, TABS, Tab, find_tab, tab_from_location, toggle_selected_path,
};

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::config::DEFAULT_THEME;
use crate::config::constants::{TAB_QUERY_KEY, VIEW_UUID};
use crate::errors::ErrorReporter;
use crate::route::{Location, Router};

/// Which panel receives keys that are not global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tree,
    Diff,
    Body,
}

pub struct State {
    pub selection: Selection,
    pub router: Router,
    pub reporter: ErrorReporter,
    /// Configured visibility of the diff ("after") panel
    pub show_diff_panel: bool,
    pub focus: Focus,
    /// Requests dispatched and not yet answered
    pub in_flight: usize,
    /// Whether the UI needs to be re-rendered
    pub dirty: bool,
    pub spinner_frame: u64,
    pub active_theme: String,

    // === Module extension data (TypeMap pattern) ===
    /// Module-owned state stored by TypeId. Accessed via `get_ext<T>()`/`get_ext_mut<T>()`.
    pub module_data: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Default for State {
    fn default() -> Self {
        Self::new(Location::default())
    }
}

impl State {
    /// Fresh state whose tab is taken from `location` (read once, on start).
    pub fn new(location: Location) -> Self {
        let mut state = Self {
            selection: Selection::default(),
            router: Router::new(location),
            reporter: ErrorReporter::new(VIEW_UUID),
            show_diff_panel: true,
            focus: Focus::default(),
            in_flight: 0,
            dirty: true,
            spinner_frame: 0,
            active_theme: DEFAULT_THEME.to_string(),
            module_data: HashMap::new(),
        };
        state.sync_tab_from_location();
        state
    }

    // === Module extension data (TypeMap) ===

    /// Get a reference to module-owned state by type.
    pub fn get_ext<T: 'static + Send + Sync>(&self) -> Option<&T> {
        self.module_data.get(&TypeId::of::<T>()).and_then(|v| v.downcast_ref())
    }

    /// Get a mutable reference to module-owned state by type.
    pub fn get_ext_mut<T: 'static + Send + Sync>(&mut self) -> Option<&mut T> {
        self.module_data.get_mut(&TypeId::of::<T>()).and_then(|v| v.downcast_mut())
    }

    /// Set module-owned state by type. Replaces any existing value of this type.
    pub fn set_ext<T: 'static + Send + Sync>(&mut self, val: T) {
        self.module_data.insert(TypeId::of::<T>(), Box::new(val));
    }

    // === Tabs & location ===

    /// Write the tab into the location query; the selected tab follows the location.
    pub fn select_tab(&mut self, tab: Tab) {
        self.router.go_to_with_query(&[(TAB_QUERY_KEY, tab.uuid)]);
        self.sync_tab_from_location();
    }

    pub fn history_back(&mut self) -> bool {
        let moved = self.router.back();
        if moved {
            self.sync_tab_from_location();
        }
        moved
    }

    pub fn history_forward(&mut self) -> bool {
        let moved = self.router.forward();
        if moved {
            self.sync_tab_from_location();
        }
        moved
    }

    fn sync_tab_from_location(&mut self) {
        self.selection.selected_tab = tab_from_location(self.router.current());
        self.dirty = true;
    }

    /// The diff panel is hidden when disabled or when no file is selected.
    pub fn after_hidden(&self) -> bool {
        !self.show_diff_panel || self.selection.selected_file_path.is_none()
    }
}
