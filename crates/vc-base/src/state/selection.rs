use crate::config::constants::{DEFAULT_BRANCH_BASE, TAB_QUERY_KEY};
use crate::route::{Location, query_from_url};

/// A tab of the dashboard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub uuid: &'static str,
    pub label: &'static str,
}

pub const TAB_FILES: Tab = Tab { uuid: "files", label: "Files" };
pub const TAB_BRANCHES: Tab = Tab { uuid: "branches", label: "Branches" };

/// Declared tabs in display order. The first one is the default.
pub const TABS: &[Tab] = &[TAB_FILES, TAB_BRANCHES];

pub fn find_tab(uuid: &str) -> Option<Tab> {
    TABS.iter().copied().find(|t| t.uuid == uuid)
}

/// Tab named by the location's `tab` parameter, else the first declared tab.
pub fn tab_from_location(location: &Location) -> Tab {
    query_from_url(location).get(TAB_QUERY_KEY).and_then(|uuid| find_tab(uuid)).unwrap_or(TABS[0])
}

/// Click-to-toggle: clicking the selected path clears the selection,
/// clicking any other path selects it.
pub fn toggle_selected_path(current: Option<&str>, clicked: &str) -> Option<String> {
    if current == Some(clicked) { None } else { Some(clicked.to_string()) }
}

/// Selection state of the version control view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub selected_tab: Tab,
    pub selected_file_path: Option<String>,
    pub branch_base: String,
}

impl Default for Selection {
    fn default() -> Self {
        Self { selected_tab: TABS[0], selected_file_path: None, branch_base: DEFAULT_BRANCH_BASE.to_string() }
    }
}

impl Selection {
    pub fn click_file(&mut self, path: &str) {
        self.selected_file_path = toggle_selected_path(self.selected_file_path.as_deref(), path);
    }
}
