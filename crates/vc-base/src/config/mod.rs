//! YAML configuration loader for themes and badge glyphs.
use std::sync::LazyLock;

use serde::Deserialize;
use std::collections::HashMap;

// ============================================================================
// Theme Configuration
// ============================================================================

#[derive(Debug, Deserialize, Clone)]
pub struct BadgeIcons {
    pub folder_open: String,
    pub folder_closed: String,
    pub current_branch: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemesConfig {
    pub themes: HashMap<String, Theme>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub badges: BadgeIcons,
    pub colors: ThemeColors,
}

/// RGB color as [r, g, b] array
pub type RgbColor = [u8; 3];

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeColors {
    pub accent: RgbColor,
    pub accent_dim: RgbColor,
    pub success: RgbColor,
    pub warning: RgbColor,
    pub error: RgbColor,
    pub text: RgbColor,
    pub text_secondary: RgbColor,
    pub text_muted: RgbColor,
    pub bg_base: RgbColor,
    pub bg_surface: RgbColor,
    pub bg_elevated: RgbColor,
    pub border: RgbColor,
    pub border_muted: RgbColor,
    pub diff_added_bg: RgbColor,
    pub diff_removed_bg: RgbColor,
    pub diff_added_word: RgbColor,
    pub diff_removed_word: RgbColor,
}

/// Default theme ID
pub const DEFAULT_THEME: &str = "dusk";

/// Available theme IDs in display order
pub const THEME_ORDER: &[&str] = &["dusk", "paper"];

// ============================================================================
// Loading Functions
// ============================================================================

fn parse_yaml<T: for<'de> Deserialize<'de>>(name: &str, content: &str) -> T {
    serde_yaml::from_str(content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", name, e))
}

// ============================================================================
// Global Configuration (embedded at compile time)
// ============================================================================

pub mod constants;

pub static THEMES: LazyLock<ThemesConfig> =
    LazyLock::new(|| parse_yaml("themes.yaml", include_str!("../../../../yamls/themes.yaml")));

/// Get a theme by ID, falling back to default if not found
pub fn get_theme(theme_id: &str) -> &'static Theme {
    THEMES.themes.get(theme_id).or_else(|| THEMES.themes.get(DEFAULT_THEME)).expect("Default theme must exist")
}

/// The theme after `theme_id` in [`THEME_ORDER`], wrapping around.
pub fn next_theme_id(theme_id: &str) -> &'static str {
    let idx = THEME_ORDER.iter().position(|t| *t == theme_id).unwrap_or(0);
    THEME_ORDER[(idx + 1) % THEME_ORDER.len()]
}

// ============================================================================
// Active Theme (cached atomic pointer)
// ============================================================================

use std::sync::atomic::{AtomicPtr, Ordering};

/// Cached pointer to the active theme. Updated by set_active_theme().
/// Points into the static THEMES LazyLock, so the reference is always valid.
static CACHED_THEME: AtomicPtr<Theme> = AtomicPtr::new(std::ptr::null_mut());

/// Set the active theme ID (call when settings are loaded or the theme changes)
pub fn set_active_theme(theme_id: &str) {
    let theme: &'static Theme = get_theme(theme_id);
    CACHED_THEME.store(theme as *const Theme as *mut Theme, Ordering::Release);
}

/// Get the currently active theme (single atomic load)
pub fn active_theme() -> &'static Theme {
    let ptr = CACHED_THEME.load(Ordering::Acquire);
    if !ptr.is_null() {
        // SAFETY: ptr was set from a &'static Theme reference stored in LazyLock THEMES.
        // The Theme data is never mutated or freed after initialization.
        unsafe { &*ptr }
    } else {
        let theme = get_theme(DEFAULT_THEME);
        CACHED_THEME.store(theme as *const Theme as *mut Theme, Ordering::Release);
        theme
    }
}

// =============================================================================
// THEME COLORS (loaded from active theme in yamls/themes.yaml)
// =============================================================================

pub mod theme {
    use crate::config::active_theme;
    use ratatui::style::Color;

    fn rgb(c: [u8; 3]) -> Color {
        Color::Rgb(c[0], c[1], c[2])
    }

    pub fn accent() -> Color {
        rgb(active_theme().colors.accent)
    }
    pub fn accent_dim() -> Color {
        rgb(active_theme().colors.accent_dim)
    }
    pub fn success() -> Color {
        rgb(active_theme().colors.success)
    }
    pub fn warning() -> Color {
        rgb(active_theme().colors.warning)
    }
    pub fn error() -> Color {
        rgb(active_theme().colors.error)
    }
    pub fn text() -> Color {
        rgb(active_theme().colors.text)
    }
    pub fn text_secondary() -> Color {
        rgb(active_theme().colors.text_secondary)
    }
    pub fn text_muted() -> Color {
        rgb(active_theme().colors.text_muted)
    }
    pub fn bg_base() -> Color {
        rgb(active_theme().colors.bg_base)
    }
    pub fn bg_surface() -> Color {
        rgb(active_theme().colors.bg_surface)
    }
    pub fn bg_elevated() -> Color {
        rgb(active_theme().colors.bg_elevated)
    }
    pub fn border() -> Color {
        rgb(active_theme().colors.border)
    }
    pub fn border_muted() -> Color {
        rgb(active_theme().colors.border_muted)
    }
    pub fn diff_added_bg() -> Color {
        rgb(active_theme().colors.diff_added_bg)
    }
    pub fn diff_removed_bg() -> Color {
        rgb(active_theme().colors.diff_removed_bg)
    }
    pub fn diff_added_word() -> Color {
        rgb(active_theme().colors.diff_added_word)
    }
    pub fn diff_removed_word() -> Color {
        rgb(active_theme().colors.diff_removed_word)
    }
}

// =============================================================================
// UI CHARACTERS
// =============================================================================

pub mod chars {
    pub const HORIZONTAL: &str = "─";
    pub const VERTICAL: &str = "│";
    pub const DOT: &str = "●";
    pub const ARROW_LEFT: &str = "◂";
    pub const ARROW_RIGHT: &str = "▸";
    pub const ELLIPSIS: &str = "…";
}

// =============================================================================
// GLYPHS (loaded from active theme in yamls/themes.yaml)
// =============================================================================

pub mod badges {
    use crate::config::active_theme;

    pub fn folder_open() -> &'static str {
        &active_theme().badges.folder_open
    }
    pub fn folder_closed() -> &'static str {
        &active_theme().badges.folder_closed
    }
    pub fn current_branch() -> &'static str {
        &active_theme().badges.current_branch
    }
}
