// =============================================================================
// STORAGE
// =============================================================================

/// Directory holding settings, persisted route and logs (relative to cwd)
pub const STORE_DIR: &str = ".vcview";

/// Settings file inside STORE_DIR
pub const CONFIG_FILE: &str = "config.json";

/// Persisted view snapshot inside STORE_DIR
pub const STATE_FILE: &str = "state.json";

/// Log directory inside STORE_DIR
pub const LOG_DIR: &str = "logs";

// =============================================================================
// VIEW IDENTITY
// =============================================================================

/// Scope of the error reporter for this view
pub const VIEW_UUID: &str = "VersionControlPage";

/// Dashboard shell title
pub const DASHBOARD_TITLE: &str = "Version control";

/// Dashboard shell identifier
pub const DASHBOARD_UUID: &str = "Version control/index";

/// Query parameter that carries the selected tab
pub const TAB_QUERY_KEY: &str = "tab";

// =============================================================================
// DATA SERVICE
// =============================================================================

/// Branch the selected file is diffed against unless configured otherwise
pub const DEFAULT_BRANCH_BASE: &str = "td--version_control";

/// Identifier of the checked-out branch in `git_branches/<id>`
pub const CURRENT_BRANCH_ID: &str = "current";

/// Default data service root
pub const DEFAULT_API_URL: &str = "http://localhost:6789";

/// Per-request timeout for the HTTP client
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Attempts per GET (first try + 5xx retries)
pub const HTTP_MAX_ATTEMPTS: u32 = 3;

/// Pause between 5xx retries
pub const HTTP_RETRY_DELAY_MS: u64 = 1_000;

/// Timeout for local git commands (seconds)
pub const GIT_CMD_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// EVENT LOOP
// =============================================================================

/// Poll interval while fetches are in flight or a redraw is pending
pub const EVENT_POLL_MS: u64 = 16;

/// Poll interval while idle
pub const IDLE_POLL_MS: u64 = 100;

// =============================================================================
// LAYOUT & SCROLLING
// =============================================================================

/// Width of the file tree ("before") panel
pub const TREE_PANEL_WIDTH: u16 = 40;

/// Height of the branch sub-view when the diff panel shares the screen
pub const BODY_MIN_HEIGHT: u16 = 8;

/// Lines scrolled per arrow key
pub const SCROLL_LINE_AMOUNT: u16 = 1;

/// Lines scrolled per PageUp/PageDown
pub const SCROLL_PAGE_AMOUNT: u16 = 10;

// =============================================================================
// ERROR REPORTING
// =============================================================================

/// Reports kept in memory before the oldest are dropped
pub const MAX_ERROR_REPORTS: usize = 50;
