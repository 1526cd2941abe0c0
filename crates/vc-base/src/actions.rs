use crate::state::Tab;

/// Everything a key press can ask the view to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    SelectTab(Tab),
    HistoryBack,
    HistoryForward,
    CycleFocus,
    // File tree
    TreeCursorUp,
    TreeCursorDown,
    TreeExpand,
    TreeCollapse,
    ToggleDir(String),
    /// Leaf activation: toggles the file selection
    ClickFile(String),
    // Data hooks
    FetchBranch,
    FetchAll,
    // Scrolling
    ScrollDiffUp(u16),
    ScrollDiffDown(u16),
    ScrollBodyUp(u16),
    ScrollBodyDown(u16),
    // Chrome
    DismissError,
    ToggleDiffPanel,
    CycleTheme,
}

/// Side effects the event loop has to perform after an action was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Nothing,
    /// State changed; redraw
    Redraw,
}
