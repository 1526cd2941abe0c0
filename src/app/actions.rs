use vc_base::actions::{Action, ActionResult};
use vc_base::config::{next_theme_id, set_active_theme};
use vc_base::state::{Focus, State};
use vc_mod_git::{GitState, diff_panel_visible};

/// Apply a state-only action. Fetch actions are carried out by the app,
/// which owns the fetcher, and return `Nothing` here.
pub fn apply_action(state: &mut State, action: Action) -> ActionResult {
    match action {
        Action::None | Action::FetchBranch | Action::FetchAll => ActionResult::Nothing,

        Action::SelectTab(tab) => {
            if state.selection.selected_tab != tab {
                state.select_tab(tab);
                GitState::get_mut(state).body_scroll = 0;
            }
            ActionResult::Redraw
        }
        Action::HistoryBack => {
            if state.history_back() { ActionResult::Redraw } else { ActionResult::Nothing }
        }
        Action::HistoryForward => {
            if state.history_forward() { ActionResult::Redraw } else { ActionResult::Nothing }
        }
        Action::CycleFocus => {
            state.focus = next_focus(state);
            ActionResult::Redraw
        }

        Action::TreeCursorUp => {
            GitState::get_mut(state).tree.move_up();
            ActionResult::Redraw
        }
        Action::TreeCursorDown => {
            let gs = GitState::get_mut(state);
            let count = gs.tree.rows(&gs.branch.files).len();
            gs.tree.move_down(count);
            ActionResult::Redraw
        }
        Action::TreeExpand => {
            let gs = GitState::get_mut(state);
            let rows = gs.tree.rows(&gs.branch.files);
            gs.tree.expand_at_cursor(&rows);
            ActionResult::Redraw
        }
        Action::TreeCollapse => {
            let gs = GitState::get_mut(state);
            let rows = gs.tree.rows(&gs.branch.files);
            gs.tree.collapse_at_cursor(&rows);
            ActionResult::Redraw
        }
        Action::ToggleDir(path) => {
            let gs = GitState::get_mut(state);
            gs.tree.toggle(&path);
            let count = gs.tree.rows(&gs.branch.files).len();
            gs.tree.clamp(count);
            ActionResult::Redraw
        }
        Action::ClickFile(path) => {
            state.selection.click_file(&path);
            ActionResult::Redraw
        }

        Action::ScrollDiffUp(amount) => {
            let gs = GitState::get_mut(state);
            gs.diff_scroll = gs.diff_scroll.saturating_sub(amount);
            ActionResult::Redraw
        }
        Action::ScrollDiffDown(amount) => {
            let selected = state.selection.selected_file_path.clone();
            let gs = GitState::get_mut(state);
            let rows = gs.current_diff(selected.as_deref()).map(|d| d.rows.len()).unwrap_or(0);
            let max = u16::try_from(rows.saturating_sub(1)).unwrap_or(u16::MAX);
            gs.diff_scroll = gs.diff_scroll.saturating_add(amount).min(max);
            ActionResult::Redraw
        }
        Action::ScrollBodyUp(amount) => {
            let gs = GitState::get_mut(state);
            gs.body_scroll = gs.body_scroll.saturating_sub(amount);
            ActionResult::Redraw
        }
        Action::ScrollBodyDown(amount) => {
            let gs = GitState::get_mut(state);
            gs.body_scroll = gs.body_scroll.saturating_add(amount);
            ActionResult::Redraw
        }

        Action::DismissError => {
            state.reporter.dismiss();
            ActionResult::Redraw
        }
        Action::ToggleDiffPanel => {
            state.show_diff_panel = !state.show_diff_panel;
            tracing::info!(show = state.show_diff_panel, "diff panel toggled");
            ActionResult::Redraw
        }
        Action::CycleTheme => {
            let next = next_theme_id(&state.active_theme);
            set_active_theme(next);
            state.active_theme = next.to_string();
            ActionResult::Redraw
        }
    }
}

/// Tree → Diff (when shown) → Body → Tree.
fn next_focus(state: &State) -> Focus {
    match state.focus {
        Focus::Tree if diff_panel_visible(state) => Focus::Diff,
        Focus::Tree | Focus::Diff => Focus::Body,
        Focus::Body => Focus::Tree,
    }
}

/// Move focus off a panel that is no longer shown.
pub fn fix_focus(state: &mut State) {
    if state.focus == Focus::Diff && !diff_panel_visible(state) {
        state.focus = Focus::Tree;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vc_base::modules::Module;
    use vc_base::route::Location;
    use vc_base::state::{TAB_BRANCHES, TAB_FILES};
    use vc_base::types::{Branch, FileNode, FileResponse};
    use vc_mod_git::GitModule;

    fn state() -> State {
        let mut state = State::new(Location::parse("?foo=1"));
        GitModule.init_state(&mut state);
        GitState::get_mut(&mut state).branch = Branch {
            name: "main".into(),
            files: vec![FileNode::leaf("a.py"), FileNode::dir("dir", vec![FileNode::leaf("b.py")])],
            ..Branch::default()
        };
        state
    }

    #[test]
    fn tab_click_writes_location_and_keeps_selection() {
        let mut state = state();
        apply_action(&mut state, Action::ClickFile("a.py".into()));
        apply_action(&mut state, Action::SelectTab(TAB_BRANCHES));
        assert_eq!(state.router.current().to_string(), "?foo=1&tab=branches");
        assert_eq!(state.selection.selected_file_path.as_deref(), Some("a.py"));

        apply_action(&mut state, Action::HistoryBack);
        assert_eq!(state.selection.selected_tab, TAB_FILES);
    }

    #[test]
    fn clicking_twice_deselects() {
        let mut state = state();
        apply_action(&mut state, Action::ClickFile("a.py".into()));
        apply_action(&mut state, Action::ClickFile("a.py".into()));
        assert_eq!(state.selection.selected_file_path, None);
    }

    #[test]
    fn tree_navigation_unfolds_folders() {
        let mut state = state();
        apply_action(&mut state, Action::TreeCursorDown);
        apply_action(&mut state, Action::TreeExpand);
        apply_action(&mut state, Action::TreeCursorDown);
        let gs = GitState::get(&state);
        let rows = gs.tree.rows(&gs.branch.files);
        assert_eq!(rows[gs.tree.cursor].full_path, "dir/b.py");
    }

    #[test]
    fn focus_skips_hidden_diff_panel() {
        let mut state = state();
        apply_action(&mut state, Action::CycleFocus);
        assert_eq!(state.focus, Focus::Body);

        state.focus = Focus::Tree;
        state.selection.click_file("a.py");
        GitState::get_mut(&mut state).file_response = Some(FileResponse::default());
        apply_action(&mut state, Action::CycleFocus);
        assert_eq!(state.focus, Focus::Diff);

        apply_action(&mut state, Action::ToggleDiffPanel);
        fix_focus(&mut state);
        assert_eq!(state.focus, Focus::Tree);
    }

    #[test]
    fn dismiss_hides_error() {
        let mut state = state();
        state.reporter.show_error(vc_base::types::ErrorPayload::from_message("boom"), serde_json::Value::Null);
        apply_action(&mut state, Action::DismissError);
        assert!(state.reporter.visible().is_none());
    }
}
