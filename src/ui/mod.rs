mod dashboard;
mod status;

use ratatui::{prelude::*, widgets::Block};

use vc_base::config::constants::{DASHBOARD_TITLE, DASHBOARD_UUID};
use vc_base::config::theme;
use vc_base::panels::Panel;
use vc_base::state::{Focus, State, TAB_BRANCHES};
use vc_mod_git::{BranchesPanel, ChangesPanel, DiffPanel, FileTreePanel, diff_panel_visible};

use dashboard::Dashboard;

/// Body of the selected tab.
pub fn body_panel(state: &State) -> Box<dyn Panel> {
    if state.selection.selected_tab == TAB_BRANCHES { Box::new(BranchesPanel) } else { Box::new(ChangesPanel) }
}

/// Panel that receives non-global keys.
pub fn focused_panel(state: &State) -> Box<dyn Panel> {
    match state.focus {
        Focus::Tree => Box::new(FileTreePanel),
        Focus::Diff => Box::new(DiffPanel),
        Focus::Body => body_panel(state),
    }
}

pub fn render(frame: &mut Frame, state: &State) {
    let area = frame.area();

    // Fill base background
    frame.render_widget(Block::default().style(Style::default().bg(theme::bg_base())), area);

    let [main, status_area] = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

    let before = FileTreePanel;
    let after = DiffPanel;
    let body = body_panel(state);
    let dashboard = Dashboard {
        title: DASHBOARD_TITLE,
        uuid: DASHBOARD_UUID,
        before: &before,
        after: &after,
        after_hidden: !diff_panel_visible(state),
        body: body.as_ref(),
    };
    dashboard.render(frame, main, state);

    status::render_status_bar(frame, state, status_area);
}
