use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

use vc_base::actions::Action;
use vc_base::config::constants::{SCROLL_LINE_AMOUNT, SCROLL_PAGE_AMOUNT};
use vc_base::config::theme;
use vc_base::panels::Panel;
use vc_base::state::State;

use crate::annotation::{Badge, FileStatus};
use crate::fetch::FetchKind;
use crate::types::GitState;

/// Body of the `files` tab: the current branch's changed paths.
pub struct ChangesPanel;

fn section(lines: &mut Vec<Line<'static>>, badge: Badge, paths: &[String], selected: Option<&str>, base_style: Style) {
    let color = if badge.status == FileStatus::Modified { theme::warning() } else { theme::success() };
    lines.push(Line::from(Span::styled(
        format!(" {} ({})", badge.title, paths.len()),
        base_style.fg(theme::text_secondary()).bold(),
    )));
    for path in paths {
        let style = if selected == Some(path.as_str()) {
            base_style.fg(theme::accent()).bold()
        } else {
            base_style.fg(theme::text())
        };
        lines.push(Line::from(vec![
            Span::styled("   ", base_style),
            Span::styled(badge.text, base_style.fg(color).bold()),
            Span::styled(" ", base_style),
            Span::styled(path.clone(), style),
        ]));
    }
}

impl Panel for ChangesPanel {
    fn title(&self, state: &State) -> String {
        let gs = GitState::get(state);
        let changed = gs.branch.modified_files.len() + gs.branch.untracked_files.len();
        format!("Changes ({})", changed)
    }

    fn content(&self, state: &State, base_style: Style) -> Vec<Line<'static>> {
        let gs = GitState::get(state);
        let muted = base_style.fg(theme::text_muted());
        let branch = &gs.branch;

        if branch.name.is_empty() {
            let msg = if gs.generations.is_pending(FetchKind::Branch) { "Loading..." } else { "No branch loaded" };
            return vec![Line::from(Span::styled(format!(" {}", msg), muted))];
        }

        let mut lines = vec![
            Line::from(vec![
                Span::styled(" Branch ", muted),
                Span::styled(branch.name.clone(), base_style.fg(theme::accent()).bold()),
            ]),
            Line::from(""),
        ];

        if branch.modified_files.is_empty() && branch.untracked_files.is_empty() {
            lines.push(Line::from(Span::styled(" Working tree clean", muted)));
            return lines;
        }

        let selected = state.selection.selected_file_path.as_deref();
        if !branch.modified_files.is_empty() {
            section(&mut lines, Badge::MODIFIED, &branch.modified_files, selected, base_style);
            lines.push(Line::from(""));
        }
        if !branch.untracked_files.is_empty() {
            section(&mut lines, Badge::UNTRACKED, &branch.untracked_files, selected, base_style);
        }
        lines
    }

    fn handle_key(&self, key: &KeyEvent, _state: &State) -> Option<Action> {
        match key.code {
            KeyCode::Char('r') => Some(Action::FetchBranch),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollBodyUp(SCROLL_LINE_AMOUNT)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollBodyDown(SCROLL_LINE_AMOUNT)),
            KeyCode::PageUp => Some(Action::ScrollBodyUp(SCROLL_PAGE_AMOUNT)),
            KeyCode::PageDown => Some(Action::ScrollBodyDown(SCROLL_PAGE_AMOUNT)),
            _ => None,
        }
    }

    fn scroll(&self, state: &State, _viewport_height: u16) -> u16 {
        GitState::get(state).body_scroll
    }
}
