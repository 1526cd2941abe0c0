use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

use vc_base::actions::Action;
use vc_base::config::{badges, theme};
use vc_base::panels::Panel;
use vc_base::state::State;
use vc_base::ui::spinner;

use crate::annotation::{AnnotationIndex, Badge, FileStatus};
use crate::fetch::FetchKind;
use crate::tree::TreeRow;
use crate::types::GitState;

/// The "before" panel: the current branch's files with change markers.
pub struct FileTreePanel;

impl FileTreePanel {
    /// Marker for one node. Folders are never decorated.
    fn decorate(index: Option<&AnnotationIndex>, row: &TreeRow) -> Option<Badge> {
        index?.badge(&row.full_path, row.is_dir)
    }

    fn badge_color(badge: Badge) -> Color {
        match badge.status {
            FileStatus::Modified => theme::warning(),
            FileStatus::Untracked => theme::success(),
            FileStatus::Unchanged => theme::text_muted(),
        }
    }
}

impl Panel for FileTreePanel {
    fn title(&self, state: &State) -> String {
        let gs = GitState::get(state);
        let mut title = if gs.branch.name.is_empty() { "Files".to_string() } else { format!("Files · {}", gs.branch.name) };
        if gs.generations.is_pending(FetchKind::Branch) {
            title.push(' ');
            title.push_str(spinner(state.spinner_frame));
        }
        title
    }

    fn content(&self, state: &State, base_style: Style) -> Vec<Line<'static>> {
        let gs = GitState::get(state);
        let rows = gs.tree.rows(&gs.branch.files);

        if rows.is_empty() {
            let msg = if gs.generations.is_pending(FetchKind::Branch) { "Loading..." } else { "No files" };
            return vec![Line::from(Span::styled(format!(" {}", msg), Style::default().fg(theme::text_muted())))];
        }

        let index = gs.annotations.get();
        let selected = state.selection.selected_file_path.as_deref();
        let mut lines = Vec::with_capacity(rows.len());

        for (i, row) in rows.iter().enumerate() {
            let is_cursor = i == gs.tree.cursor;
            let is_selected = selected == Some(row.full_path.as_str());
            let row_style = if is_cursor { base_style.bg(theme::bg_elevated()) } else { base_style };

            let glyph = if !row.is_dir {
                " "
            } else if row.expanded {
                badges::folder_open()
            } else {
                badges::folder_closed()
            };

            let name_style = if is_selected {
                row_style.fg(theme::accent()).bold()
            } else if row.is_dir {
                row_style.fg(theme::text_secondary())
            } else {
                row_style.fg(theme::text())
            };

            let mut spans = vec![
                Span::styled(format!(" {}{} ", "  ".repeat(row.depth), glyph), row_style.fg(theme::text_muted())),
                Span::styled(row.name.clone(), name_style),
            ];

            if let Some(badge) = Self::decorate(index, row) {
                spans.push(Span::styled(" ", row_style));
                spans.push(Span::styled(badge.text, row_style.fg(Self::badge_color(badge)).bold()));
                if is_cursor {
                    spans.push(Span::styled(format!(" {}", badge.title), row_style.fg(theme::text_muted())));
                }
            }

            lines.push(Line::from(spans));
        }

        lines
    }

    fn handle_key(&self, key: &KeyEvent, state: &State) -> Option<Action> {
        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::TreeCursorUp,
            KeyCode::Down | KeyCode::Char('j') => Action::TreeCursorDown,
            KeyCode::Right | KeyCode::Char('l') => Action::TreeExpand,
            KeyCode::Left | KeyCode::Char('h') => Action::TreeCollapse,
            KeyCode::Char('r') => Action::FetchBranch,
            KeyCode::Enter | KeyCode::Char(' ') => {
                let gs = GitState::get(state);
                let rows = gs.tree.rows(&gs.branch.files);
                let row = rows.get(gs.tree.cursor)?;
                if row.is_dir { Action::ToggleDir(row.full_path.clone()) } else { Action::ClickFile(row.full_path.clone()) }
            }
            _ => return None,
        };
        Some(action)
    }

    fn scroll(&self, state: &State, viewport_height: u16) -> u16 {
        let cursor = u16::try_from(GitState::get(state).tree.cursor).unwrap_or(u16::MAX);
        cursor.saturating_add(1).saturating_sub(viewport_height)
    }
}
