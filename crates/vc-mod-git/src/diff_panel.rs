use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;
use similar::ChangeTag;

use vc_base::actions::Action;
use vc_base::config::constants::{SCROLL_LINE_AMOUNT, SCROLL_PAGE_AMOUNT};
use vc_base::config::{chars, theme};
use vc_base::panels::{Panel, panel_block};
use vc_base::state::State;

use crate::diff::{DiffCell, SplitDiff};
use crate::types::GitState;

/// The "after" panel: base revision on the left, working copy on the right.
pub struct DiffPanel;

/// Shown only when enabled, a file is selected and its diff data has arrived.
pub fn diff_panel_visible(state: &State) -> bool {
    !state.after_hidden() && GitState::get(state).file_response.is_some()
}

#[derive(Clone, Copy)]
enum Side {
    Base,
    Working,
}

fn gutter_width(diff: &SplitDiff) -> usize {
    let max = diff
        .rows
        .iter()
        .flat_map(|r| [r.left.as_ref(), r.right.as_ref()])
        .flatten()
        .map(|c| c.line_no)
        .max()
        .unwrap_or(0);
    max.to_string().len()
}

fn cell_line(cell: Option<&DiffCell>, side: Side, gutter: usize, base_style: Style) -> Line<'static> {
    let Some(cell) = cell else {
        return Line::from(Span::styled(" ".repeat(gutter + 1), base_style.fg(theme::text_muted())))
            .style(base_style.bg(theme::bg_base()));
    };

    let (line_bg, word_bg) = match (cell.tag, side) {
        (ChangeTag::Equal, _) => (None, None),
        (_, Side::Base) => (Some(theme::diff_removed_bg()), Some(theme::diff_removed_word())),
        (_, Side::Working) => (Some(theme::diff_added_bg()), Some(theme::diff_added_word())),
    };
    let line_style = match line_bg {
        Some(bg) => base_style.bg(bg),
        None => base_style,
    };

    let mut spans = vec![Span::styled(
        format!("{:>width$} ", cell.line_no, width = gutter),
        line_style.fg(theme::text_muted()),
    )];
    for segment in &cell.segments {
        let style = match (segment.emphasized, word_bg) {
            (true, Some(bg)) => line_style.bg(bg).fg(theme::text()).bold(),
            _ => line_style.fg(theme::text()),
        };
        spans.push(Span::styled(segment.text.replace('\t', "    "), style));
    }
    Line::from(spans).style(line_style)
}

fn side_lines(diff: &SplitDiff, side: Side, base_style: Style) -> Vec<Line<'static>> {
    let gutter = gutter_width(diff);
    diff.rows
        .iter()
        .map(|row| {
            let cell = match side {
                Side::Base => row.left.as_ref(),
                Side::Working => row.right.as_ref(),
            };
            cell_line(cell, side, gutter, base_style)
        })
        .collect()
}

impl Panel for DiffPanel {
    fn title(&self, state: &State) -> String {
        match state.selection.selected_file_path.as_deref() {
            Some(path) => format!("Diff · {}", path),
            None => "Diff".to_string(),
        }
    }

    /// Summary line above the two columns.
    fn content(&self, state: &State, base_style: Style) -> Vec<Line<'static>> {
        let gs = GitState::get(state);
        let base = format!(" {} {} ", chars::ARROW_LEFT, state.selection.branch_base);
        let mut spans = vec![Span::styled(base, base_style.fg(theme::text_secondary()))];

        match gs.current_diff(state.selection.selected_file_path.as_deref()) {
            None => spans.push(Span::styled("Loading...", base_style.fg(theme::text_muted()))),
            Some(diff) if diff.is_unchanged() => {
                spans.push(Span::styled("No changes", base_style.fg(theme::text_muted())))
            }
            Some(diff) => {
                spans.push(Span::styled(format!("+{}", diff.additions), base_style.fg(theme::success())));
                spans.push(Span::styled(" ", base_style));
                spans.push(Span::styled(format!("-{}", diff.deletions), base_style.fg(theme::error())));
            }
        }
        spans.push(Span::styled(format!(" {} working copy", chars::ARROW_RIGHT), base_style.fg(theme::text_secondary())));
        vec![Line::from(spans)]
    }

    fn handle_key(&self, key: &KeyEvent, _state: &State) -> Option<Action> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollDiffUp(SCROLL_LINE_AMOUNT)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDiffDown(SCROLL_LINE_AMOUNT)),
            KeyCode::Home => Some(Action::ScrollDiffUp(u16::MAX)),
            KeyCode::PageUp => Some(Action::ScrollDiffUp(SCROLL_PAGE_AMOUNT)),
            KeyCode::PageDown => Some(Action::ScrollDiffDown(SCROLL_PAGE_AMOUNT)),
            _ => None,
        }
    }

    fn scroll(&self, state: &State, _viewport_height: u16) -> u16 {
        GitState::get(state).diff_scroll
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &State, focused: bool) {
        let base_style = Style::default().bg(theme::bg_surface()).fg(theme::text());
        let block = panel_block(&self.title(state), focused, base_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [header_area, body_area] = Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(inner);
        frame.render_widget(Paragraph::new(self.content(state, base_style)).style(base_style), header_area);

        let gs = GitState::get(state);
        let Some(diff) = gs.current_diff(state.selection.selected_file_path.as_deref()) else {
            return;
        };

        let [left_area, sep_area, right_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(1), Constraint::Fill(1)]).areas(body_area);

        let max_scroll = u16::try_from(diff.rows.len()).unwrap_or(u16::MAX).saturating_sub(body_area.height);
        let scroll = self.scroll(state, body_area.height).min(max_scroll);

        let left = side_lines(diff, Side::Base, base_style);
        let right = side_lines(diff, Side::Working, base_style);
        frame.render_widget(Paragraph::new(left).style(base_style).scroll((scroll, 0)), left_area);
        frame.render_widget(Paragraph::new(right).style(base_style).scroll((scroll, 0)), right_area);

        let sep: Vec<Line> = (0..sep_area.height)
            .map(|_| Line::from(Span::styled(chars::VERTICAL, Style::default().fg(theme::border_muted()))))
            .collect();
        frame.render_widget(Paragraph::new(sep).style(base_style), sep_area);
    }
}
