//! Panel trait shared by the dashboard regions.
//!
//! A panel produces a title and owned content lines from `State`; the default
//! `render` wraps them in a rounded block and scrolls them. Panels with a
//! layout of their own (the split diff) override `render`.

use crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::actions::Action;
use crate::config::theme;
use crate::state::State;

pub trait Panel {
    /// Generate the panel's title for display
    fn title(&self, state: &State) -> String;

    /// Generate the panel's content lines for rendering (uses 'static since we create owned data)
    fn content(&self, state: &State, base_style: Style) -> Vec<Line<'static>>;

    /// Handle a key while this panel has focus. `None` lets global handling continue.
    fn handle_key(&self, _key: &KeyEvent, _state: &State) -> Option<Action> {
        None
    }

    /// First visible content line for a viewport of `viewport_height` rows.
    fn scroll(&self, _state: &State, _viewport_height: u16) -> u16 {
        0
    }

    fn render(&self, frame: &mut Frame, area: Rect, state: &State, focused: bool) {
        let base_style = Style::default().bg(theme::bg_surface()).fg(theme::text());
        let block = panel_block(&self.title(state), focused, base_style);
        let content_area = block.inner(area);
        frame.render_widget(block, area);

        let lines = self.content(state, base_style);
        let max_scroll = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_sub(content_area.height);
        let scroll = self.scroll(state, content_area.height).min(max_scroll);
        frame.render_widget(Paragraph::new(lines).style(base_style).scroll((scroll, 0)), content_area);
    }
}

/// Rounded block with the panel title, accent border when focused.
pub fn panel_block(title: &str, focused: bool, base_style: Style) -> Block<'static> {
    let border = if focused { theme::accent() } else { theme::border() };
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(base_style)
        .title(Span::styled(format!(" {} ", title), Style::default().fg(theme::accent()).bold()))
}
