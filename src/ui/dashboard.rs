use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use vc_base::config::constants::{BODY_MIN_HEIGHT, TREE_PANEL_WIDTH};
use vc_base::config::{chars, theme};
use vc_base::panels::Panel;
use vc_base::state::{Focus, State, TABS};

/// Page shell: title row, tab header, a "before" column on the left, and on the
/// right the optional "after" panel stacked over the tab body.
pub struct Dashboard<'a> {
    pub title: &'a str,
    pub uuid: &'a str,
    pub before: &'a dyn Panel,
    pub after: &'a dyn Panel,
    pub after_hidden: bool,
    pub body: &'a dyn Panel,
}

impl Dashboard<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect, state: &State) {
        let [title_area, header_area, content] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)]).areas(area);

        self.render_title(frame, title_area, state);
        render_header(frame, header_area, state);

        let [before_area, right] =
            Layout::horizontal([Constraint::Length(TREE_PANEL_WIDTH), Constraint::Min(1)]).areas(content);
        self.before.render(frame, before_area, state, state.focus == Focus::Tree);

        if self.after_hidden {
            self.body.render(frame, right, state, state.focus == Focus::Body);
            return;
        }

        let [after_area, body_area] =
            Layout::vertical([Constraint::Percentage(65), Constraint::Min(BODY_MIN_HEIGHT)]).areas(right);
        self.after.render(frame, after_area, state, state.focus == Focus::Diff);
        self.body.render(frame, body_area, state, state.focus == Focus::Body);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect, state: &State) {
        let base = Style::default().bg(theme::bg_surface());
        let left = Line::from(vec![
            Span::styled(format!(" {} ", self.title), base.fg(theme::accent()).bold()),
            Span::styled(chars::DOT, base.fg(theme::accent_dim())),
            Span::styled(format!(" {}", self.uuid), base.fg(theme::text_muted())),
        ]);
        frame.render_widget(Paragraph::new(left).style(base), area);

        let source = &vc_mod_git::GitState::get(state).source;
        if !source.is_empty() {
            let right = Line::from(Span::styled(format!("{} ", source), base.fg(theme::text_muted())));
            frame.render_widget(Paragraph::new(right).alignment(Alignment::Right), area);
        }
    }
}

/// Tab strip plus the current location.
fn render_header(frame: &mut Frame, area: Rect, state: &State) {
    let base = Style::default().bg(theme::bg_base());
    let mut spans = vec![Span::styled(" ", base)];

    for (i, tab) in TABS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(chars::VERTICAL, base.fg(theme::border())));
        }
        let style = if *tab == state.selection.selected_tab {
            base.bg(theme::bg_elevated()).fg(theme::accent()).bold()
        } else {
            base.fg(theme::text_secondary())
        };
        spans.push(Span::styled(format!(" {} {} ", i + 1, tab.label), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(base), area);

    let router = &state.router;
    let back = if router.can_go_back() { theme::text_secondary() } else { theme::border() };
    let forward = if router.can_go_forward() { theme::text_secondary() } else { theme::border() };
    let location = Line::from(vec![
        Span::styled(chars::ARROW_LEFT, base.fg(back)),
        Span::styled(chars::ARROW_RIGHT, base.fg(forward)),
        Span::styled(format!(" {} ", router.current()), base.fg(theme::text_muted())),
    ]);
    frame.render_widget(Paragraph::new(location).alignment(Alignment::Right), area);
}
