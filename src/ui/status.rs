use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use vc_base::config::theme;
use vc_base::ui::{spinner, truncate_to_width};
use vc_base::state::State;
use vc_mod_git::GitState;

const KEY_HINTS: &str = "Tab focus · d diff · t theme · q quit ";
const DISMISS_HINT: &str = " Esc to dismiss ";

pub fn render_status_bar(frame: &mut Frame, state: &State, area: Rect) {
    let base_style = Style::default().bg(theme::bg_base()).fg(theme::text_muted());
    let mut spans = vec![Span::styled(" ", base_style)];

    if state.in_flight > 0 {
        spans.push(Span::styled(
            format!(" {} LOADING {} ", spinner(state.spinner_frame), state.in_flight),
            Style::default().fg(theme::bg_base()).bg(theme::warning()).bold(),
        ));
    } else {
        spans.push(Span::styled(" READY ", Style::default().fg(theme::bg_base()).bg(theme::text_muted()).bold()));
    }
    spans.push(Span::styled(" ", base_style));

    let gs = GitState::get(state);
    if !gs.branch.name.is_empty() {
        spans.push(Span::styled(
            format!(" {} ", gs.branch.name),
            Style::default().fg(theme::bg_base()).bg(theme::accent_dim()).bold(),
        ));
        spans.push(Span::styled(" ", base_style));

        // Change counts card
        let card = Style::default().bg(theme::bg_elevated());
        spans.push(Span::styled(" U", card.fg(theme::success())));
        spans.push(Span::styled(gs.branch.untracked_files.len().to_string(), card.fg(theme::success()).bold()));
        spans.push(Span::styled("/", card.fg(theme::text_muted())));
        spans.push(Span::styled("M", card.fg(theme::warning())));
        spans.push(Span::styled(format!("{} ", gs.branch.modified_files.len()), card.fg(theme::warning()).bold()));
        spans.push(Span::styled(" ", base_style));
    }

    let left_width: usize = spans.iter().map(|s| s.width()).sum();
    let available = (area.width as usize).saturating_sub(left_width);

    // A visible error report takes the rest of the bar
    let right = match state.reporter.visible() {
        Some(report) => {
            let label = " ERROR ";
            let room = available.saturating_sub(label.len() + DISMISS_HINT.len() + 1);
            spans.push(Span::styled(label, Style::default().fg(theme::bg_base()).bg(theme::error()).bold()));
            spans.push(Span::styled(
                format!(" {}", truncate_to_width(&report.summary(), room)),
                base_style.fg(theme::error()),
            ));
            Span::styled(DISMISS_HINT, base_style)
        }
        None => Span::styled(KEY_HINTS, base_style),
    };

    let used: usize = spans.iter().map(|s| s.width()).sum();
    let padding = (area.width as usize).saturating_sub(used + right.width());
    spans.push(Span::styled(" ".repeat(padding), base_style));
    spans.push(right);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::backend::TestBackend;
    use vc_base::types::ErrorPayload;
    use vc_base::modules::Module;
    use vc_mod_git::GitModule;

    fn bar(state: &State) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 1)).unwrap();
        terminal.draw(|frame| render_status_bar(frame, state, frame.area())).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    fn state() -> State {
        let mut state = State::default();
        GitModule.init_state(&mut state);
        state
    }

    #[test]
    fn idle_bar_shows_ready_and_hints() {
        let text = bar(&state());
        assert!(text.contains("READY"));
        assert!(text.contains("q quit"));
    }

    #[test]
    fn visible_error_replaces_hints_until_dismissed() {
        let mut state = state();
        state.reporter.show_error(ErrorPayload::from_message("boom"), serde_json::Value::Null);
        let text = bar(&state);
        assert!(text.contains("ERROR"));
        assert!(text.contains("boom"));
        assert!(text.contains("Esc to dismiss"));

        state.reporter.dismiss();
        assert!(!bar(&state).contains("boom"));
    }

    #[test]
    fn loading_badge_while_requests_in_flight() {
        let mut state = state();
        state.in_flight = 2;
        assert!(bar(&state).contains("LOADING 2"));
    }
}
