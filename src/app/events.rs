use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};

use vc_base::actions::Action;
use vc_base::config::constants::{SCROLL_LINE_AMOUNT, SCROLL_PAGE_AMOUNT};
use vc_base::state::{State, TAB_BRANCHES, TAB_FILES};

use crate::ui::focused_panel;

/// Map a terminal event to an action. `None` means quit.
pub fn handle_event(event: &Event, state: &State) -> Option<Action> {
    match event {
        Event::Key(key) => {
            if key.kind != KeyEventKind::Press {
                return Some(Action::None);
            }
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

            // Global shortcuts (always handled first)
            match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') if ctrl => return None,
                KeyCode::Char('q') => return None,
                KeyCode::Char('1') => return Some(Action::SelectTab(TAB_FILES)),
                KeyCode::Char('2') => return Some(Action::SelectTab(TAB_BRANCHES)),
                KeyCode::Tab | KeyCode::BackTab => return Some(Action::CycleFocus),
                KeyCode::Char('[') => return Some(Action::HistoryBack),
                KeyCode::Char(']') => return Some(Action::HistoryForward),
                KeyCode::Esc => return Some(Action::DismissError),
                KeyCode::Char('d') => return Some(Action::ToggleDiffPanel),
                KeyCode::Char('t') => return Some(Action::CycleTheme),
                KeyCode::Char('J') => return Some(Action::ScrollDiffDown(SCROLL_LINE_AMOUNT)),
                KeyCode::Char('K') => return Some(Action::ScrollDiffUp(SCROLL_LINE_AMOUNT)),
                _ => {}
            }

            // Let the focused panel handle the key
            if let Some(action) = focused_panel(state).handle_key(key, state) {
                return Some(action);
            }

            // Fallback
            let action = match key.code {
                KeyCode::PageUp => Action::ScrollDiffUp(SCROLL_PAGE_AMOUNT),
                KeyCode::PageDown => Action::ScrollDiffDown(SCROLL_PAGE_AMOUNT),
                KeyCode::Char('R') => Action::FetchAll,
                KeyCode::Char('r') => Action::FetchBranch,
                _ => Action::None,
            };
            Some(action)
        }
        _ => Some(Action::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use vc_base::modules::Module;
    use vc_base::state::Focus;
    use vc_mod_git::GitModule;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn state() -> State {
        let mut state = State::default();
        GitModule.init_state(&mut state);
        state
    }

    #[test]
    fn quit_keys() {
        let state = state();
        assert!(handle_event(&key(KeyCode::Char('q')), &state).is_none());
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(handle_event(&ctrl_c, &state).is_none());
    }

    #[test]
    fn number_keys_select_tabs() {
        let state = state();
        assert_eq!(handle_event(&key(KeyCode::Char('2')), &state), Some(Action::SelectTab(TAB_BRANCHES)));
        assert_eq!(handle_event(&key(KeyCode::Char('1')), &state), Some(Action::SelectTab(TAB_FILES)));
    }

    #[test]
    fn body_panel_gets_keys_when_focused() {
        let mut state = state();
        state.focus = Focus::Body;
        state.select_tab(TAB_BRANCHES);
        assert_eq!(handle_event(&key(KeyCode::Char('r')), &state), Some(Action::FetchAll));
        assert_eq!(handle_event(&key(KeyCode::Down), &state), Some(Action::ScrollBodyDown(SCROLL_LINE_AMOUNT)));
    }

    #[test]
    fn page_keys_fall_back_to_diff_scroll() {
        let state = state();
        assert_eq!(handle_event(&key(KeyCode::PageDown), &state), Some(Action::ScrollDiffDown(SCROLL_PAGE_AMOUNT)));
    }
}
