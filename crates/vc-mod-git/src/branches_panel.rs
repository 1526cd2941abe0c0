use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;

use vc_base::actions::Action;
use vc_base::config::constants::{SCROLL_LINE_AMOUNT, SCROLL_PAGE_AMOUNT};
use vc_base::config::{badges, theme};
use vc_base::panels::Panel;
use vc_base::state::State;
use vc_base::types::{Branch, FileNode};
use vc_base::ui::{Cell, render_table, spinner};

use crate::annotation::Badge;
use crate::fetch::FetchKind;
use crate::types::GitState;

/// Branch sub-view of the `branches` tab.
pub struct BranchesPanel;

fn count_leaves(nodes: &[FileNode]) -> usize {
    nodes.iter().map(|n| if n.is_dir() { count_leaves(n.children()) } else { 1 }).sum()
}

fn branch_row(branch: &Branch, current: Option<&Branch>) -> Vec<Cell> {
    let is_current = current.is_some_and(|c| c.name == branch.name);
    // The list endpoint only carries names; counts come from the detailed snapshot
    let detail = if is_current { current.unwrap_or(branch) } else { branch };

    let marker = if is_current { badges::current_branch() } else { "" };
    let name_style =
        if is_current { Style::default().fg(theme::accent()).bold() } else { Style::default().fg(theme::text()) };

    vec![
        Cell::new(marker, Style::default().fg(theme::accent())),
        Cell::new(&branch.name, name_style),
        Cell::right(count_leaves(&detail.files).to_string(), Style::default().fg(theme::text_secondary())),
        Cell::right(detail.modified_files.len().to_string(), Style::default().fg(theme::warning())),
        Cell::right(detail.untracked_files.len().to_string(), Style::default().fg(theme::success())),
    ]
}

impl Panel for BranchesPanel {
    fn title(&self, state: &State) -> String {
        let gs = GitState::get(state);
        let loading = gs.generations.is_pending(FetchKind::Branches) || gs.generations.is_pending(FetchKind::Branch);
        if loading { format!("Branches {}", spinner(state.spinner_frame)) } else { "Branches".to_string() }
    }

    fn content(&self, state: &State, base_style: Style) -> Vec<Line<'static>> {
        let gs = GitState::get(state);
        let muted = base_style.fg(theme::text_muted());
        let mut lines = Vec::new();

        let current = (!gs.branch.name.is_empty()).then_some(&gs.branch);
        if let Some(branch) = current {
            lines.push(Line::from(vec![
                Span::styled(" Current ", muted),
                Span::styled(branch.name.clone(), base_style.fg(theme::accent()).bold()),
                Span::styled(format!("  {} ", Badge::MODIFIED.text), base_style.fg(theme::warning())),
                Span::styled(branch.modified_files.len().to_string(), base_style),
                Span::styled(format!("  {} ", Badge::UNTRACKED.text), base_style.fg(theme::success())),
                Span::styled(branch.untracked_files.len().to_string(), base_style),
            ]));
            lines.push(Line::from(""));
        }

        match &gs.branches {
            None => {
                let msg = if gs.generations.is_pending(FetchKind::Branches) { "Loading..." } else { "No data" };
                lines.push(Line::from(Span::styled(format!(" {}", msg), muted)));
            }
            Some(branches) if branches.is_empty() => {
                lines.push(Line::from(Span::styled(" No branches", muted)));
            }
            Some(branches) => {
                let header = [
                    Cell::new("", Style::default()),
                    Cell::new("Branch", Style::default()),
                    Cell::right("Files", Style::default()),
                    Cell::right(Badge::MODIFIED.text, Style::default()),
                    Cell::right(Badge::UNTRACKED.text, Style::default()),
                ];
                let rows: Vec<Vec<Cell>> = branches.iter().map(|b| branch_row(b, current)).collect();
                lines.extend(render_table(&header, &rows, 1));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(" R refresh branches", muted)));
        lines
    }

    fn handle_key(&self, key: &KeyEvent, _state: &State) -> Option<Action> {
        match key.code {
            KeyCode::Char('R') | KeyCode::Char('r') => Some(Action::FetchAll),
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

#[cfg(test)]
mod tests {
    use super::*;
    use vc_base::modules::Module;

    use crate::GitModule;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn leaves_are_counted_through_folders() {
        let files = vec![FileNode::dir("d", vec![FileNode::leaf("a"), FileNode::leaf("b")]), FileNode::leaf("c")];
        assert_eq!(count_leaves(&files), 3);
    }

    #[test]
    fn current_branch_is_marked_with_counts() {
        let mut state = State::default();
        GitModule.init_state(&mut state);
        let gs = GitState::get_mut(&mut state);
        gs.branch = Branch {
            name: "main".into(),
            files: vec![FileNode::leaf("a.py")],
            modified_files: vec!["a.py".into()],
            untracked_files: vec![],
        };
        gs.branches = Some(vec![
            Branch { name: "main".into(), ..Branch::default() },
            Branch { name: "dev".into(), ..Branch::default() },
        ]);

        let texts: Vec<String> = BranchesPanel.content(&state, Style::default()).iter().map(text).collect();
        let main_row = texts.iter().find(|t| t.contains("main") && t.contains('│')).unwrap();
        assert!(main_row.trim_start().starts_with('*'), "{}", main_row);
        assert!(main_row.trim_end().ends_with("1 │ 1 │ 0"), "{}", main_row);
        let dev_row = texts.iter().find(|t| t.contains("dev")).unwrap();
        assert!(!dev_row.contains('*'));
    }

    #[test]
    fn refresh_key_fetches_both() {
        let state = State::default();
        let key = KeyEvent::new(KeyCode::Char('R'), crossterm::event::KeyModifiers::SHIFT);
        assert_eq!(BranchesPanel.handle_key(&key, &state), Some(Action::FetchAll));
    }
}
