use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event};
use ratatui::prelude::*;

use vc_base::actions::{Action, ActionResult};
use vc_base::config::constants::{EVENT_POLL_MS, IDLE_POLL_MS};
use vc_base::state::State;
use vc_mod_git::fetch::{refetch_branch, refetch_branches, refetch_file, refresh_derived, sync_file_fetch};
use vc_mod_git::{FetchResult, Fetcher, GitState, VersionControlApi, fetch::apply_fetch_result};

use crate::app::actions::{apply_action, fix_focus};
use crate::app::events::handle_event;
use crate::ui;

/// Spinner frame period while requests are in flight
const SPINNER_MS: u64 = 100;

pub struct App {
    pub state: State,
    fetcher: Fetcher,
    rx: Receiver<FetchResult>,
    last_spinner: Instant,
}

impl App {
    pub fn new(mut state: State, api: Arc<dyn VersionControlApi>) -> Self {
        let (tx, rx) = mpsc::channel();
        let fetcher = Fetcher::new(api, tx);
        GitState::get_mut(&mut state).source = fetcher.describe();
        Self { state, fetcher, rx, last_spinner: Instant::now() }
    }

    /// Initial requests: both branch hooks, plus the file if one is selected.
    pub fn start(&mut self) {
        refetch_branches(&mut self.state, &self.fetcher);
        refetch_branch(&mut self.state, &self.fetcher);
        sync_file_fetch(&mut self.state, &self.fetcher);
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
        self.start();

        loop {
            // === INPUT FIRST ===
            if event::poll(Duration::ZERO)? {
                let evt = event::read()?;
                if matches!(evt, Event::Resize(_, _)) {
                    self.state.dirty = true;
                }
                let Some(action) = handle_event(&evt, &self.state) else {
                    tracing::info!("quit requested");
                    break;
                };
                self.handle_action(action);

                // Render immediately after input for instant feedback
                if self.state.dirty {
                    terminal.draw(|frame| ui::render(frame, &self.state))?;
                    self.state.dirty = false;
                }
            }

            // === BACKGROUND RESULTS ===
            self.process_fetch_results();
            self.update_spinner();

            if self.state.dirty {
                terminal.draw(|frame| ui::render(frame, &self.state))?;
                self.state.dirty = false;
            }

            // Adaptive poll: short while requests are in flight, longer when idle
            let poll_ms = if self.state.in_flight > 0 || self.state.dirty { EVENT_POLL_MS } else { IDLE_POLL_MS };
            let _ = event::poll(Duration::from_millis(poll_ms))?;
        }

        Ok(())
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::FetchBranch => {
                refetch_branch(&mut self.state, &self.fetcher);
                refetch_file(&mut self.state, &self.fetcher);
            }
            Action::FetchAll => {
                refetch_branches(&mut self.state, &self.fetcher);
                refetch_branch(&mut self.state, &self.fetcher);
            }
            other => {
                if apply_action(&mut self.state, other) == ActionResult::Redraw {
                    self.state.dirty = true;
                }
            }
        }

        // Keyed effect: the file fetch follows the selection
        sync_file_fetch(&mut self.state, &self.fetcher);
        refresh_derived(&mut self.state);
        fix_focus(&mut self.state);
    }

    pub fn process_fetch_results(&mut self) {
        while let Ok(result) = self.rx.try_recv() {
            apply_fetch_result(&mut self.state, result);
        }
        fix_focus(&mut self.state);
    }

    fn update_spinner(&mut self) {
        if self.state.in_flight == 0 {
            return;
        }
        if self.last_spinner.elapsed() >= Duration::from_millis(SPINNER_MS) {
            self.state.spinner_frame = self.state.spinner_frame.wrapping_add(1);
            self.last_spinner = Instant::now();
            self.state.dirty = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ratatui::backend::TestBackend;
    use vc_base::errors::ApiError;
    use vc_base::modules::Module;
    use vc_base::types::{Branch, FileNode, FileResponse, GitFile};
    use vc_mod_git::GitModule;

    struct FixtureApi;

    impl VersionControlApi for FixtureApi {
        fn list_branches(&self) -> Result<Vec<Branch>, ApiError> {
            Ok(vec![Branch { name: "main".into(), ..Branch::default() }])
        }
        fn get_branch(&self, _id: &str) -> Result<Branch, ApiError> {
            Ok(Branch {
                name: "main".into(),
                files: vec![FileNode::leaf("a.py"), FileNode::leaf("b.py")],
                modified_files: vec!["a.py".into()],
                untracked_files: vec!["b.py".into()],
            })
        }
        fn get_file(&self, _path: &str, _base: &str) -> Result<FileResponse, ApiError> {
            Ok(FileResponse::new(
                Some(GitFile { content: Some("x = 2\n".into()), content_from_base: Some("x = 1\n".into()) }),
                None,
            ))
        }
        fn describe(&self) -> String {
            "fixture".into()
        }
    }

    fn app() -> App {
        let mut state = State::default();
        GitModule.init_state(&mut state);
        App::new(state, Arc::new(FixtureApi))
    }

    /// Apply results until nothing is in flight.
    fn settle(app: &mut App) {
        while app.state.in_flight > 0 {
            let result = app.rx.recv_timeout(Duration::from_secs(5)).unwrap();
            apply_fetch_result(&mut app.state, result);
        }
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|frame| ui::render(frame, &app.state)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn start_loads_branches_and_renders_badges() {
        let mut app = app();
        app.start();
        settle(&mut app);

        let gs = GitState::get(&app.state);
        assert_eq!(gs.branch.name, "main");
        let text = screen(&app);
        assert!(text.contains("Version control"));
        assert!(text.contains("a.py M"));
        assert!(text.contains("b.py U"));
    }

    #[test]
    fn selecting_a_file_shows_the_diff_panel() {
        let mut app = app();
        app.start();
        settle(&mut app);

        app.handle_action(Action::ClickFile("a.py".into()));
        settle(&mut app);
        refresh_derived(&mut app.state);
        assert!(vc_mod_git::diff_panel_visible(&app.state));
        let text = screen(&app);
        assert!(text.contains("Diff · a.py"));
        assert!(text.contains("x = 1"));
        assert!(text.contains("x = 2"));

        app.handle_action(Action::ClickFile("a.py".into()));
        assert!(!vc_mod_git::diff_panel_visible(&app.state));
        assert!(!screen(&app).contains("Diff · a.py"));
    }

    #[test]
    fn branches_tab_renders_branch_table() {
        let mut app = app();
        app.start();
        settle(&mut app);
        app.handle_action(Action::SelectTab(vc_base::state::TAB_BRANCHES));
        let text = screen(&app);
        assert!(text.contains("Branches"));
        assert!(text.contains("R refresh branches"));
    }
}
