mod app;
mod cli;
mod infra;
mod ui;

use std::io;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    ExecutableCommand,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use secrecy::SecretString;

use vc_base::config::set_active_theme;
use vc_base::modules::Module;
use vc_base::route::Location;
use vc_base::settings::{Settings, Store, ViewSnapshot};
use vc_base::state::State;
use vc_mod_git::{GitModule, HttpApi, LocalGitApi, VersionControlApi};

use app::App;
use cli::Cli;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let store = Store::default();
    let log = infra::logging::init(&store.log_dir(), cli.log_file.clone())?;
    tracing::info!(log_file = %log.log_file.display(), "vcview starting");

    let file_settings = store.load_settings().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "settings unreadable, using defaults");
        Settings::default()
    });
    let settings = cli.apply(file_settings.clone());

    let api: Arc<dyn VersionControlApi> = match &cli.local {
        Some(dir) => Arc::new(LocalGitApi::new(dir)),
        None => {
            let api_key = settings
                .api_key
                .clone()
                .or_else(|| std::env::var("VCVIEW_API_KEY").ok())
                .map(SecretString::from);
            let api = HttpApi::new(&settings.api_url, api_key, settings.request_timeout_secs)
                .with_context(|| format!("configuring data service at {}", settings.api_url))?;
            Arc::new(api)
        }
    };

    let route = match &cli.route {
        Some(route) => route.clone(),
        None => store.load_snapshot().map(|s| s.route).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "view snapshot unreadable");
            String::new()
        }),
    };

    let mut state = State::new(Location::parse(&route));
    state.show_diff_panel = settings.show_diff_panel;
    state.selection.branch_base = settings.base_branch.clone();
    state.active_theme = settings.theme.clone();
    set_active_theme(&state.active_theme);
    let modules: [&dyn Module; 1] = [&GitModule];
    for module in modules {
        module.init_state(&mut state);
        tracing::debug!(id = module.id(), name = module.name(), "module initialized");
    }

    // Panic hook: restore terminal state before the default hook prints.
    // Without this, a panic leaves the terminal in raw mode + alternate screen.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = io::stdout().execute(LeaveAlternateScreen);
        tracing::error!(%info, "panic");
        default_hook(info);
    }));

    enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut app = App::new(state, api);
    let result = app.run(&mut terminal);

    // Cleanup
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    result?;

    let snapshot = ViewSnapshot { route: app.state.router.current().to_string() };
    if let Err(e) = store.save_snapshot(&snapshot) {
        tracing::warn!(error = %e, "failed to save view snapshot");
    }
    if app.state.active_theme != file_settings.theme {
        let updated = Settings { theme: app.state.active_theme.clone(), ..file_settings };
        if let Err(e) = store.save_settings(&updated) {
            tracing::warn!(error = %e, "failed to save theme");
        }
    }

    tracing::info!("vcview exiting");
    Ok(())
}
