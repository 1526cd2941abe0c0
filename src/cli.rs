use std::path::PathBuf;

use clap::Parser;

use vc_base::settings::Settings;

#[derive(Parser, Debug)]
#[command(name = "vcview", version, about = "Branches, changed files and side-by-side diffs of a repository")]
pub struct Cli {
    /// Root of the branch/file data service (e.g. http://localhost:6789)
    #[arg(long, env = "VCVIEW_URL", conflicts_with = "local")]
    pub url: Option<String>,

    /// Read a local git working directory instead of the data service
    #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = ".")]
    pub local: Option<PathBuf>,

    /// Initial location, e.g. "?tab=branches"
    #[arg(long)]
    pub route: Option<String>,

    /// Branch the selected file is diffed against
    #[arg(long, value_name = "BRANCH")]
    pub base_branch: Option<String>,

    /// Never show the diff panel
    #[arg(long)]
    pub hide_diff: bool,

    /// Log file (default: .vcview/logs/vcview-<pid>.log)
    #[arg(long, env = "VCVIEW_LOG_FILE", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Settings for this run: the file's values with command line overrides on top.
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(url) = &self.url {
            settings.api_url = url.clone();
        }
        if let Some(base) = &self.base_branch {
            settings.base_branch = base.clone();
        }
        if self.hide_diff {
            settings.show_diff_panel = false;
        }
        settings
    }
}
