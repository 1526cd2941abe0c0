pub mod annotation;
pub mod api;
mod branches_panel;
mod changes_panel;
pub mod diff;
mod diff_panel;
pub mod fetch;
pub mod local;
pub mod tree;
mod tree_panel;
pub mod types;

pub use annotation::{AnnotationIndex, Badge, FileStatus};
pub use api::{HttpApi, VersionControlApi};
pub use branches_panel::BranchesPanel;
pub use changes_panel::ChangesPanel;
pub use diff_panel::{DiffPanel, diff_panel_visible};
pub use fetch::{FetchResult, Fetcher};
pub use local::LocalGitApi;
pub use tree_panel::FileTreePanel;
pub use types::GitState;

use vc_base::modules::Module;
use vc_base::state::State;

/// Branches, file tree annotations and file diffs of a repository.
pub struct GitModule;

impl Module for GitModule {
    fn id(&self) -> &'static str {
        "git"
    }

    fn name(&self) -> &'static str {
        "Git"
    }

    fn init_state(&self, state: &mut State) {
        state.set_ext(GitState::new());
    }
}
