use vc_base::memo::Memo;
use vc_base::state::State;
use vc_base::types::{Branch, FileResponse};

use crate::annotation::AnnotationIndex;
use crate::diff::SplitDiff;
use crate::fetch::Generations;
use crate::tree::TreeView;

/// `(selected_file_path, branch_base)`: identity of the active diff fetch.
pub type FileKey = (String, String);

// === Module-owned state ===

pub struct GitState {
    /// Branch list, `None` until the first response
    pub branches: Option<Vec<Branch>>,
    /// Snapshot of the `current` branch
    pub branch: Branch,
    /// Content hash of `branch`; identical refetches keep the generation
    pub branch_hash: Option<String>,
    /// Bumped whenever `branch` changes content
    pub branch_generation: u64,
    pub file_response: Option<FileResponse>,
    /// Bumped on every accepted file response
    pub file_response_generation: u64,
    /// Key of the file fetch the view currently wants
    pub file_key: Option<FileKey>,
    pub generations: Generations,
    pub annotations: Memo<u64, AnnotationIndex>,
    pub split_diff: Memo<(String, u64), SplitDiff>,
    pub tree: TreeView,
    pub diff_scroll: u16,
    pub body_scroll: u16,
    /// Label of the data source, shown in the status bar
    pub source: String,
}

impl Default for GitState {
    fn default() -> Self {
        Self::new()
    }
}

impl GitState {
    pub fn new() -> Self {
        Self {
            branches: None,
            branch: Branch::default(),
            branch_hash: None,
            branch_generation: 0,
            file_response: None,
            file_response_generation: 0,
            file_key: None,
            generations: Generations::default(),
            annotations: Memo::new(),
            split_diff: Memo::new(),
            tree: TreeView::default(),
            diff_scroll: 0,
            body_scroll: 0,
            source: String::new(),
        }
    }
    pub fn get(state: &State) -> &Self {
        state.get_ext::<Self>().expect("GitState not initialized")
    }
    pub fn get_mut(state: &mut State) -> &mut Self {
        state.get_ext_mut::<Self>().expect("GitState not initialized")
    }

    /// Split diff for the current selection, once its data has arrived.
    pub fn current_diff(&self, selected: Option<&str>) -> Option<&SplitDiff> {
        let path = selected?;
        self.split_diff.get_for(&(path.to_string(), self.file_response_generation))
    }
}
