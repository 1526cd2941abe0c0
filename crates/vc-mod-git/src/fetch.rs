//! Background fetching of branch and file data.
//!
//! Requests run on short-lived worker threads and report back over an mpsc
//! channel. Each request carries a `FetchTag`; only the latest generation of a
//! kind is applied, so a late answer for an abandoned request never overwrites
//! newer data.

use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use vc_base::config::constants::CURRENT_BRANCH_ID;
use vc_base::errors::ApiError;
use vc_base::memo::hash_content;
use vc_base::state::State;
use vc_base::types::{Branch, FileResponse};

use crate::annotation::AnnotationIndex;
use crate::api::VersionControlApi;
use crate::diff::compute_split_diff;
use crate::types::{FileKey, GitState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Branches,
    Branch,
    FileDiff,
}

impl FetchKind {
    fn index(self) -> usize {
        match self {
            FetchKind::Branches => 0,
            FetchKind::Branch => 1,
            FetchKind::FileDiff => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FetchKind::Branches => "list branches",
            FetchKind::Branch => "load current branch",
            FetchKind::FileDiff => "load file diff",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag {
    pub kind: FetchKind,
    pub generation: u64,
}

/// Latest issued generation and pending flag per fetch kind.
#[derive(Debug, Clone, Default)]
pub struct Generations {
    latest: [u64; 3],
    pending: [bool; 3],
}

impl Generations {
    /// Tag for a new request of `kind`. Older requests of that kind become stale.
    pub fn next(&mut self, kind: FetchKind) -> FetchTag {
        let i = kind.index();
        self.latest[i] += 1;
        self.pending[i] = true;
        FetchTag { kind, generation: self.latest[i] }
    }

    /// Make every outstanding request of `kind` stale without issuing a new one.
    pub fn invalidate(&mut self, kind: FetchKind) {
        let i = kind.index();
        self.latest[i] += 1;
        self.pending[i] = false;
    }

    pub fn is_current(&self, tag: FetchTag) -> bool {
        self.latest[tag.kind.index()] == tag.generation
    }

    pub fn settle(&mut self, kind: FetchKind) {
        self.pending[kind.index()] = false;
    }

    pub fn is_pending(&self, kind: FetchKind) -> bool {
        self.pending[kind.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    Branches,
    Branch(String),
    File { path: String, base_branch: String },
}

#[derive(Debug)]
pub enum FetchPayload {
    Branches(Vec<Branch>),
    Branch(Branch),
    File(FileResponse),
}

#[derive(Debug)]
pub struct FetchResult {
    pub tag: FetchTag,
    /// Set for file fetches
    pub key: Option<FileKey>,
    pub payload: Result<FetchPayload, ApiError>,
}

/// Run one request against the API on the calling thread.
pub fn run_request(api: &dyn VersionControlApi, request: &FetchRequest) -> Result<FetchPayload, ApiError> {
    match request {
        FetchRequest::Branches => api.list_branches().map(FetchPayload::Branches),
        FetchRequest::Branch(id) => api.get_branch(id).map(FetchPayload::Branch),
        FetchRequest::File { path, base_branch } => api.get_file(path, base_branch).map(FetchPayload::File),
    }
}

/// Dispatches requests to worker threads.
#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn VersionControlApi>,
    tx: Sender<FetchResult>,
}

impl Fetcher {
    pub fn new(api: Arc<dyn VersionControlApi>, tx: Sender<FetchResult>) -> Self {
        Self { api, tx }
    }

    pub fn describe(&self) -> String {
        self.api.describe()
    }

    pub fn dispatch(&self, tag: FetchTag, request: FetchRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tracing::debug!(?request, generation = tag.generation, "fetch dispatched");
        thread::spawn(move || {
            let key = match &request {
                FetchRequest::File { path, base_branch } => Some((path.clone(), base_branch.clone())),
                _ => None,
            };
            let payload = run_request(api.as_ref(), &request);
            // Receiver gone means the app is shutting down
            let _ = tx.send(FetchResult { tag, key, payload });
        });
    }
}

fn begin(state: &mut State, kind: FetchKind) -> FetchTag {
    state.in_flight += 1;
    state.dirty = true;
    GitState::get_mut(state).generations.next(kind)
}

/// Refetch the `current` branch snapshot.
pub fn refetch_branch(state: &mut State, fetcher: &Fetcher) {
    let tag = begin(state, FetchKind::Branch);
    fetcher.dispatch(tag, FetchRequest::Branch(CURRENT_BRANCH_ID.to_string()));
}

/// Refetch the branch list.
pub fn refetch_branches(state: &mut State, fetcher: &Fetcher) {
    let tag = begin(state, FetchKind::Branches);
    fetcher.dispatch(tag, FetchRequest::Branches);
}

/// Keep the file fetch in step with `(selected_file_path, branch_base)`.
///
/// A new key starts a request and drops the previous file data. Clearing the
/// selection stops fetching and makes outstanding answers stale.
pub fn sync_file_fetch(state: &mut State, fetcher: &Fetcher) {
    let wanted: Option<FileKey> =
        state.selection.selected_file_path.clone().map(|path| (path, state.selection.branch_base.clone()));
    if GitState::get(state).file_key == wanted {
        return;
    }

    match wanted.clone() {
        None => {
            let gs = GitState::get_mut(state);
            gs.generations.invalidate(FetchKind::FileDiff);
            gs.file_key = None;
            gs.file_response = None;
            gs.split_diff.clear();
            state.dirty = true;
        }
        Some((path, base_branch)) => {
            let tag = begin(state, FetchKind::FileDiff);
            let gs = GitState::get_mut(state);
            gs.file_key = wanted;
            gs.file_response = None;
            gs.diff_scroll = 0;
            fetcher.dispatch(tag, FetchRequest::File { path, base_branch });
        }
    }
}

/// Force a new file fetch for the current key (user refresh).
pub fn refetch_file(state: &mut State, fetcher: &Fetcher) {
    GitState::get_mut(state).file_key = None;
    if state.selection.selected_file_path.is_some() {
        sync_file_fetch(state, fetcher);
    }
}

/// Apply a worker's answer. Returns `false` when it was stale and ignored.
pub fn apply_fetch_result(state: &mut State, result: FetchResult) -> bool {
    state.in_flight = state.in_flight.saturating_sub(1);

    let gs = GitState::get_mut(state);
    if !gs.generations.is_current(result.tag) {
        tracing::debug!(kind = ?result.tag.kind, generation = result.tag.generation, "stale fetch dropped");
        return false;
    }
    if result.tag.kind == FetchKind::FileDiff && result.key != gs.file_key {
        tracing::debug!(key = ?result.key, "fetch for abandoned selection dropped");
        return false;
    }
    gs.generations.settle(result.tag.kind);

    match result.payload {
        Err(err) => {
            tracing::warn!(kind = ?result.tag.kind, error = %err, "fetch failed");
            state.reporter.report_failure(result.tag.kind.label(), &err);
        }
        Ok(FetchPayload::Branches(branches)) => {
            gs.branches = Some(branches);
        }
        Ok(FetchPayload::Branch(branch)) => {
            let hash = serde_json::to_string(&branch).map(|s| hash_content(&s)).ok();
            if hash.is_none() || hash != gs.branch_hash {
                gs.tree.seed(&branch.files);
                gs.branch = branch;
                gs.branch_hash = hash;
                gs.branch_generation += 1;
            }
        }
        Ok(FetchPayload::File(response)) => {
            let embedded = response.error.clone().map(|e| (e, response.raw.clone()));
            gs.file_response = Some(response);
            gs.file_response_generation += 1;
            if let Some((errors, raw)) = embedded {
                state.reporter.show_error(errors, raw);
            }
        }
    }

    refresh_derived(state);
    state.dirty = true;
    true
}

/// Recompute memoized values whose inputs changed.
pub fn refresh_derived(state: &mut State) {
    let selected = state.selection.selected_file_path.clone();
    let gs = GitState::get_mut(state);

    gs.annotations.get_or_compute(gs.branch_generation, || AnnotationIndex::from_branch(&gs.branch));

    if let (Some(path), Some(response)) = (selected, gs.file_response.as_ref()) {
        gs.split_diff.get_or_compute((path, gs.file_response_generation), || {
            let file = response.git_file.clone().unwrap_or_default();
            compute_split_diff(
                file.content_from_base.as_deref().unwrap_or(""),
                file.content.as_deref().unwrap_or(""),
            )
        });
    }

    let rows = gs.tree.rows(&gs.branch.files).len();
    gs.tree.clamp(rows);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::mpsc;
    use std::time::Duration;

    use serde_json::json;
    use vc_base::modules::Module;
    use vc_base::types::{FileNode, GitFile};

    use crate::GitModule;

    struct StubApi {
        file: FileResponse,
        calls: Mutex<Vec<FetchRequest>>,
    }

    impl StubApi {
        fn new(file: FileResponse) -> Self {
            Self { file, calls: Mutex::new(Vec::new()) }
        }
    }

    impl VersionControlApi for StubApi {
        fn list_branches(&self) -> Result<Vec<Branch>, ApiError> {
            self.calls.lock().unwrap().push(FetchRequest::Branches);
            Ok(vec![Branch { name: "main".into(), ..Branch::default() }])
        }
        fn get_branch(&self, id: &str) -> Result<Branch, ApiError> {
            self.calls.lock().unwrap().push(FetchRequest::Branch(id.to_string()));
            Ok(sample_branch())
        }
        fn get_file(&self, path: &str, base_branch: &str) -> Result<FileResponse, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push(FetchRequest::File { path: path.to_string(), base_branch: base_branch.to_string() });
            Ok(self.file.clone())
        }
        fn describe(&self) -> String {
            "stub".into()
        }
    }

    fn sample_branch() -> Branch {
        Branch {
            name: "main".into(),
            files: vec![FileNode::leaf("/a.py"), FileNode::leaf("/b.py")],
            modified_files: vec!["/a.py".into()],
            untracked_files: vec!["/b.py".into()],
        }
    }

    fn setup(file: FileResponse) -> (State, Fetcher, mpsc::Receiver<FetchResult>, Arc<StubApi>) {
        let mut state = State::default();
        GitModule.init_state(&mut state);
        let api = Arc::new(StubApi::new(file));
        let (tx, rx) = mpsc::channel();
        (state, Fetcher::new(api.clone(), tx), rx, api)
    }

    fn recv(rx: &mpsc::Receiver<FetchResult>) -> FetchResult {
        rx.recv_timeout(Duration::from_secs(5)).unwrap()
    }

    fn file_result(tag: FetchTag, key: FileKey, response: FileResponse) -> FetchResult {
        FetchResult { tag, key: Some(key), payload: Ok(FetchPayload::File(response)) }
    }

    #[test]
    fn no_file_request_without_selection() {
        let (mut state, fetcher, rx, api) = setup(FileResponse::default());
        sync_file_fetch(&mut state, &fetcher);
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        assert!(api.calls.lock().unwrap().is_empty());
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn selection_fetches_with_base_branch() {
        let file = FileResponse::new(
            Some(GitFile { content: Some("b\n".into()), content_from_base: Some("a\n".into()) }),
            None,
        );
        let (mut state, fetcher, rx, api) = setup(file);
        state.selection.click_file("/a.py");
        sync_file_fetch(&mut state, &fetcher);
        // Same key again does not refetch
        sync_file_fetch(&mut state, &fetcher);

        assert!(apply_fetch_result(&mut state, recv(&rx)));
        assert_eq!(
            *api.calls.lock().unwrap(),
            vec![FetchRequest::File { path: "/a.py".into(), base_branch: "td--version_control".into() }]
        );
        let gs = GitState::get(&state);
        let diff = gs.current_diff(Some("/a.py")).unwrap();
        assert_eq!((diff.additions, diff.deletions), (1, 1));
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn embedded_error_is_reported_once_and_panes_are_blank() {
        let raw = json!({"error": {"message": "not found"}});
        let response = FileResponse::from_value(raw.clone()).unwrap();
        let (mut state, fetcher, rx, _api) = setup(response);
        state.selection.click_file("/a.py");
        sync_file_fetch(&mut state, &fetcher);
        apply_fetch_result(&mut state, recv(&rx));

        assert_eq!(state.reporter.reports().len(), 1);
        let report = &state.reporter.reports()[0];
        assert_eq!(report.uuid, "VersionControlPage");
        assert_eq!(report.errors.0, json!({"message": "not found"}));
        assert_eq!(report.response, raw);

        let diff = GitState::get(&state).current_diff(Some("/a.py")).unwrap();
        assert!(diff.rows.is_empty());

        refresh_derived(&mut state);
        assert_eq!(state.reporter.reports().len(), 1);
    }

    #[test]
    fn stale_diff_response_is_discarded() {
        let (mut state, _fetcher, _rx, _api) = setup(FileResponse::default());
        let key_a: FileKey = ("/a.py".into(), "base".into());
        let key_b: FileKey = ("/b.py".into(), "base".into());

        let gs = GitState::get_mut(&mut state);
        let old = gs.generations.next(FetchKind::FileDiff);
        let new = gs.generations.next(FetchKind::FileDiff);
        gs.file_key = Some(key_b.clone());
        state.selection.click_file("/b.py");
        state.in_flight = 2;

        let old_body = FileResponse::new(Some(GitFile { content: Some("old".into()), ..GitFile::default() }), None);
        assert!(!apply_fetch_result(&mut state, file_result(old, key_a, old_body)));
        assert!(GitState::get(&state).file_response.is_none());

        let new_body = FileResponse::new(Some(GitFile { content: Some("new".into()), ..GitFile::default() }), None);
        assert!(apply_fetch_result(&mut state, file_result(new, key_b, new_body)));
        let content = GitState::get(&state).file_response.as_ref().and_then(|r| r.git_file.as_ref());
        assert_eq!(content.and_then(|f| f.content.as_deref()), Some("new"));
        assert_eq!(state.in_flight, 0);
    }

    #[test]
    fn deselecting_ignores_late_response() {
        let (mut state, fetcher, rx, _api) = setup(FileResponse::default());
        state.selection.click_file("/a.py");
        sync_file_fetch(&mut state, &fetcher);
        state.selection.click_file("/a.py");
        sync_file_fetch(&mut state, &fetcher);

        assert!(!apply_fetch_result(&mut state, recv(&rx)));
        let gs = GitState::get(&state);
        assert!(gs.file_response.is_none());
        assert!(gs.current_diff(None).is_none());
        assert!(state.after_hidden());
    }

    #[test]
    fn branch_snapshot_drives_annotations() {
        let (mut state, fetcher, rx, _api) = setup(FileResponse::default());
        refetch_branch(&mut state, &fetcher);
        refetch_branches(&mut state, &fetcher);
        apply_fetch_result(&mut state, recv(&rx));
        apply_fetch_result(&mut state, recv(&rx));

        let gs = GitState::get(&state);
        assert_eq!(gs.branches.as_ref().map(Vec::len), Some(1));
        assert_eq!(gs.branch_generation, 1);
        let index = gs.annotations.get_for(&1).unwrap();
        assert_eq!(index.badge("/a.py", false).map(|b| b.text), Some("M"));
        assert_eq!(index.badge("/b.py", false).map(|b| b.text), Some("U"));
    }

    #[test]
    fn identical_branch_refetch_keeps_generation() {
        let (mut state, fetcher, rx, _api) = setup(FileResponse::default());
        refetch_branch(&mut state, &fetcher);
        apply_fetch_result(&mut state, recv(&rx));
        refetch_branch(&mut state, &fetcher);
        apply_fetch_result(&mut state, recv(&rx));
        assert_eq!(GitState::get(&state).branch_generation, 1);
    }

    #[test]
    fn transport_failure_is_reported() {
        let (mut state, _fetcher, _rx, _api) = setup(FileResponse::default());
        let tag = GitState::get_mut(&mut state).generations.next(FetchKind::Branches);
        let result = FetchResult { tag, key: None, payload: Err(ApiError::Transport("refused".into())) };
        assert!(apply_fetch_result(&mut state, result));
        assert_eq!(state.reporter.visible().unwrap().summary(), "list branches: request failed: refused");
        assert!(GitState::get(&state).branches.is_none());
        assert!(!GitState::get(&state).generations.is_pending(FetchKind::Branches));
    }
}
