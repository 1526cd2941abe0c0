//! Data service backed by the `git` CLI in a local working directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use vc_base::config::constants::{CURRENT_BRANCH_ID, GIT_CMD_TIMEOUT_SECS};
use vc_base::errors::ApiError;
use vc_base::modules::run_with_timeout;
use vc_base::types::{Branch, ErrorPayload, FileNode, FileResponse, GitFile};

use crate::api::VersionControlApi;

/// `root` may be any directory inside a work tree. Commands run from the
/// top level so every path is repository-relative.
pub struct LocalGitApi {
    root: PathBuf,
    toplevel: OnceLock<PathBuf>,
}

impl LocalGitApi {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), toplevel: OnceLock::new() }
    }

    fn run_in(dir: &Path, args: &[&str]) -> Result<std::process::Output, ApiError> {
        let mut cmd = Command::new("git");
        cmd.args(["-c", "core.quotePath=false"])
            .args(args)
            .current_dir(dir)
            .env("GIT_TERMINAL_PROMPT", "0");
        Ok(run_with_timeout(cmd, GIT_CMD_TIMEOUT_SECS)?)
    }

    fn checked(args: &[&str], out: std::process::Output) -> Result<String, ApiError> {
        if !out.status.success() {
            return Err(ApiError::Git {
                command: args.join(" "),
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&out.stdout).into_owned())
    }

    /// Work tree root, resolved once from `root`.
    fn toplevel(&self) -> Result<&Path, ApiError> {
        if let Some(top) = self.toplevel.get() {
            return Ok(top);
        }
        let args = ["rev-parse", "--show-toplevel"];
        let out = Self::checked(&args, Self::run_in(&self.root, &args)?)?;
        let top = self.toplevel.get_or_init(|| PathBuf::from(out.trim_end_matches(['\n', '\r'])));
        tracing::debug!(root = %self.root.display(), toplevel = %top.display(), "resolved work tree");
        Ok(top)
    }

    fn run(&self, args: &[&str]) -> Result<std::process::Output, ApiError> {
        Self::run_in(self.toplevel()?, args)
    }

    /// stdout of a git command that must succeed.
    fn git(&self, args: &[&str]) -> Result<String, ApiError> {
        Self::checked(args, self.run(args)?)
    }

    /// Whether `rev` resolves to a commit.
    fn has_revision(&self, rev: &str) -> Result<bool, ApiError> {
        let commit = format!("{}^{{commit}}", rev);
        Ok(self.run(&["rev-parse", "--verify", "--quiet", &commit])?.status.success())
    }

    fn current_branch_name(&self) -> Result<String, ApiError> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"]);
        match name {
            Ok(name) => Ok(name.trim().to_string()),
            // Unborn HEAD: rev-parse fails, symbolic-ref still names the branch
            Err(_) => Ok(self.git(&["symbolic-ref", "--short", "HEAD"])?.trim().to_string()),
        }
    }

    fn current_branch(&self) -> Result<Branch, ApiError> {
        let name = self.current_branch_name()?;
        let modified = if self.has_revision("HEAD")? {
            paths(&self.git(&["diff", "--name-only", "-z", "HEAD"])?)
        } else {
            // No commit yet: everything staged counts as modified
            paths(&self.git(&["diff", "--name-only", "-z", "--cached"])?)
        };
        let untracked = paths(&self.git(&["ls-files", "-z", "--others", "--exclude-standard"])?);
        let mut all = paths(&self.git(&["ls-files", "-z"])?);
        all.extend(untracked.iter().cloned());

        Ok(Branch { name, files: build_tree(&all), modified_files: modified, untracked_files: untracked })
    }
}

impl VersionControlApi for LocalGitApi {
    fn list_branches(&self) -> Result<Vec<Branch>, ApiError> {
        let out = self.git(&["branch", "--format=%(refname:short)"])?;
        Ok(out
            .lines()
            .filter(|l| !l.is_empty())
            .map(|name| Branch { name: name.to_string(), ..Branch::default() })
            .collect())
    }

    fn get_branch(&self, id: &str) -> Result<Branch, ApiError> {
        if id == CURRENT_BRANCH_ID {
            return self.current_branch();
        }
        let files = paths(&self.git(&["ls-tree", "-r", "-z", "--name-only", id])?);
        Ok(Branch { name: id.to_string(), files: build_tree(&files), ..Branch::default() })
    }

    fn get_file(&self, path: &str, base_branch: &str) -> Result<FileResponse, ApiError> {
        let Some(relative) = normalize_repo_path(path) else {
            return Ok(FileResponse::new(None, Some(ErrorPayload::from_message(format!("Invalid file path: {}", path)))));
        };

        let content = match std::fs::read(self.toplevel()?.join(&relative)) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if !self.has_revision(base_branch)? {
            let error = ErrorPayload::from_message(format!("Base branch {} not found", base_branch));
            return Ok(FileResponse::new(Some(GitFile { content, content_from_base: None }), Some(error)));
        }

        let object = format!("{}:{}", base_branch, relative);
        let content_from_base = if self.run(&["cat-file", "-e", &object])?.status.success() {
            Some(self.git(&["show", &object])?)
        } else {
            // New file on this branch
            None
        };

        Ok(FileResponse::new(Some(GitFile { content, content_from_base }), None))
    }

    fn describe(&self) -> String {
        format!("git:{}", self.root.display())
    }
}

/// Entries of `-z` output, kept byte for byte.
fn paths(out: &str) -> Vec<String> {
    out.split('\0').filter(|p| !p.is_empty()).map(str::to_string).collect()
}

/// Repository-relative form of a selected path. Rejects paths leaving the repository.
fn normalize_repo_path(path: &str) -> Option<String> {
    let mut parts = Vec::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(seg) => parts.push(seg.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() { None } else { Some(parts.join("/")) }
}

/// Build a nested tree from `/`-separated paths. Directories sort before files.
pub fn build_tree<S: AsRef<str>>(paths: &[S]) -> Vec<FileNode> {
    #[derive(Default)]
    struct Dir {
        dirs: BTreeMap<String, Dir>,
        files: BTreeSet<String>,
    }

    fn into_nodes(dir: Dir) -> Vec<FileNode> {
        let mut nodes: Vec<FileNode> =
            dir.dirs.into_iter().map(|(name, sub)| FileNode::dir(name, into_nodes(sub))).collect();
        nodes.extend(dir.files.into_iter().map(FileNode::leaf));
        nodes
    }

    let mut root = Dir::default();
    for path in paths {
        let segments: Vec<&str> = path.as_ref().split('/').filter(|s| !s.is_empty()).collect();
        let Some((file, parents)) = segments.split_last() else {
            continue;
        };
        let mut dir = &mut root;
        for segment in parents {
            dir = dir.dirs.entry(segment.to_string()).or_default();
        }
        dir.files.insert(file.to_string());
    }
    into_nodes(root)
}
