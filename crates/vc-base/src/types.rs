//! Wire types shared by the data service clients and the panels.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A branch snapshot as served by `git_branches`.
///
/// Lists are optional on the wire; a branch from the list endpoint usually only
/// carries its name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileNode>,
    #[serde(default)]
    pub modified_files: Vec<String>,
    #[serde(default)]
    pub untracked_files: Vec<String>,
}

/// One entry of a branch file tree. `name` is a single path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    #[serde(alias = "path")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileNode>>,
}

impl FileNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self { name: name.into(), children: None }
    }

    pub fn dir(name: impl Into<String>, children: Vec<FileNode>) -> Self {
        Self { name: name.into(), children: Some(children) }
    }

    /// A directory has at least one child. Empty child lists count as files.
    pub fn is_dir(&self) -> bool {
        self.children.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn children(&self) -> &[FileNode] {
        self.children.as_deref().unwrap_or(&[])
    }
}

/// Join a parent's full path with a child segment.
pub fn join_path(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(p) if !p.is_empty() => format!("{}/{}", p.trim_end_matches('/'), name.trim_start_matches('/')),
        _ => name.to_string(),
    }
}

/// File content at the working copy and at the base branch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitFile {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub content_from_base: Option<String>,
}

/// Application-level error carried inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorPayload(pub Value);

impl ErrorPayload {
    pub fn message(&self) -> Option<&str> {
        match &self.0 {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("message").and_then(|m| m.as_str()),
            _ => None,
        }
    }

    pub fn from_message(message: impl Into<String>) -> Self {
        Self(serde_json::json!({ "message": message.into() }))
    }
}

/// Response of `git_files/<path>`. `raw` keeps the whole body for error reports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileResponse {
    pub git_file: Option<GitFile>,
    pub error: Option<ErrorPayload>,
    pub raw: Value,
}

#[derive(Deserialize)]
struct FileEnvelope {
    #[serde(default)]
    git_file: Option<GitFile>,
    #[serde(default)]
    error: Option<ErrorPayload>,
}

impl FileResponse {
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let envelope: FileEnvelope = serde_json::from_value(raw.clone())?;
        // `"error": null` means no error
        let error = envelope.error.filter(|e| !e.0.is_null());
        Ok(Self { git_file: envelope.git_file, error, raw })
    }

    /// Build a response the way the service would have serialized it.
    pub fn new(git_file: Option<GitFile>, error: Option<ErrorPayload>) -> Self {
        let mut raw = serde_json::Map::new();
        if let Some(file) = &git_file {
            raw.insert("git_file".to_string(), serde_json::to_value(file).unwrap_or(Value::Null));
        }
        if let Some(err) = &error {
            raw.insert("error".to_string(), err.0.clone());
        }
        Self { git_file, error, raw: Value::Object(raw) }
    }
}

/// `{ "git_branches": [...] }`
#[derive(Debug, Deserialize)]
pub struct BranchesEnvelope {
    #[serde(default)]
    pub git_branches: Vec<Branch>,
}

/// `{ "git_branch": {...} }`
#[derive(Debug, Deserialize)]
pub struct BranchEnvelope {
    #[serde(default)]
    pub git_branch: Option<Branch>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_node_accepts_path_alias() {
        let node: FileNode = serde_json::from_value(json!({"path": "/a.py"})).unwrap();
        assert_eq!(node.name, "/a.py");
        assert!(!node.is_dir());
    }

    #[test]
    fn empty_children_is_a_file() {
        let node: FileNode = serde_json::from_value(json!({"name": "x", "children": []})).unwrap();
        assert!(!node.is_dir());
        let dir = FileNode::dir("d", vec![FileNode::leaf("f")]);
        assert!(dir.is_dir());
    }

    #[test]
    fn branch_lists_default_to_empty() {
        let branch: Branch = serde_json::from_value(json!({"name": "main"})).unwrap();
        assert!(branch.files.is_empty());
        assert!(branch.modified_files.is_empty());
        assert!(branch.untracked_files.is_empty());
    }

    #[test]
    fn join_path_handles_roots_and_slashes() {
        assert_eq!(join_path(None, "a.py"), "a.py");
        assert_eq!(join_path(Some("/dir"), "x.py"), "/dir/x.py");
        assert_eq!(join_path(Some("repo/"), "/x.py"), "repo/x.py");
    }

    #[test]
    fn file_response_keeps_raw_and_error() {
        let raw = json!({"error": {"message": "not found"}});
        let resp = FileResponse::from_value(raw.clone()).unwrap();
        assert!(resp.git_file.is_none());
        assert_eq!(resp.error.as_ref().and_then(|e| e.message()), Some("not found"));
        assert_eq!(resp.raw, raw);
    }

    #[test]
    fn null_error_is_no_error() {
        let resp = FileResponse::from_value(json!({"git_file": {"content": "x"}, "error": null})).unwrap();
        assert!(resp.error.is_none());
        assert_eq!(resp.git_file.unwrap().content.as_deref(), Some("x"));
    }
}
