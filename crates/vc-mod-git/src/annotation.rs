//! Per-file change markers derived from a branch snapshot.

use std::collections::HashSet;

use vc_base::types::Branch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Modified,
    Untracked,
    Unchanged,
}

/// One-character marker shown after a leaf in the file tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Badge {
    pub status: FileStatus,
    pub text: &'static str,
    pub title: &'static str,
}

impl Badge {
    pub const MODIFIED: Badge = Badge { status: FileStatus::Modified, text: "M", title: "Modified" };
    pub const UNTRACKED: Badge = Badge { status: FileStatus::Untracked, text: "U", title: "Untracked" };
}

/// Membership sets of modified and untracked full paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationIndex {
    modified: HashSet<String>,
    untracked: HashSet<String>,
}

impl AnnotationIndex {
    pub fn from_branch(branch: &Branch) -> Self {
        Self {
            modified: branch.modified_files.iter().cloned().collect(),
            untracked: branch.untracked_files.iter().cloned().collect(),
        }
    }

    /// Modified wins over untracked when a path is in both lists.
    pub fn classify(&self, full_path: &str) -> FileStatus {
        if self.modified.contains(full_path) {
            FileStatus::Modified
        } else if self.untracked.contains(full_path) {
            FileStatus::Untracked
        } else {
            FileStatus::Unchanged
        }
    }

    /// Decoration for a tree node. Directories never get a badge.
    pub fn badge(&self, full_path: &str, is_dir: bool) -> Option<Badge> {
        if is_dir {
            return None;
        }
        match self.classify(full_path) {
            FileStatus::Modified => Some(Badge::MODIFIED),
            FileStatus::Untracked => Some(Badge::UNTRACKED),
            FileStatus::Unchanged => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vc_base::types::FileNode;

    fn branch(modified: &[&str], untracked: &[&str]) -> Branch {
        Branch {
            name: "main".into(),
            files: vec![],
            modified_files: modified.iter().map(|s| s.to_string()).collect(),
            untracked_files: untracked.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn scenario_badges() {
        let mut b = branch(&["/a.py"], &["/b.py"]);
        b.files = vec![
            FileNode::leaf("/a.py"),
            FileNode::leaf("/b.py"),
            FileNode::dir("/dir", vec![FileNode::leaf("c.py")]),
        ];
        let index = AnnotationIndex::from_branch(&b);

        let badges: Vec<Option<&str>> =
            b.files.iter().map(|n| index.badge(&n.name, n.is_dir()).map(|badge| badge.text)).collect();
        assert_eq!(badges, vec![Some("M"), Some("U"), None]);
    }

    #[test]
    fn modified_takes_precedence_over_untracked() {
        let index = AnnotationIndex::from_branch(&branch(&["x"], &["x"]));
        assert_eq!(index.classify("x"), FileStatus::Modified);
        assert_eq!(index.badge("x", false), Some(Badge::MODIFIED));
    }

    #[test]
    fn classification_covers_every_case() {
        let index = AnnotationIndex::from_branch(&branch(&["m"], &["u"]));
        assert_eq!(index.classify("m"), FileStatus::Modified);
        assert_eq!(index.classify("u"), FileStatus::Untracked);
        assert_eq!(index.classify("other"), FileStatus::Unchanged);
        assert_eq!(index.badge("other", false), None);
    }

    #[test]
    fn directories_never_get_a_badge() {
        let index = AnnotationIndex::from_branch(&branch(&["/dir"], &["/dir2"]));
        assert_eq!(index.badge("/dir", true), None);
        assert_eq!(index.badge("/dir2", true), None);
    }

    #[test]
    fn empty_branch_has_no_markers() {
        let index = AnnotationIndex::from_branch(&Branch::default());
        assert_eq!(index, AnnotationIndex::default());
        assert_eq!(index.classify("anything"), FileStatus::Unchanged);
    }
}
