//! Collapsible view over a branch file tree.

use std::collections::HashSet;

use vc_base::types::{FileNode, join_path};

/// A visible line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub full_path: String,
    pub name: String,
    pub depth: usize,
    pub is_dir: bool,
    pub expanded: bool,
}

/// Expansion and cursor state of the file tree panel.
#[derive(Debug, Clone, Default)]
pub struct TreeView {
    pub expanded: HashSet<String>,
    pub cursor: usize,
    /// Set once top-level folders were opened for the first snapshot
    seeded: bool,
}

impl TreeView {
    /// Open top-level folders the first time a tree arrives.
    pub fn seed(&mut self, files: &[FileNode]) {
        if self.seeded || files.is_empty() {
            return;
        }
        for node in files.iter().filter(|n| n.is_dir()) {
            self.expanded.insert(node.name.clone());
        }
        self.seeded = true;
    }

    pub fn rows(&self, files: &[FileNode]) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        self.push_rows(files, None, 0, &mut rows);
        rows
    }

    fn push_rows(&self, nodes: &[FileNode], parent: Option<&str>, depth: usize, rows: &mut Vec<TreeRow>) {
        for node in nodes {
            let full_path = join_path(parent, &node.name);
            let is_dir = node.is_dir();
            let expanded = is_dir && self.expanded.contains(&full_path);
            rows.push(TreeRow { full_path: full_path.clone(), name: node.name.clone(), depth, is_dir, expanded });
            if expanded {
                self.push_rows(node.children(), Some(&full_path), depth + 1, rows);
            }
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self, row_count: usize) {
        if self.cursor + 1 < row_count {
            self.cursor += 1;
        }
    }

    pub fn clamp(&mut self, row_count: usize) {
        self.cursor = self.cursor.min(row_count.saturating_sub(1));
    }

    pub fn toggle(&mut self, full_path: &str) {
        if !self.expanded.remove(full_path) {
            self.expanded.insert(full_path.to_string());
        }
    }

    /// Right arrow: open the folder under the cursor.
    pub fn expand_at_cursor(&mut self, rows: &[TreeRow]) {
        if let Some(row) = rows.get(self.cursor)
            && row.is_dir
        {
            self.expanded.insert(row.full_path.clone());
        }
    }

    /// Left arrow: close the folder under the cursor, or jump to the parent folder.
    pub fn collapse_at_cursor(&mut self, rows: &[TreeRow]) {
        let Some(row) = rows.get(self.cursor) else {
            return;
        };
        if row.is_dir && row.expanded {
            self.expanded.remove(&row.full_path);
            return;
        }
        if row.depth == 0 {
            return;
        }
        let parent = rows[..self.cursor].iter().rposition(|r| r.is_dir && r.depth + 1 == row.depth);
        if let Some(idx) = parent {
            self.cursor = idx;
        }
    }
}
