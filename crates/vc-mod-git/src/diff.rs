//! Side-by-side, word-level diff of a file against its base revision.
//!
//! Line alignment and word emphasis come from `similar`; this module only pairs
//! the changes of each op into left/right rows.

use similar::{Algorithm, ChangeTag, InlineChange, TextDiff};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffSegment {
    /// Changed word(s) inside a replaced line
    pub emphasized: bool,
    pub text: String,
}

/// One side of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffCell {
    /// 1-based line number on its side
    pub line_no: usize,
    pub tag: ChangeTag,
    pub segments: Vec<DiffSegment>,
}

impl DiffCell {
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A row of the split view. A missing side renders as filler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitRow {
    pub left: Option<DiffCell>,
    pub right: Option<DiffCell>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitDiff {
    pub rows: Vec<SplitRow>,
    pub additions: usize,
    pub deletions: usize,
}

impl SplitDiff {
    pub fn is_unchanged(&self) -> bool {
        self.additions == 0 && self.deletions == 0
    }
}

/// Diff `old` (base revision) against `new` (working copy).
pub fn compute_split_diff(old: &str, new: &str) -> SplitDiff {
    let mut out = SplitDiff::default();
    if old.is_empty() && new.is_empty() {
        return out;
    }

    let diff = TextDiff::configure().algorithm(Algorithm::Patience).diff_lines(old, new);

    for op in diff.ops() {
        let mut deleted = Vec::new();
        let mut inserted = Vec::new();

        for change in diff.iter_inline_changes(op) {
            match change.tag() {
                ChangeTag::Equal => {
                    // an equal op never interleaves with deletes/inserts
                    let left = cell(&change, change.old_index());
                    let right = cell(&change, change.new_index());
                    out.rows.push(SplitRow { left, right });
                }
                ChangeTag::Delete => {
                    out.deletions += 1;
                    deleted.extend(cell(&change, change.old_index()));
                }
                ChangeTag::Insert => {
                    out.additions += 1;
                    inserted.extend(cell(&change, change.new_index()));
                }
            }
        }

        let paired = deleted.len().max(inserted.len());
        let mut deleted = deleted.into_iter();
        let mut inserted = inserted.into_iter();
        for _ in 0..paired {
            out.rows.push(SplitRow { left: deleted.next(), right: inserted.next() });
        }
    }

    out
}

fn cell(change: &InlineChange<'_, str>, index: Option<usize>) -> Option<DiffCell> {
    let line_no = index? + 1;
    Some(DiffCell { line_no, tag: change.tag(), segments: collect_segments(change) })
}

fn collect_segments(change: &InlineChange<'_, str>) -> Vec<DiffSegment> {
    let mut segments: Vec<DiffSegment> = Vec::new();

    for (emphasized, value) in change.iter_strings_lossy() {
        let text = value.trim_end_matches(['\n', '\r']).to_string();
        if text.is_empty() && !segments.is_empty() {
            continue;
        }
        match segments.last_mut() {
            Some(last) if last.emphasized == emphasized => last.text.push_str(&text),
            _ => segments.push(DiffSegment { emphasized, text }),
        }
    }

    if segments.is_empty() {
        segments.push(DiffSegment { emphasized: false, text: String::new() });
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(diff: &SplitDiff) -> Vec<(Option<String>, Option<String>)> {
        diff.rows.iter().map(|r| (r.left.as_ref().map(|c| c.text()), r.right.as_ref().map(|c| c.text()))).collect()
    }

    #[test]
    fn blank_inputs_give_empty_diff() {
        let diff = compute_split_diff("", "");
        assert!(diff.rows.is_empty());
        assert!(diff.is_unchanged());
    }

    #[test]
    fn identical_content_pairs_every_line() {
        let diff = compute_split_diff("a\nb\n", "a\nb\n");
        assert!(diff.is_unchanged());
        assert_eq!(
            texts(&diff),
            vec![(Some("a".into()), Some("a".into())), (Some("b".into()), Some("b".into()))]
        );
    }

    #[test]
    fn replaced_line_sits_side_by_side() {
        let diff = compute_split_diff("keep\nold value\n", "keep\nnew value\n");
        assert_eq!(diff.additions, 1);
        assert_eq!(diff.deletions, 1);
        let row = &diff.rows[1];
        let left = row.left.as_ref().unwrap();
        let right = row.right.as_ref().unwrap();
        assert_eq!(left.tag, ChangeTag::Delete);
        assert_eq!(right.tag, ChangeTag::Insert);
        assert_eq!(left.line_no, 2);
        assert_eq!(right.line_no, 2);
        assert!(left.segments.iter().any(|s| s.emphasized && s.text.contains("old")));
        assert!(right.segments.iter().any(|s| s.emphasized && s.text.contains("new")));
        assert!(right.segments.iter().any(|s| !s.emphasized && s.text.contains("value")));
    }

    #[test]
    fn new_file_has_only_right_side() {
        let diff = compute_split_diff("", "one\ntwo\n");
        assert_eq!(diff.additions, 2);
        assert!(diff.rows.iter().all(|r| r.left.is_none() && r.right.is_some()));
    }

    #[test]
    fn uneven_replacement_pads_shorter_side() {
        let diff = compute_split_diff("x\n", "y\nz\n");
        assert_eq!(diff.rows.len(), 2);
        assert!(diff.rows[1].left.is_none());
        assert_eq!(diff.rows[1].right.as_ref().map(|c| c.text()), Some("z".to_string()));
    }
}
