//! Core types for the diff view

use bevy::prelude::*;
use std::ops::Range;

use crate::layout::LineLayoutCache;

// ========== Diff content model ==========

/// How a single diff line changed relative to the old revision
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    /// Line present in both revisions, unchanged
    #[default]
    Unchanged,
    /// Line only present in the new revision
    Added,
    /// Line only present in the old revision
    Removed,
    /// Line present in both revisions with intra-line edits
    Modified,
}

/// One pre-parsed diff line, as supplied by the host's diff parser.
///
/// The view never parses diff text itself; it consumes these records in the
/// order the parser produced them. Inconsistent line-number fields are
/// tolerated (the affected gutter column renders blank).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiffLine {
    /// Change classification for this line
    pub kind: ChangeKind,
    /// Line number in the old revision, if the line exists there
    pub old_line: Option<u32>,
    /// Line number in the new revision, if the line exists there
    pub new_line: Option<u32>,
    /// Raw line text, without a trailing newline
    pub text: String,
    /// Character ranges within `text` that changed (intra-line highlights)
    pub change_spans: Vec<Range<usize>>,
}

impl DiffLine {
    /// Convenience constructor for an unchanged context line
    pub fn unchanged(old_line: u32, new_line: u32, text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Unchanged,
            old_line: Some(old_line),
            new_line: Some(new_line),
            text: text.into(),
            change_spans: Vec::new(),
        }
    }

    /// Convenience constructor for an added line
    pub fn added(new_line: u32, text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Added,
            old_line: None,
            new_line: Some(new_line),
            text: text.into(),
            change_spans: Vec::new(),
        }
    }

    /// Convenience constructor for a removed line
    pub fn removed(old_line: u32, text: impl Into<String>) -> Self {
        Self {
            kind: ChangeKind::Removed,
            old_line: Some(old_line),
            new_line: None,
            text: text.into(),
            change_spans: Vec::new(),
        }
    }

    /// Number of characters in the line text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// One file's diff block: identifier, language tag, and its parsed lines
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileDiff {
    /// Host-supplied file identifier (typically the path)
    pub file_id: String,
    /// Language tag, forwarded to the syntax-color lookup
    pub language: String,
    /// Parsed diff lines in display order
    pub lines: Vec<DiffLine>,
}

impl FileDiff {
    pub fn new(file_id: impl Into<String>, language: impl Into<String>, lines: Vec<DiffLine>) -> Self {
        Self {
            file_id: file_id.into(),
            language: language.into(),
            lines,
        }
    }

    /// Count of added lines (used for the header label)
    pub fn added_count(&self) -> usize {
        self.lines.iter().filter(|l| l.kind == ChangeKind::Added).count()
    }

    /// Count of removed lines (used for the header label)
    pub fn removed_count(&self) -> usize {
        self.lines.iter().filter(|l| l.kind == ChangeKind::Removed).count()
    }
}

// ========== Flattened layout rows ==========

/// Semantic kind of one renderable row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    /// File header row (status, filename, counts)
    Header,
    /// One diff line; `line` indexes into the owning section's `FileDiff::lines`
    Diff { line: usize },
    /// Blank spacing row between sections
    Spacer,
}

impl RowKind {
    /// Whether this row carries selectable/extractable text
    pub fn is_diff(&self) -> bool {
        matches!(self, RowKind::Diff { .. })
    }
}

/// One file's laid-out diff block within the global layout.
///
/// Sections are laid out in input order with monotonically increasing
/// Y-offsets; a fixed spacer is inserted between consecutive sections.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    /// Index into `DiffViewState::diffs`
    pub diff_index: usize,
    /// Absolute document-space Y where the header starts
    pub y_offset: f32,
    /// Header row height
    pub header_height: f32,
    /// Number of body (diff) lines
    pub body_lines: usize,
    /// Header + body height, excluding the trailing spacer
    pub total_height: f32,
}

/// One flattened, globally addressable renderable row.
///
/// Global indices form a dense 0-based sequence whose Y-offsets are
/// non-decreasing, so binary search over Y recovers an index in O(log n).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlobalLine {
    /// Index of the owning section
    pub section: usize,
    /// Row kind (header / diff line / spacer)
    pub kind: RowKind,
    /// Absolute document-space Y where this row starts
    pub y_offset: f32,
    /// Row height
    pub height: f32,
}

/// A (global line, character) position used by the selection model.
///
/// Only valid against the `GlobalLine` sequence it was derived from; every
/// content rebuild invalidates outstanding positions, so the selection is
/// cleared on rebuild rather than carried across.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlobalTextPosition {
    /// Global line index
    pub line: usize,
    /// Character index within that line
    pub character: usize,
}

impl GlobalTextPosition {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

// ========== View state ==========

/// Viewport dimensions, mirroring the host window
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct ViewportDimensions {
    /// Width in device pixels
    pub width: u32,
    /// Height in device pixels
    pub height: u32,
    /// Horizontal offset applied to all content (host-reserved left space)
    pub offset_x: f32,
}

/// Central diff view state resource.
///
/// Single owner of the content, layout, scroll, and selection state. Content
/// (`diffs`/`sections`/`lines`/`layout`) is replaced atomically on rebuild;
/// scroll and selection mutate between rebuilds. All mutation happens on the
/// main schedule, so the per-frame pipeline always reads a consistent
/// snapshot.
#[derive(Resource, Clone, Debug, Default)]
pub struct DiffViewState {
    /// Input diffs, in the order the host supplied them
    pub diffs: Vec<FileDiff>,
    /// Laid-out sections, one per diff, same order
    pub sections: Vec<Section>,
    /// Flattened global rows across all sections
    pub lines: Vec<GlobalLine>,
    /// Prefix-sum layout cache over `lines`
    pub layout: LineLayoutCache,

    /// Document-space vertical scroll offset, in `[0, max_scroll]`
    pub scroll_y: f32,
    /// Smooth-scroll target for `scroll_y`
    pub target_scroll_y: f32,
    /// Horizontal scroll offset applied to body text (gutter stays fixed)
    pub scroll_x: f32,
    /// Smooth-scroll target for `scroll_x`
    pub target_scroll_x: f32,

    /// Selection anchor, cleared on every rebuild
    pub selection_start: Option<GlobalTextPosition>,
    /// Selection head, cleared on every rebuild
    pub selection_end: Option<GlobalTextPosition>,

    /// Widest body line in characters, set on rebuild (bounds horizontal
    /// scrolling)
    pub max_line_chars: usize,

    /// Incremented on every applied rebuild; invalidates derived caches
    pub content_version: u64,
    /// Instances must be regenerated (content, resize, selection change)
    pub needs_update: bool,
    /// Scroll offset changed; reconcile + regenerate this frame
    pub needs_scroll_update: bool,

    /// Debounced rebuild payload; only the newest queued payload is applied
    pub pending_diffs: Option<Vec<FileDiff>>,
    /// Time (ms) the last rebuild was applied, for debouncing
    pub last_rebuild_time: f64,
}

impl DiffViewState {
    /// Total document-space content height (drives the scrollbar)
    pub fn total_height(&self) -> f32 {
        self.layout.total_height()
    }

    /// Number of global rows
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Maximum valid scroll offset for the given viewport height
    pub fn max_scroll(&self, viewport_height: f32) -> f32 {
        (self.total_height() - viewport_height).max(0.0)
    }

    /// The diff line backing a global row, if it is a diff row
    pub fn diff_line(&self, global_index: usize) -> Option<&DiffLine> {
        let row = self.lines.get(global_index)?;
        match row.kind {
            RowKind::Diff { line } => {
                let section = self.sections.get(row.section)?;
                self.diffs.get(section.diff_index)?.lines.get(line)
            }
            _ => None,
        }
    }

    /// The section whose diff carries the given file identifier
    pub fn section_for_file(&self, file_id: &str) -> Option<&Section> {
        self.sections
            .iter()
            .find(|s| self.diffs.get(s.diff_index).is_some_and(|d| d.file_id == file_id))
    }

    /// Document-space Y-offset of a file's section header, for scroll-to-file
    pub fn section_offset(&self, file_id: &str) -> Option<f32> {
        self.section_for_file(file_id).map(|s| s.y_offset)
    }

    /// Selection endpoints in document order, if a selection is active
    pub fn ordered_selection(&self) -> Option<(GlobalTextPosition, GlobalTextPosition)> {
        let (a, b) = (self.selection_start?, self.selection_end?);
        Some(if a <= b { (a, b) } else { (b, a) })
    }

    /// Extract the selected text, if any (diff rows only; header/spacer rows
    /// contribute nothing)
    pub fn selected_text(&self) -> Option<String> {
        let (from, to) = self.ordered_selection()?;
        Some(crate::selection::extract_text(self, from, to))
    }

    /// Drop the selection; called on every content rebuild since global
    /// indices are not stable across rebuilds
    pub fn clear_selection(&mut self) {
        self.selection_start = None;
        self.selection_end = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_line_counts() {
        let diff = FileDiff::new(
            "a.rs",
            "rust",
            vec![
                DiffLine::unchanged(1, 1, "fn main() {"),
                DiffLine::removed(2, "    old();"),
                DiffLine::added(2, "    new();"),
                DiffLine::added(3, "    more();"),
            ],
        );
        assert_eq!(diff.added_count(), 2);
        assert_eq!(diff.removed_count(), 1);
    }

    #[test]
    fn ordered_selection_swaps_reversed_endpoints() {
        let mut state = DiffViewState::default();
        state.selection_start = Some(GlobalTextPosition::new(7, 0));
        state.selection_end = Some(GlobalTextPosition::new(3, 2));
        let (from, to) = state.ordered_selection().unwrap();
        assert_eq!(from, GlobalTextPosition::new(3, 2));
        assert_eq!(to, GlobalTextPosition::new(7, 0));
    }

    #[test]
    fn selection_cleared_leaves_no_text() {
        let mut state = DiffViewState::default();
        state.selection_start = Some(GlobalTextPosition::new(0, 0));
        state.clear_selection();
        assert!(state.selected_text().is_none());
    }
}
