//! Section / global-line index
//!
//! Flattens per-file diff sections into one globally addressed sequence of
//! renderable rows: one header row per section, one row per diff line, and a
//! fixed number of spacer rows between consecutive sections. Section order
//! equals input order - no sorting, no case folding, no path normalization;
//! diffs render exactly in the order the host supplies them.

use crate::types::{FileDiff, GlobalLine, RowKind, Section};

use super::LineLayoutCache;

/// Row-height constants for one layout pass, derived from settings
#[derive(Clone, Copy, Debug)]
pub struct LayoutMetrics {
    /// Fixed header row height
    pub header_height: f32,
    /// Height of one diff line row
    pub line_height: f32,
    /// Height of one spacer row
    pub spacer_height: f32,
    /// Number of spacer rows inserted between consecutive sections
    pub spacer_rows: usize,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            header_height: 35.0,
            line_height: 21.0,
            spacer_height: 16.0,
            spacer_rows: 1,
        }
    }
}

/// Output of one flattening pass; replaces the previous layout wholesale
#[derive(Clone, Debug, Default)]
pub struct GlobalLayout {
    pub sections: Vec<Section>,
    pub lines: Vec<GlobalLine>,
    pub cache: LineLayoutCache,
}

/// Flatten `diffs` into sections and globally indexed rows.
///
/// Deterministic: identical input yields an identical row sequence and
/// identical total height.
pub fn rebuild(diffs: &[FileDiff], metrics: &LayoutMetrics) -> GlobalLayout {
    let mut sections = Vec::with_capacity(diffs.len());
    let mut lines = Vec::new();
    let mut y = 0.0f32;

    for (diff_index, diff) in diffs.iter().enumerate() {
        // Spacer rows between consecutive sections (not before the first)
        if diff_index > 0 {
            for _ in 0..metrics.spacer_rows {
                lines.push(GlobalLine {
                    section: sections.len(),
                    kind: RowKind::Spacer,
                    y_offset: y,
                    height: metrics.spacer_height,
                });
                y += metrics.spacer_height;
            }
        }

        let section_index = sections.len();
        let y_offset = y;

        lines.push(GlobalLine {
            section: section_index,
            kind: RowKind::Header,
            y_offset: y,
            height: metrics.header_height,
        });
        y += metrics.header_height;

        for line in 0..diff.lines.len() {
            lines.push(GlobalLine {
                section: section_index,
                kind: RowKind::Diff { line },
                y_offset: y,
                height: metrics.line_height,
            });
            y += metrics.line_height;
        }

        sections.push(Section {
            diff_index,
            y_offset,
            header_height: metrics.header_height,
            body_lines: diff.lines.len(),
            total_height: metrics.header_height + diff.lines.len() as f32 * metrics.line_height,
        });
    }

    let cache = LineLayoutCache::build(lines.iter().map(|l| l.height));
    GlobalLayout { sections, lines, cache }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiffLine;

    fn file(id: &str, body: usize) -> FileDiff {
        let lines = (0..body)
            .map(|i| DiffLine::unchanged(i as u32 + 1, i as u32 + 1, format!("line {i}")))
            .collect();
        FileDiff::new(id, "rust", lines)
    }

    fn metrics() -> LayoutMetrics {
        LayoutMetrics {
            header_height: 35.0,
            line_height: 21.0,
            spacer_height: 16.0,
            spacer_rows: 1,
        }
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        let layout = rebuild(&[], &metrics());
        assert!(layout.sections.is_empty());
        assert!(layout.lines.is_empty());
        assert_eq!(layout.cache.total_height(), 0.0);
    }

    #[test]
    fn three_files_with_empty_middle_diff() {
        // 10, 0, and 25 body lines; header 35, spacer 16
        let m = metrics();
        let diffs = vec![file("a.rs", 10), file("b.rs", 0), file("c.rs", 25)];
        let layout = rebuild(&diffs, &m);

        let lh = m.line_height;
        let expected = (35.0 + 10.0 * lh) + 16.0 + 35.0 + 16.0 + (35.0 + 25.0 * lh);
        assert!((layout.cache.total_height() - expected).abs() < 1e-3);

        // Section 2 starts right after section 1's end plus the spacer
        let s0 = &layout.sections[0];
        let s1 = &layout.sections[1];
        assert!((s1.y_offset - (s0.y_offset + s0.total_height + 16.0)).abs() < 1e-3);

        // Row counts: header + body per section, one spacer between each
        assert_eq!(layout.lines.len(), (1 + 10) + 1 + (1 + 0) + 1 + (1 + 25));
    }

    #[test]
    fn rows_are_dense_and_monotonic() {
        let layout = rebuild(&[file("a.rs", 5), file("b.rs", 3)], &metrics());
        let mut prev_end = 0.0f32;
        for row in &layout.lines {
            assert!((row.y_offset - prev_end).abs() < 1e-3);
            prev_end = row.y_offset + row.height;
        }
        assert!((layout.cache.total_height() - prev_end).abs() < 1e-3);
    }

    #[test]
    fn input_order_is_preserved() {
        // Names that any sort (case-sensitive or not) would reorder
        let diffs = vec![file("zeta.rs", 1), file("Alpha.rs", 1), file("beta/deep/x.rs", 1)];
        let layout = rebuild(&diffs, &metrics());
        let order: Vec<usize> = layout.sections.iter().map(|s| s.diff_index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let diffs = vec![file("a.rs", 7), file("b.rs", 2)];
        let first = rebuild(&diffs, &metrics());
        let second = rebuild(&diffs, &metrics());
        assert_eq!(first.lines, second.lines);
        assert_eq!(first.sections, second.sections);
        assert_eq!(first.cache.total_height(), second.cache.total_height());
    }

    #[test]
    fn header_row_precedes_body_rows() {
        let layout = rebuild(&[file("a.rs", 2)], &metrics());
        assert_eq!(layout.lines[0].kind, RowKind::Header);
        assert_eq!(layout.lines[1].kind, RowKind::Diff { line: 0 });
        assert_eq!(layout.lines[2].kind, RowKind::Diff { line: 1 });
    }
}
