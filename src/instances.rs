//! Per-frame render instance generation
//!
//! Walks the visible row range and fills flat instance buffers: colored
//! rects (backgrounds, separators, highlights, selection) and glyphs
//! (text, line numbers, header labels). Everything here is device space
//! with Y growing downward; the frame systems convert to world space and
//! atlas UVs when building meshes.
//!
//! Instances are regenerated from scratch every time they are needed. The
//! buffers are reused across frames so steady-state generation does not
//! allocate.

use bevy::prelude::*;
use std::ops::Range;

use crate::settings::DiffViewSettings;
use crate::syntax::{ColorCache, SyntaxColors};
use crate::types::{ChangeKind, DiffViewState, RowKind, ViewportDimensions};

/// One glyph to draw. `x`/`y` are the device-space top-left of the
/// character cell; the mesh builder applies the baseline offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphInstance {
    pub x: f32,
    pub y: f32,
    pub ch: char,
    pub color: Color,
}

/// One solid rectangle, device-space top-left anchored
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectInstance {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: Color,
}

/// Reusable instance buffers, filled by [`generate`] and drained by the
/// frame systems. Rects draw behind glyphs, each buffer in push order.
#[derive(Resource, Default)]
pub struct InstanceBuffers {
    pub rects: Vec<RectInstance>,
    pub glyphs: Vec<GlyphInstance>,
}

impl InstanceBuffers {
    /// Empty both buffers, keeping their capacity
    pub fn clear(&mut self) {
        self.rects.clear();
        self.glyphs.clear();
    }
}

/// Fill `out` with instances for every row in `range`.
///
/// Spacer rows emit nothing. Horizontal scroll shifts body text and its
/// overlays only; the gutter and header rows stay fixed. Text scrolled
/// under the gutter is clipped at the separator.
pub fn generate(
    state: &DiffViewState,
    settings: &DiffViewSettings,
    colors: &SyntaxColors,
    cache: &mut ColorCache,
    viewport: &ViewportDimensions,
    range: Range<usize>,
    out: &mut InstanceBuffers,
) {
    out.clear();

    let font = &settings.font;
    let theme = &settings.theme;
    let view_width = viewport.width as f32;
    let gutter_width = settings.layout.gutter_width(font);
    let text_origin = settings.layout.text_origin_x(font);
    let selection = state.ordered_selection();

    for index in range {
        let Some(row) = state.lines.get(index) else {
            break;
        };
        let y = row.y_offset - state.scroll_y;

        match row.kind {
            RowKind::Spacer => {}
            RowKind::Header => {
                let Some(section) = state.sections.get(row.section) else {
                    continue;
                };
                let Some(diff) = state.diffs.get(section.diff_index) else {
                    continue;
                };
                push_header(out, settings, view_width, y, row.height, diff);
            }
            RowKind::Diff { line } => {
                let Some(diff_line) = state.diff_line(index) else {
                    continue;
                };
                let section = row.section;
                let file_id = state
                    .sections
                    .get(section)
                    .and_then(|s| state.diffs.get(s.diff_index))
                    .map(|d| d.file_id.as_str())
                    .unwrap_or("");

                // Row backgrounds: gutter strip, then the change tint over
                // the content area
                out.rects.push(RectInstance {
                    x: 0.0,
                    y,
                    width: gutter_width,
                    height: row.height,
                    color: theme.gutter_background,
                });
                if let Some(tint) = change_background(theme, diff_line.kind) {
                    out.rects.push(RectInstance {
                        x: gutter_width,
                        y,
                        width: (view_width - gutter_width).max(0.0),
                        height: row.height,
                        color: tint,
                    });
                }
                out.rects.push(RectInstance {
                    x: gutter_width - 1.0,
                    y,
                    width: 1.0,
                    height: row.height,
                    color: theme.separator,
                });

                push_line_numbers(out, settings, y, diff_line.old_line, diff_line.new_line);

                // Intra-line change highlights, clipped at the gutter
                let intraline = match diff_line.kind {
                    ChangeKind::Removed => theme.intraline_removed,
                    _ => theme.intraline_added,
                };
                for span in &diff_line.change_spans {
                    let start_x = text_origin + span.start as f32 * font.char_width - state.scroll_x;
                    let end_x = text_origin + span.end as f32 * font.char_width - state.scroll_x;
                    let clipped = start_x.max(gutter_width);
                    if end_x > clipped {
                        out.rects.push(RectInstance {
                            x: clipped,
                            y,
                            width: end_x - clipped,
                            height: row.height,
                            color: intraline,
                        });
                    }
                }

                if let Some((from, to)) = selection {
                    push_selection_rect(out, settings, state, gutter_width, index, y, row.height, diff_line.char_count(), from, to);
                }

                // Body text, one glyph per visible character
                let row_colors = row_colors_for(colors, cache, state, file_id, section, line, diff_line);
                for (i, ch) in diff_line.text.chars().enumerate() {
                    if ch == ' ' {
                        continue;
                    }
                    let x = text_origin + i as f32 * font.char_width - state.scroll_x;
                    if x + font.char_width <= gutter_width {
                        continue;
                    }
                    if x >= view_width {
                        break;
                    }
                    let color = row_colors
                        .as_ref()
                        .and_then(|c| c.get(i).copied())
                        .unwrap_or(theme.foreground);
                    out.glyphs.push(GlyphInstance { x, y, ch, color });
                }
            }
        }
    }
}

fn change_background(theme: &crate::settings::ThemeSettings, kind: ChangeKind) -> Option<Color> {
    match kind {
        ChangeKind::Unchanged => None,
        ChangeKind::Added => Some(theme.added_background),
        ChangeKind::Removed => Some(theme.removed_background),
        ChangeKind::Modified => Some(theme.modified_background),
    }
}

/// Header row: background strip, status marker, filename, and +/- counts
fn push_header(
    out: &mut InstanceBuffers,
    settings: &DiffViewSettings,
    view_width: f32,
    y: f32,
    height: f32,
    diff: &crate::types::FileDiff,
) {
    let font = &settings.font;
    let theme = &settings.theme;
    out.rects.push(RectInstance {
        x: 0.0,
        y,
        width: view_width,
        height,
        color: theme.header_background,
    });

    // Center the single text line within the header strip
    let text_y = y + (height - font.line_height) / 2.0;
    let (added, removed) = (diff.added_count(), diff.removed_count());
    let status = match (added > 0, removed > 0) {
        (true, false) => '+',
        (false, true) => '-',
        _ => '~',
    };

    let mut x = settings.layout.gutter_padding;
    out.glyphs.push(GlyphInstance { x, y: text_y, ch: status, color: theme.header_foreground });
    x += 2.0 * font.char_width;
    x = push_str(out, font, x, text_y, &diff.file_id, theme.header_foreground);
    x += 2.0 * font.char_width;
    x = push_str(out, font, x, text_y, &format!("+{added}"), theme.added_count);
    x += font.char_width;
    push_str(out, font, x, text_y, &format!("-{removed}"), theme.removed_count);
}

/// Old and new line numbers, right-aligned in their gutter columns.
/// A missing number leaves its column blank.
fn push_line_numbers(
    out: &mut InstanceBuffers,
    settings: &DiffViewSettings,
    y: f32,
    old_line: Option<u32>,
    new_line: Option<u32>,
) {
    let font = &settings.font;
    let col_width = settings.layout.number_column_width(font);
    let old_right = settings.layout.gutter_padding + col_width;
    let new_right = old_right + font.char_width + col_width;

    for (number, right_edge) in [(old_line, old_right), (new_line, new_right)] {
        let Some(n) = number else { continue };
        let label = n.to_string();
        let x = right_edge - label.chars().count() as f32 * font.char_width;
        push_str(out, font, x, y, &label, settings.theme.line_numbers);
    }
}

/// Selection background for one diff row, clipped at the gutter
#[allow(clippy::too_many_arguments)]
fn push_selection_rect(
    out: &mut InstanceBuffers,
    settings: &DiffViewSettings,
    state: &DiffViewState,
    gutter_width: f32,
    index: usize,
    y: f32,
    height: f32,
    char_count: usize,
    from: crate::types::GlobalTextPosition,
    to: crate::types::GlobalTextPosition,
) {
    if index < from.line || index > to.line {
        return;
    }
    let begin = if index == from.line { from.character.min(char_count) } else { 0 };
    // Intermediate lines extend half a cell past the end to mark the newline
    let end = if index == to.line {
        to.character.min(char_count) as f32
    } else {
        char_count as f32 + 0.5
    };
    if (end - begin as f32) <= 0.0 {
        return;
    }

    let font = &settings.font;
    let text_origin = settings.layout.text_origin_x(font);
    let start_x = (text_origin + begin as f32 * font.char_width - state.scroll_x).max(gutter_width);
    let end_x = text_origin + end * font.char_width - state.scroll_x;
    if end_x > start_x {
        out.rects.push(RectInstance {
            x: start_x,
            y,
            width: end_x - start_x,
            height,
            color: settings.theme.selection_background,
        });
    }
}

fn push_str(
    out: &mut InstanceBuffers,
    font: &crate::settings::FontSettings,
    mut x: f32,
    y: f32,
    text: &str,
    color: Color,
) -> f32 {
    for ch in text.chars() {
        if ch != ' ' {
            out.glyphs.push(GlyphInstance { x, y, ch, color });
        }
        x += font.char_width;
    }
    x
}

/// Resolve per-character colors for a row through the cache. Returns
/// `None` when the lookup colors nothing, so the caller can fall back to
/// the theme foreground without an allocation.
fn row_colors_for(
    colors: &SyntaxColors,
    cache: &mut ColorCache,
    state: &DiffViewState,
    file_id: &str,
    section: usize,
    line: usize,
    diff_line: &crate::types::DiffLine,
) -> Option<Vec<Color>> {
    if let Some(cached) = cache.get(section, line, state.content_version) {
        return (!cached.is_empty()).then(|| cached.to_vec());
    }
    let mut resolved = Vec::new();
    let mut any = false;
    for i in 0..diff_line.char_count() {
        match colors.color_for(file_id, line, i) {
            Some(c) => {
                any = true;
                resolved.push(c);
            }
            None => resolved.push(Color::NONE),
        }
    }
    if !any {
        resolved.clear();
    }
    let result = (!resolved.is_empty()).then(|| resolved.clone());
    cache.insert(section, line, state.content_version, resolved);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rebuild;
    use crate::types::{DiffLine, FileDiff, GlobalTextPosition};

    fn test_state(settings: &DiffViewSettings) -> DiffViewState {
        let diffs = vec![
            FileDiff::new(
                "a.rs",
                "rust",
                vec![
                    DiffLine::unchanged(1, 1, "alpha"), // global 1
                    DiffLine::removed(2, "bravo"),      // global 2
                ],
            ),
            FileDiff::new("b.rs", "rust", vec![DiffLine::added(1, "delta")]), // global 5
        ];
        let layout = rebuild(&diffs, &settings.layout.metrics(&settings.font));
        DiffViewState {
            diffs,
            sections: layout.sections,
            lines: layout.lines,
            layout: layout.cache,
            ..Default::default()
        }
    }

    fn generate_all(state: &DiffViewState, settings: &DiffViewSettings) -> InstanceBuffers {
        let mut out = InstanceBuffers::default();
        let viewport = ViewportDimensions { width: 800, height: 600, offset_x: 0.0 };
        generate(
            state,
            settings,
            &SyntaxColors::default(),
            &mut ColorCache::default(),
            &viewport,
            0..state.lines.len(),
            &mut out,
        );
        out
    }

    #[test]
    fn spacer_rows_emit_nothing() {
        let settings = DiffViewSettings::default();
        let state = test_state(&settings);
        let mut out = InstanceBuffers::default();
        let viewport = ViewportDimensions { width: 800, height: 600, offset_x: 0.0 };
        // Global row 3 is the spacer between the two sections
        generate(
            &state,
            &settings,
            &SyntaxColors::default(),
            &mut ColorCache::default(),
            &viewport,
            3..4,
            &mut out,
        );
        assert!(out.rects.is_empty());
        assert!(out.glyphs.is_empty());
    }

    #[test]
    fn removed_line_gets_its_background_tint() {
        let settings = DiffViewSettings::default();
        let state = test_state(&settings);
        let out = generate_all(&state, &settings);
        let (top, _) = state.layout.y_range(2);
        assert!(out
            .rects
            .iter()
            .any(|r| r.y == top && r.color == settings.theme.removed_background));
    }

    #[test]
    fn unchanged_line_gets_no_tint() {
        let settings = DiffViewSettings::default();
        let state = test_state(&settings);
        let out = generate_all(&state, &settings);
        let (top, _) = state.layout.y_range(1);
        let tints = [
            settings.theme.added_background,
            settings.theme.removed_background,
            settings.theme.modified_background,
        ];
        assert!(!out.rects.iter().any(|r| r.y == top && tints.contains(&r.color)));
    }

    #[test]
    fn vertical_scroll_shifts_rows_up() {
        let settings = DiffViewSettings::default();
        let mut state = test_state(&settings);
        let unscrolled = generate_all(&state, &settings);
        state.scroll_y = 50.0;
        let scrolled = generate_all(&state, &settings);

        let header_y = |b: &InstanceBuffers| {
            b.rects
                .iter()
                .find(|r| r.color == settings.theme.header_background)
                .map(|r| r.y)
        };
        assert_eq!(header_y(&unscrolled), Some(0.0));
        assert_eq!(header_y(&scrolled), Some(-50.0));
    }

    #[test]
    fn horizontal_scroll_moves_text_but_not_line_numbers() {
        let settings = DiffViewSettings::default();
        let mut state = test_state(&settings);
        let before = generate_all(&state, &settings);
        state.scroll_x = 5.0;
        let after = generate_all(&state, &settings);

        let (top, _) = state.layout.y_range(1);
        let first_glyph_x = |b: &InstanceBuffers, ch: char| {
            b.glyphs.iter().find(|g| g.y == top && g.ch == ch).map(|g| g.x)
        };
        // Body text shifted left by the scroll amount
        let ax_before = first_glyph_x(&before, 'a').unwrap();
        let ax_after = first_glyph_x(&after, 'a').unwrap();
        assert_eq!(ax_after, ax_before - 5.0);
        // Line number '1' stayed put
        assert_eq!(first_glyph_x(&before, '1'), first_glyph_x(&after, '1'));
    }

    #[test]
    fn missing_line_number_leaves_column_blank() {
        let settings = DiffViewSettings::default();
        let state = test_state(&settings);
        let out = generate_all(&state, &settings);
        // "delta" on global row 5 is an added line: no old number, so the
        // only digit on that row is the new-side '1'
        let (top, _) = state.layout.y_range(5);
        let digits: Vec<_> = out
            .glyphs
            .iter()
            .filter(|g| g.y == top && g.ch.is_ascii_digit())
            .collect();
        assert_eq!(digits.len(), 1);
        assert_eq!(digits[0].ch, '1');
    }

    #[test]
    fn header_shows_status_and_counts() {
        let settings = DiffViewSettings::default();
        let state = test_state(&settings);
        let out = generate_all(&state, &settings);
        // File b.rs only adds lines, so its header status marker is '+'
        let (header_top, _) = state.layout.y_range(4);
        let text_y = header_top + (settings.layout.header_height - settings.font.line_height) / 2.0;
        let header_chars: String = out
            .glyphs
            .iter()
            .filter(|g| g.y == text_y)
            .map(|g| g.ch)
            .collect();
        assert!(header_chars.starts_with('+'));
        assert!(header_chars.contains("b.rs"));
        assert!(header_chars.contains("+1"));
        assert!(header_chars.contains("-0"));
    }

    #[test]
    fn selection_rect_spans_partial_and_full_lines() {
        let settings = DiffViewSettings::default();
        let mut state = test_state(&settings);
        state.selection_start = Some(GlobalTextPosition::new(1, 2));
        state.selection_end = Some(GlobalTextPosition::new(2, 4));
        let out = generate_all(&state, &settings);

        let text_origin = settings.layout.text_origin_x(&settings.font);
        let cw = settings.font.char_width;
        let sel: Vec<_> = out
            .rects
            .iter()
            .filter(|r| r.color == settings.theme.selection_background)
            .collect();
        assert_eq!(sel.len(), 2);
        // First line: from char 2 to half a cell past char 5 ("alpha")
        assert_eq!(sel[0].x, text_origin + 2.0 * cw);
        assert!((sel[0].width - 3.5 * cw).abs() < 1e-4);
        // Last line: chars 0..4 of "bravo"
        assert_eq!(sel[1].x, text_origin);
        assert!((sel[1].width - 4.0 * cw).abs() < 1e-4);
    }

    #[test]
    fn intraline_spans_render_highlight_rects() {
        let settings = DiffViewSettings::default();
        let mut diffs = vec![FileDiff::new(
            "a.rs",
            "rust",
            vec![DiffLine {
                kind: ChangeKind::Modified,
                old_line: Some(1),
                new_line: Some(1),
                text: "hello world".to_string(),
                change_spans: vec![6..11],
            }],
        )];
        let layout = rebuild(&diffs, &settings.layout.metrics(&settings.font));
        let state = DiffViewState {
            diffs: std::mem::take(&mut diffs),
            sections: layout.sections,
            lines: layout.lines,
            layout: layout.cache,
            ..Default::default()
        };
        let out = generate_all(&state, &settings);

        let text_origin = settings.layout.text_origin_x(&settings.font);
        let cw = settings.font.char_width;
        let hl = out
            .rects
            .iter()
            .find(|r| r.color == settings.theme.intraline_added)
            .unwrap();
        assert_eq!(hl.x, text_origin + 6.0 * cw);
        assert!((hl.width - 5.0 * cw).abs() < 1e-4);
    }
}
