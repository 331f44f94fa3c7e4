//! Selection model
//!
//! Maps device coordinates to global (line, character) positions and
//! extracts text across section boundaries. Positions are only meaningful
//! against the current `GlobalLine` sequence; the view clears both selection
//! endpoints on every content rebuild.

use bevy::prelude::*;

use crate::coords::to_document;
use crate::settings::DiffViewSettings;
use crate::types::{DiffViewState, GlobalTextPosition};

/// Resolve a device-space point to a global text position.
///
/// Adds the scroll offset to recover document space, resolves the row via
/// the layout cache, then divides the X distance from the text origin by the
/// monospace advance. Everything clamps: points in the gutter resolve to
/// character 0, points past the end of a line to its character count, and
/// header/spacer rows (which carry no text) to character 0.
pub fn position_at(
    state: &DiffViewState,
    settings: &DiffViewSettings,
    device_point: Vec2,
) -> GlobalTextPosition {
    let doc = to_document(device_point, Vec2::new(0.0, state.scroll_y));
    let line = state.layout.line_index(doc.y);

    let char_count = state.diff_line(line).map(|l| l.char_count()).unwrap_or(0);
    let text_x = device_point.x + state.scroll_x - settings.layout.text_origin_x(&settings.font);
    let character = if text_x <= 0.0 {
        0
    } else {
        (text_x / settings.font.char_width) as usize
    };

    GlobalTextPosition::new(line, character.min(char_count))
}

/// Extract the text between two positions (inclusive of both lines).
///
/// Positions must already be ordered; `DiffViewState::ordered_selection`
/// does that. Diff rows contribute their (possibly partial) text;
/// header and spacer rows contribute nothing. Contributing lines are joined
/// with newlines.
pub fn extract_text(state: &DiffViewState, from: GlobalTextPosition, to: GlobalTextPosition) -> String {
    if state.lines.is_empty() {
        return String::new();
    }
    let last = state.lines.len() - 1;
    let (start_line, end_line) = (from.line.min(last), to.line.min(last));

    let mut parts: Vec<String> = Vec::new();
    for line in start_line..=end_line {
        let Some(diff_line) = state.diff_line(line) else {
            continue; // header or spacer row
        };
        let count = diff_line.char_count();
        let begin = if line == start_line { from.character.min(count) } else { 0 };
        let end = if line == end_line { to.character.min(count) } else { count };
        if begin > end {
            continue;
        }
        parts.push(diff_line.text.chars().skip(begin).take(end - begin).collect());
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{rebuild, LayoutMetrics};
    use crate::types::{DiffLine, FileDiff};

    fn state_with(diffs: Vec<FileDiff>, settings: &DiffViewSettings) -> DiffViewState {
        let metrics: LayoutMetrics = settings.layout.metrics(&settings.font);
        let layout = rebuild(&diffs, &metrics);
        DiffViewState {
            diffs,
            sections: layout.sections,
            lines: layout.lines,
            layout: layout.cache,
            ..Default::default()
        }
    }

    fn two_file_state(settings: &DiffViewSettings) -> DiffViewState {
        state_with(
            vec![
                FileDiff::new(
                    "a.rs",
                    "rust",
                    vec![
                        DiffLine::unchanged(1, 1, "alpha"),   // global 1
                        DiffLine::added(2, "bravo charlie"),  // global 2
                    ],
                ),
                FileDiff::new(
                    "b.rs",
                    "rust",
                    vec![DiffLine::removed(1, "delta")], // global 5 (3 spacer, 4 header)
                ),
            ],
            settings,
        )
    }

    #[test]
    fn position_round_trips_through_cell_geometry() {
        let settings = DiffViewSettings::default();
        let state = two_file_state(&settings);

        // Center of character 3 on global line 2
        let (row_top, _) = state.layout.y_range(2);
        let x = settings.layout.text_origin_x(&settings.font)
            + 3.0 * settings.font.char_width
            + settings.font.char_width / 2.0;
        let y = row_top - state.scroll_y + settings.font.line_height / 2.0;
        let pos = position_at(&state, &settings, Vec2::new(x, y));
        assert_eq!(pos, GlobalTextPosition::new(2, 3));
    }

    #[test]
    fn position_accounts_for_scroll() {
        let settings = DiffViewSettings::default();
        let mut state = two_file_state(&settings);
        let (row_top, _) = state.layout.y_range(5);
        state.scroll_y = row_top; // line 5 now at the viewport top

        let x = settings.layout.text_origin_x(&settings.font) + 0.1;
        let pos = position_at(&state, &settings, Vec2::new(x, 1.0));
        assert_eq!(pos.line, 5);
        assert_eq!(pos.character, 0);
    }

    #[test]
    fn position_clamps_gutter_and_line_end() {
        let settings = DiffViewSettings::default();
        let state = two_file_state(&settings);
        let (row_top, _) = state.layout.y_range(1); // "alpha", 5 chars

        let in_gutter = position_at(&state, &settings, Vec2::new(2.0, row_top + 1.0));
        assert_eq!(in_gutter, GlobalTextPosition::new(1, 0));

        let past_end = position_at(&state, &settings, Vec2::new(5_000.0, row_top + 1.0));
        assert_eq!(past_end, GlobalTextPosition::new(1, 5));
    }

    #[test]
    fn extract_skips_header_and_spacer_rows() {
        let settings = DiffViewSettings::default();
        let state = two_file_state(&settings);

        // From (2, 6) through (5, 5): line 2 partial, rows 3-4 are
        // spacer/header and contribute nothing, line 5 fully
        let text = extract_text(
            &state,
            GlobalTextPosition::new(2, 6),
            GlobalTextPosition::new(5, 5),
        );
        assert_eq!(text, "charlie\ndelta");
    }

    #[test]
    fn extract_within_one_line() {
        let settings = DiffViewSettings::default();
        let state = two_file_state(&settings);
        let text = extract_text(
            &state,
            GlobalTextPosition::new(2, 6),
            GlobalTextPosition::new(2, 13),
        );
        assert_eq!(text, "charlie");
    }

    #[test]
    fn extract_on_header_only_is_empty() {
        let settings = DiffViewSettings::default();
        let state = two_file_state(&settings);
        let text = extract_text(
            &state,
            GlobalTextPosition::new(0, 0),
            GlobalTextPosition::new(0, 3),
        );
        assert_eq!(text, "");
    }
}
