//! Core view settings: Font and Theme

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Font settings - shared across all text rendering.
///
/// The view assumes a monospaced grid: `char_width` is the advance used for
/// every glyph in layout and hit testing, regardless of what the atlas
/// rasterizes.
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct FontSettings {
    /// Font family name for cosmic-text matching
    pub family: String,

    /// Font size in pixels
    pub size: f32,

    /// Monospace character advance in pixels
    pub char_width: f32,

    /// Line height in pixels
    pub line_height: f32,
}

impl Default for FontSettings {
    fn default() -> Self {
        let size = 14.0;
        Self {
            family: "Fira Mono".to_string(),
            size,
            char_width: size * 0.6,
            line_height: size * 1.5,
        }
    }
}

impl FontSettings {
    /// Baseline offset from the top of a row, matching the atlas placement
    pub fn baseline_offset(&self) -> f32 {
        self.line_height * 0.75
    }
}

/// Theme settings - colors for every primitive the view emits
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct ThemeSettings {
    /// Background color
    pub background: Color,

    /// Default text color
    pub foreground: Color,

    /// File header row background
    pub header_background: Color,

    /// File header text color
    pub header_foreground: Color,

    /// Added-line count color in headers
    pub added_count: Color,

    /// Removed-line count color in headers
    pub removed_count: Color,

    /// Added line background tint
    pub added_background: Color,

    /// Removed line background tint
    pub removed_background: Color,

    /// Modified line background tint
    pub modified_background: Color,

    /// Intra-line change highlight over added/modified text
    pub intraline_added: Color,

    /// Intra-line change highlight over removed text
    pub intraline_removed: Color,

    /// Selection background
    pub selection_background: Color,

    /// Gutter (line-number area) background
    pub gutter_background: Color,

    /// Line-number text color
    pub line_numbers: Color,

    /// Gutter separator line color
    pub separator: Color,
}

impl ThemeSettings {
    /// Dark theme in the familiar editor palette
    pub fn dark() -> Self {
        Self {
            background: Color::srgb(0.117, 0.117, 0.117),
            foreground: Color::srgb(0.83, 0.83, 0.83),
            header_background: Color::srgb(0.16, 0.17, 0.19),
            header_foreground: Color::srgb(0.9, 0.9, 0.9),
            added_count: Color::srgb(0.45, 0.78, 0.45),
            removed_count: Color::srgb(0.9, 0.45, 0.45),
            added_background: Color::srgba(0.2, 0.55, 0.25, 0.22),
            removed_background: Color::srgba(0.75, 0.25, 0.25, 0.22),
            modified_background: Color::srgba(0.75, 0.65, 0.2, 0.16),
            intraline_added: Color::srgba(0.25, 0.7, 0.3, 0.4),
            intraline_removed: Color::srgba(0.85, 0.3, 0.3, 0.4),
            selection_background: Color::srgba(0.25, 0.45, 0.8, 0.35),
            gutter_background: Color::srgb(0.135, 0.135, 0.135),
            line_numbers: Color::srgb(0.45, 0.45, 0.45),
            separator: Color::srgb(0.25, 0.25, 0.25),
        }
    }
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self::dark()
    }
}
