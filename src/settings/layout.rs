//! Layout metric settings: header, spacer, and gutter geometry

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::layout::LayoutMetrics;
use crate::settings::FontSettings;

/// Fixed geometry of the diff layout
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct LayoutSettings {
    /// File header row height
    pub header_height: f32,

    /// Height of one inter-section spacer row
    pub spacer_height: f32,

    /// Number of spacer rows between consecutive sections
    pub spacer_rows: usize,

    /// Characters reserved per line-number column (old and new)
    pub number_column_chars: usize,

    /// Horizontal padding inside the gutter, each side of the number columns
    pub gutter_padding: f32,

    /// Gap between the gutter separator and the first text column
    pub content_padding: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            header_height: 35.0,
            spacer_height: 16.0,
            spacer_rows: 1,
            number_column_chars: 5,
            gutter_padding: 8.0,
            content_padding: 8.0,
        }
    }
}

impl LayoutSettings {
    /// Width of one line-number column
    pub fn number_column_width(&self, font: &FontSettings) -> f32 {
        self.number_column_chars as f32 * font.char_width
    }

    /// Total gutter width: padding, old column, gap, new column, padding
    pub fn gutter_width(&self, font: &FontSettings) -> f32 {
        self.gutter_padding * 2.0 + self.number_column_width(font) * 2.0 + font.char_width
    }

    /// Device-space X where body text starts (the selection model divides
    /// from this same origin, keeping hit testing and rendering aligned)
    pub fn text_origin_x(&self, font: &FontSettings) -> f32 {
        self.gutter_width(font) + self.content_padding
    }

    /// Row-height constants for a layout pass
    pub fn metrics(&self, font: &FontSettings) -> LayoutMetrics {
        LayoutMetrics {
            header_height: self.header_height,
            line_height: font.line_height,
            spacer_height: self.spacer_height,
            spacer_rows: self.spacer_rows,
        }
    }
}
