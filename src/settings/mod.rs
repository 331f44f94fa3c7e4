//! Modular settings system for the diff view
//!
//! Each concern has its own settings struct; `DiffViewSettings` bundles them
//! into the single resource the systems read. Use `DiffViewSettingsBuilder`
//! for convenient initialization.

mod core;
mod layout;
mod performance;
mod scrollbar;
mod scrolling;

pub use core::*;
pub use layout::*;
pub use performance::*;
pub use scrollbar::*;
pub use scrolling::*;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// All view settings, inserted as one resource by `DiffViewPlugin`
#[derive(Clone, Debug, Default, Resource, Serialize, Deserialize)]
pub struct DiffViewSettings {
    pub font: FontSettings,
    pub theme: ThemeSettings,
    pub layout: LayoutSettings,
    pub scrolling: ScrollingSettings,
    pub scrollbar: ScrollbarSettings,
    pub performance: PerformanceSettings,
}

/// Builder for configuring all settings at once
///
/// # Example
/// ```no_run
/// use bevy_diff_view::settings::DiffViewSettingsBuilder;
///
/// let settings = DiffViewSettingsBuilder::default()
///     .font_size(16.0)
///     .prefetch_rows(12)
///     .build();
/// ```
#[derive(Default)]
pub struct DiffViewSettingsBuilder {
    settings: DiffViewSettings,
}

impl DiffViewSettingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the font size; character width and line height follow the
    /// monospace ratios
    pub fn font_size(mut self, size: f32) -> Self {
        self.settings.font.size = size;
        self.settings.font.char_width = size * 0.6;
        self.settings.font.line_height = size * 1.5;
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.settings.font.family = family.into();
        self
    }

    pub fn theme(mut self, theme: ThemeSettings) -> Self {
        self.settings.theme = theme;
        self
    }

    pub fn header_height(mut self, height: f32) -> Self {
        self.settings.layout.header_height = height;
        self
    }

    pub fn spacer_height(mut self, height: f32) -> Self {
        self.settings.layout.spacer_height = height;
        self
    }

    pub fn prefetch_rows(mut self, rows: usize) -> Self {
        self.settings.performance.prefetch_rows = rows;
        self
    }

    pub fn rebuild_debounce_ms(mut self, ms: f64) -> Self {
        self.settings.performance.rebuild_debounce_ms = ms;
        self
    }

    pub fn smooth_scrolling(mut self, enabled: bool) -> Self {
        self.settings.scrolling.smooth_scrolling = enabled;
        self
    }

    pub fn scrollbar(mut self, scrollbar: ScrollbarSettings) -> Self {
        self.settings.scrollbar = scrollbar;
        self
    }

    pub fn build(self) -> DiffViewSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_keeps_monospace_ratios() {
        let settings = DiffViewSettingsBuilder::new().font_size(20.0).build();
        assert_eq!(settings.font.char_width, 12.0);
        assert_eq!(settings.font.line_height, 30.0);
    }

    #[test]
    fn gutter_width_covers_both_number_columns() {
        let settings = DiffViewSettings::default();
        let gutter = settings.layout.gutter_width(&settings.font);
        let col = settings.layout.number_column_width(&settings.font);
        assert!(gutter > 2.0 * col);
        assert!(settings.layout.text_origin_x(&settings.font) > gutter);
    }
}
