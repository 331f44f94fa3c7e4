//! Scrollbar appearance settings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Scrollbar appearance
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct ScrollbarSettings {
    /// Show the scrollbar when content overflows the viewport
    pub enabled: bool,

    /// Track width in pixels
    pub width: f32,

    /// Minimum thumb height in pixels
    pub min_thumb_height: f32,

    /// Track color
    pub background_color: Color,

    /// Thumb color
    pub thumb_color: Color,
}

impl Default for ScrollbarSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 10.0,
            min_thumb_height: 30.0,
            background_color: Color::srgba(0.2, 0.2, 0.2, 0.3),
            thumb_color: Color::srgba(0.5, 0.5, 0.5, 0.6),
        }
    }
}
