//! Scrolling behavior settings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Scrolling behavior
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct ScrollingSettings {
    /// Wheel delta multiplier
    pub speed: f32,

    /// Animate toward the target offset instead of snapping
    pub smooth_scrolling: bool,

    /// Exponential-approach rate for smooth scrolling (higher = snappier)
    pub smoothness: f32,
}

impl Default for ScrollingSettings {
    fn default() -> Self {
        Self {
            speed: 3.0,
            smooth_scrolling: true,
            smoothness: 12.0,
        }
    }
}
