//! Performance tuning settings

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Tuning constants the layout pipeline reads every frame.
///
/// Both values are deliberately configuration rather than constants: the
/// right prefetch margin depends on scroll speed and row height, and the
/// right debounce on how bursty the host's re-diffing is.
#[derive(Clone, Debug, Resource, Serialize, Deserialize)]
pub struct PerformanceSettings {
    /// Rows added above and below the viewport when resolving the visible
    /// range, so fast scrolling doesn't reveal blank rows
    pub prefetch_rows: usize,

    /// Minimum interval (ms) between applied content rebuilds; newer
    /// payloads supersede queued ones
    pub rebuild_debounce_ms: f64,
}

impl Default for PerformanceSettings {
    fn default() -> Self {
        Self {
            prefetch_rows: 8,
            rebuild_debounce_ms: 16.0,
        }
    }
}
