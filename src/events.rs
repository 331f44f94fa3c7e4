//! Messages forming the host-facing interface
//!
//! The host drives the view by writing `SetDiffs` and `ScrollToFile`; the
//! view reports applied rebuilds back through `ContentRebuilt`.

use bevy::prelude::*;

use crate::types::FileDiff;

/// Replace the entire diff content. Writes are debounced; when several
/// arrive within the debounce window only the newest is applied.
#[derive(Message, Clone, Debug)]
pub struct SetDiffs {
    pub diffs: Vec<FileDiff>,
}

/// Scroll so the named file's header sits at the top of the viewport.
/// Unknown identifiers are ignored with a debug log.
#[derive(Message, Clone, Debug)]
pub struct ScrollToFile {
    pub file_id: String,
}

/// Emitted after a content rebuild has been applied
#[derive(Message, Clone, Copy, Debug)]
pub struct ContentRebuilt {
    /// New total document height
    pub total_height: f32,
    /// New global row count
    pub line_count: usize,
}
