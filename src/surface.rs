//! Surface/scroll reconciliation
//!
//! The renderable surface is always sized to the viewport, never to the
//! document: logical content height is unbounded (it only drives the
//! scrollbar), while GPU texture dimensions have a hard platform ceiling.
//! Reconciliation repositions the viewport-sized surface so its top edge
//! tracks the scroll offset, and must run before instance generation in any
//! frame where scroll or viewport changed.

use bevy::prelude::*;

/// Maximum renderable texture dimension on mainstream hardware. The surface
/// never approaches this because its height equals the viewport height, but
/// the clamp makes the invariant explicit.
pub const MAX_SURFACE_DIMENSION: f32 = 16384.0;

/// Placement of the bounded rendering surface within the document
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq)]
pub struct SurfaceFrame {
    /// Document-space Y of the surface's top edge (the clamped scroll offset)
    pub top: f32,
    /// Surface height; equals viewport height, capped by the hardware limit
    pub height: f32,
}

/// Compute the surface frame for the current scroll and viewport.
///
/// The scroll offset is clamped to `[0, max(0, total - height)]` so the
/// surface never extends past either end of the document.
pub fn reconcile(scroll_y: f32, viewport_height: f32, total_height: f32) -> SurfaceFrame {
    let height = viewport_height.clamp(0.0, MAX_SURFACE_DIMENSION);
    let max_scroll = (total_height - height).max(0.0);
    SurfaceFrame {
        top: scroll_y.clamp(0.0, max_scroll),
        height,
    }
}
