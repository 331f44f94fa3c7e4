//! Coordinate conversions
//!
//! Three spaces are in play: document space (absolute content Y, grows
//! downward, unbounded), device space (viewport-relative pixels, origin at
//! the viewport's top-left), and Bevy world space (center origin, Y up).
//! Every conversion lives here; geometry code elsewhere never assumes an
//! orientation ambient to the platform.

use bevy::prelude::*;

/// Document space -> device space. Subtracting the scroll offset is the only
/// place scroll position enters geometry.
pub fn to_device(doc: Vec2, scroll: Vec2) -> Vec2 {
    doc - scroll
}

/// Device space -> document space
pub fn to_document(device: Vec2, scroll: Vec2) -> Vec2 {
    device + scroll
}

/// Device space (top-left origin, Y down) -> Bevy world space (center
/// origin, Y up) for the given viewport.
pub fn device_to_world(device: Vec2, viewport_width: f32, viewport_height: f32, offset_x: f32) -> Vec3 {
    Vec3::new(
        device.x - viewport_width / 2.0 + offset_x,
        viewport_height / 2.0 - device.y,
        0.0,
    )
}
