//! Mouse input: wheel scrolling and drag selection

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::selection::position_at;
use crate::settings::DiffViewSettings;
use crate::types::{DiffViewState, GlobalTextPosition, ViewportDimensions};

/// Mouse drag state for selection
#[derive(Resource, Default)]
pub struct MouseDragState {
    /// Whether a drag is in progress
    pub is_dragging: bool,
    /// Position where the drag started
    pub drag_anchor: Option<GlobalTextPosition>,
}

/// Cursor position in device space, if it is over the view
fn cursor_device_position(
    window_query: &Query<&Window, With<PrimaryWindow>>,
    viewport: &ViewportDimensions,
) -> Option<Vec2> {
    let cursor = window_query.iter().next()?.cursor_position()?;
    let device = Vec2::new(cursor.x - viewport.offset_x, cursor.y);
    let in_view = device.x >= 0.0
        && device.x <= viewport.width as f32
        && device.y >= 0.0
        && device.y <= viewport.height as f32;
    in_view.then_some(device)
}

/// Press anchors a selection, drag extends it, release ends the drag
pub fn handle_mouse_input(
    mut state: ResMut<DiffViewState>,
    mut drag_state: ResMut<MouseDragState>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    settings: Res<DiffViewSettings>,
    viewport: Res<ViewportDimensions>,
) {
    let device = cursor_device_position(&window_query, &viewport);

    if mouse_button.just_pressed(MouseButton::Left) {
        if let Some(device) = device {
            let pos = position_at(&state, &settings, device);
            drag_state.is_dragging = true;
            drag_state.drag_anchor = Some(pos);
            // A fresh click collapses any existing selection
            state.clear_selection();
            state.needs_update = true;
        }
    }

    if mouse_button.just_released(MouseButton::Left) {
        drag_state.is_dragging = false;
        drag_state.drag_anchor = None;
    }

    if drag_state.is_dragging && mouse_button.pressed(MouseButton::Left) {
        if let (Some(device), Some(anchor)) = (device, drag_state.drag_anchor) {
            let current = position_at(&state, &settings, device);
            if state.selection_end != Some(current) {
                state.selection_start = Some(anchor);
                state.selection_end = Some(current);
                state.needs_update = true;
            }
        }
    }
}

/// Wheel scrolling. Vertical always; horizontal only when the widest line
/// overflows the text area. Smooth scrolling moves the targets and lets
/// the animation system chase them.
pub fn handle_mouse_wheel(
    mut state: ResMut<DiffViewState>,
    mut mouse_wheel_events: MessageReader<MouseWheel>,
    settings: Res<DiffViewSettings>,
    viewport: Res<ViewportDimensions>,
) {
    for event in mouse_wheel_events.read() {
        let mut scrolled = false;
        let use_smooth = settings.scrolling.smooth_scrolling;

        if event.x.abs() > 0.0 {
            let text_area = viewport.width as f32 - settings.layout.text_origin_x(&settings.font);
            let content_width = state.max_line_chars as f32 * settings.font.char_width;

            if content_width > text_area {
                let scroll_delta = event.x * settings.font.char_width * settings.scrolling.speed;
                let max_scroll_x = content_width - text_area;

                if use_smooth {
                    state.target_scroll_x =
                        (state.target_scroll_x + scroll_delta).clamp(0.0, max_scroll_x);
                } else {
                    state.scroll_x = (state.scroll_x + scroll_delta).clamp(0.0, max_scroll_x);
                    state.target_scroll_x = state.scroll_x;
                }
                scrolled = true;
            }
        }

        if event.y.abs() > 0.0 {
            // Wheel up (positive y) moves toward the document top
            let scroll_delta = event.y * settings.font.line_height * settings.scrolling.speed;
            let max_scroll = state.max_scroll(viewport.height as f32);

            if use_smooth {
                state.target_scroll_y =
                    (state.target_scroll_y - scroll_delta).clamp(0.0, max_scroll);
            } else {
                state.scroll_y = (state.scroll_y - scroll_delta).clamp(0.0, max_scroll);
                state.target_scroll_y = state.scroll_y;
            }
            scrolled = true;
        }

        if scrolled {
            state.needs_scroll_update = true;
        }
    }
}
