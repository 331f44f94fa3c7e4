//! Vertical scrollbar: track and thumb sprites plus thumb dragging

use bevy::prelude::*;

use crate::settings::DiffViewSettings;
use crate::types::{DiffViewState, ViewportDimensions};

/// Scrollbar plugin - manages scrollbar rendering and interaction
pub struct ScrollbarPlugin;

impl Plugin for ScrollbarPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ScrollbarDragState::default());
        // Runs after the scroll offset has been clamped for this frame
        app.add_systems(
            Update,
            (sync_scrollbar, handle_scrollbar_mouse, update_scrollbar_sprites)
                .chain()
                .after(super::reconcile_surface),
        );
    }
}

/// Resource to track scrollbar drag state
#[derive(Resource, Default)]
pub struct ScrollbarDragState {
    /// Whether the thumb is being dragged
    pub is_dragging: bool,
    /// Window-space Y where the drag started
    pub drag_start_y: f32,
    /// Scroll offset when the drag started
    pub drag_start_scroll: f32,
}

/// Component holding the scrollbar geometry, recomputed every frame from
/// the view state
#[derive(Component, Default)]
pub struct Scrollbar {
    /// X position in world coordinates
    pub x: f32,
    /// Track height (equals the viewport height)
    pub track_height: f32,
    /// Visible fraction (0.0-1.0), determines thumb size
    pub visible_fraction: f32,
    /// Scroll progress (0.0-1.0)
    pub scroll_progress: f32,
    /// Whether the scrollbar is shown
    pub enabled: bool,
}

impl Scrollbar {
    fn thumb_height(&self, min_thumb_height: f32) -> f32 {
        (self.visible_fraction * self.track_height).max(min_thumb_height)
    }
}

/// Marker for the scrollbar track sprite
#[derive(Component)]
struct ScrollbarTrack;

/// Marker for the scrollbar thumb sprite
#[derive(Component)]
struct ScrollbarThumb;

/// Derive the scrollbar geometry from the current scroll state
fn sync_scrollbar(
    mut commands: Commands,
    state: Res<DiffViewState>,
    settings: Res<DiffViewSettings>,
    viewport: Res<ViewportDimensions>,
    mut scrollbar_query: Query<&mut Scrollbar>,
) {
    let viewport_height = viewport.height as f32;
    let total_height = state.total_height();
    let max_scroll = state.max_scroll(viewport_height);

    let enabled = settings.scrollbar.enabled && total_height > viewport_height;
    let x = viewport.width as f32 / 2.0 - settings.scrollbar.width / 2.0;
    let visible_fraction = if total_height > 0.0 {
        (viewport_height / total_height).min(1.0)
    } else {
        1.0
    };
    let scroll_progress = if max_scroll > 0.0 {
        (state.scroll_y / max_scroll).clamp(0.0, 1.0)
    } else {
        0.0
    };

    if let Ok(mut scrollbar) = scrollbar_query.single_mut() {
        scrollbar.x = x;
        scrollbar.track_height = viewport_height;
        scrollbar.visible_fraction = visible_fraction;
        scrollbar.scroll_progress = scroll_progress;
        scrollbar.enabled = enabled;
    } else {
        commands.spawn((
            Scrollbar {
                x,
                track_height: viewport_height,
                visible_fraction,
                scroll_progress,
                enabled,
            },
            Name::new("DiffScrollbar"),
        ));
    }
}

/// Drag the thumb to scroll. Works in window coordinates so the math is a
/// direct proportion between thumb travel and scroll range.
fn handle_scrollbar_mouse(
    windows: Query<&Window>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut drag_state: ResMut<ScrollbarDragState>,
    mut state: ResMut<DiffViewState>,
    settings: Res<DiffViewSettings>,
    viewport: Res<ViewportDimensions>,
    scrollbar_query: Query<&Scrollbar>,
) {
    if mouse_button.just_released(MouseButton::Left) {
        drag_state.is_dragging = false;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(scrollbar) = scrollbar_query.single() else {
        return;
    };
    if !scrollbar.enabled {
        return;
    }

    let viewport_height = viewport.height as f32;
    let max_scroll = state.max_scroll(viewport_height);
    let thumb_height = scrollbar.thumb_height(settings.scrollbar.min_thumb_height);
    let scrollable_range = scrollbar.track_height - thumb_height;
    if scrollable_range <= 0.0 || max_scroll <= 0.0 {
        return;
    }

    if mouse_button.just_pressed(MouseButton::Left) {
        let track_left = window.width() - settings.scrollbar.width;
        let thumb_top = scrollbar.scroll_progress * scrollable_range;
        let over_thumb = cursor.x >= track_left
            && cursor.y >= thumb_top
            && cursor.y <= thumb_top + thumb_height;
        if over_thumb {
            drag_state.is_dragging = true;
            drag_state.drag_start_y = cursor.y;
            drag_state.drag_start_scroll = state.scroll_y;
        }
    }

    if drag_state.is_dragging && mouse_button.pressed(MouseButton::Left) {
        let delta_y = cursor.y - drag_state.drag_start_y;
        let new_scroll =
            (drag_state.drag_start_scroll + (delta_y / scrollable_range) * max_scroll)
                .clamp(0.0, max_scroll);

        // Thumb dragging wants immediate response, so move both offsets
        state.scroll_y = new_scroll;
        state.target_scroll_y = new_scroll;
        state.needs_scroll_update = true;
    }
}

/// Spawn-or-update the track and thumb sprites from the geometry component
fn update_scrollbar_sprites(
    mut commands: Commands,
    settings: Res<DiffViewSettings>,
    scrollbar_query: Query<&Scrollbar>,
    mut track_query: Query<
        (&mut Transform, &mut Sprite, &mut Visibility),
        (With<ScrollbarTrack>, Without<ScrollbarThumb>),
    >,
    mut thumb_query: Query<
        (&mut Transform, &mut Sprite, &mut Visibility),
        (With<ScrollbarThumb>, Without<ScrollbarTrack>),
    >,
) {
    let Ok(scrollbar) = scrollbar_query.single() else {
        return;
    };

    let thumb_height = scrollbar.thumb_height(settings.scrollbar.min_thumb_height);
    let scrollable_range = scrollbar.track_height - thumb_height;
    let thumb_offset = scrollbar.scroll_progress * scrollable_range;
    let thumb_y = scrollbar.track_height / 2.0 - thumb_offset - thumb_height / 2.0;
    let visibility = if scrollbar.enabled {
        Visibility::Visible
    } else {
        Visibility::Hidden
    };

    if let Ok((mut transform, mut sprite, mut vis)) = track_query.single_mut() {
        sprite.custom_size = Some(Vec2::new(settings.scrollbar.width, scrollbar.track_height));
        transform.translation = Vec3::new(scrollbar.x, 0.0, 10.0);
        *vis = visibility;
    } else {
        commands.spawn((
            Sprite {
                color: settings.scrollbar.background_color,
                custom_size: Some(Vec2::new(settings.scrollbar.width, scrollbar.track_height)),
                ..default()
            },
            Transform::from_translation(Vec3::new(scrollbar.x, 0.0, 10.0)),
            ScrollbarTrack,
            Name::new("ScrollbarTrack"),
            visibility,
        ));
    }

    if let Ok((mut transform, mut sprite, mut vis)) = thumb_query.single_mut() {
        sprite.custom_size = Some(Vec2::new(settings.scrollbar.width, thumb_height));
        transform.translation = Vec3::new(scrollbar.x, thumb_y, 10.1);
        *vis = visibility;
    } else {
        commands.spawn((
            Sprite {
                color: settings.scrollbar.thumb_color,
                custom_size: Some(Vec2::new(settings.scrollbar.width, thumb_height)),
                ..default()
            },
            Transform::from_translation(Vec3::new(scrollbar.x, thumb_y, 10.1)),
            ScrollbarThumb,
            Name::new("ScrollbarThumb"),
            visibility,
        ));
    }
}
