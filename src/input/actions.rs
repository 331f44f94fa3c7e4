//! Keyboard action handling

use bevy::prelude::*;
use leafwing_input_manager::prelude::ActionState;

use super::keybindings::DiffViewAction;
use crate::settings::DiffViewSettings;
use crate::types::{DiffViewState, ViewportDimensions};

/// Marker component for the view's input manager entity
#[derive(Component)]
pub struct DiffViewInputManager;

/// Apply triggered keyboard actions to the view state
pub fn handle_actions(
    action_query: Query<&ActionState<DiffViewAction>, With<DiffViewInputManager>>,
    mut state: ResMut<DiffViewState>,
    settings: Res<DiffViewSettings>,
    viewport: Res<ViewportDimensions>,
) {
    let Ok(action_state) = action_query.single() else {
        return;
    };

    let viewport_height = viewport.height as f32;
    let max_scroll = state.max_scroll(viewport_height);
    // Scroll a page minus one line of overlap for continuity
    let page = (viewport_height - settings.font.line_height).max(settings.font.line_height);

    if action_state.just_pressed(&DiffViewAction::PageUp) {
        state.target_scroll_y = (state.target_scroll_y - page).clamp(0.0, max_scroll);
        state.needs_scroll_update = true;
    }
    if action_state.just_pressed(&DiffViewAction::PageDown) {
        state.target_scroll_y = (state.target_scroll_y + page).clamp(0.0, max_scroll);
        state.needs_scroll_update = true;
    }
    if action_state.just_pressed(&DiffViewAction::ScrollToTop) {
        state.target_scroll_y = 0.0;
        state.needs_scroll_update = true;
    }
    if action_state.just_pressed(&DiffViewAction::ScrollToBottom) {
        state.target_scroll_y = max_scroll;
        state.needs_scroll_update = true;
    }

    if action_state.just_pressed(&DiffViewAction::Copy) {
        copy_selection(&state);
    }
    if action_state.just_pressed(&DiffViewAction::ClearSelection) && state.selection_start.is_some()
    {
        state.clear_selection();
        state.needs_update = true;
    }
}

#[cfg(feature = "clipboard")]
fn copy_selection(state: &DiffViewState) {
    let Some(text) = state.selected_text() else {
        return;
    };
    if text.is_empty() {
        return;
    }
    match arboard::Clipboard::new() {
        Ok(mut clipboard) => {
            if let Err(e) = clipboard.set_text(text) {
                warn!("failed to write clipboard: {e}");
            }
        }
        Err(e) => warn!("clipboard unavailable: {e}"),
    }
}

#[cfg(not(feature = "clipboard"))]
fn copy_selection(_state: &DiffViewState) {}
