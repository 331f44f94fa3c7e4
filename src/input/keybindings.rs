use bevy::prelude::*;
use leafwing_input_manager::prelude::*;

/// Viewer action that can be triggered by keybindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Actionlike)]
pub enum DiffViewAction {
    // Navigation
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,

    // Selection
    Copy,
    ClearSelection,
}

/// Create the default input map with all keybindings
pub fn default_input_map() -> InputMap<DiffViewAction> {
    let mut input_map = InputMap::default();

    // Navigation
    input_map.insert(DiffViewAction::PageUp, KeyCode::PageUp);
    input_map.insert(DiffViewAction::PageDown, KeyCode::PageDown);
    input_map.insert(
        DiffViewAction::ScrollToTop,
        ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::Home]),
    );
    input_map.insert(
        DiffViewAction::ScrollToBottom,
        ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::End]),
    );

    // Selection
    input_map.insert(
        DiffViewAction::Copy,
        ButtonlikeChord::new([KeyCode::ControlLeft, KeyCode::KeyC]),
    );
    input_map.insert(DiffViewAction::ClearSelection, KeyCode::Escape);

    input_map
}
