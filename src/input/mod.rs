//! Input handling: mouse scrolling and selection, keyboard actions

mod actions;
mod keybindings;
mod mouse;

pub use actions::{handle_actions, DiffViewInputManager};
pub use keybindings::{default_input_map, DiffViewAction};
pub use mouse::{handle_mouse_input, handle_mouse_wheel, MouseDragState};
