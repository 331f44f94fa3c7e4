//! # Bevy Diff View
//!
//! GPU-accelerated, virtualized diff viewer plugin for Bevy.
//!
//! The host parses diffs and hands the view pre-parsed [`types::FileDiff`]
//! records via the [`events::SetDiffs`] message; the view lays them out as
//! one continuous document, renders only the visible rows, and handles
//! scrolling and text selection.
//!
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_diff_view::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(DiffViewPlugin::default())
//!         .add_systems(Startup, load_diffs)
//!         .run();
//! }
//!
//! fn load_diffs(mut set_diffs: MessageWriter<SetDiffs>) {
//!     set_diffs.write(SetDiffs {
//!         diffs: vec![FileDiff::new(
//!             "src/main.rs",
//!             "rust",
//!             vec![
//!                 DiffLine::unchanged(1, 1, "fn main() {"),
//!                 DiffLine::removed(2, "    old();"),
//!                 DiffLine::added(2, "    new();"),
//!             ],
//!         )],
//!     });
//! }
//! ```

pub mod coords;
pub mod events;
pub mod gpu_text;
pub mod input;
pub mod instances;
pub mod layout;
pub mod plugin;
pub mod selection;
pub mod settings;
pub mod surface;
pub mod syntax;
pub mod types;

pub mod prelude {
    //! Convenient re-exports for common usage
    pub use crate::events::*;
    pub use crate::input::*;
    pub use crate::plugin::{DiffViewPlugin, Scrollbar, ScrollbarPlugin};
    pub use crate::settings::*;
    pub use crate::syntax::{SyntaxColorLookup, SyntaxColors};
    pub use crate::types::*;
}
