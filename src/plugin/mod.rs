//! Bevy plugin for the GPU-accelerated diff view

mod frame;
mod scrollbar;

pub(crate) use frame::*;

pub use scrollbar::{Scrollbar, ScrollbarPlugin};

use bevy::prelude::*;
use leafwing_input_manager::prelude::{ActionState, InputManagerPlugin, InputMap};

use crate::events::{ContentRebuilt, ScrollToFile, SetDiffs};
use crate::gpu_text::GpuTextPlugin;
use crate::input::{DiffViewAction, DiffViewInputManager};
use crate::instances::InstanceBuffers;
use crate::settings::DiffViewSettings;
use crate::surface::SurfaceFrame;
use crate::syntax::{ColorCache, SyntaxColors};
use crate::types::{DiffViewState, ViewportDimensions};

/// Diff view plugin with GPU-accelerated text rendering
///
/// # Example
/// ```ignore
/// use bevy::prelude::*;
/// use bevy_diff_view::prelude::*;
///
/// App::new()
///     .add_plugins(DefaultPlugins)
///     .add_plugins(DiffViewPlugin::default())
///     .run();
/// ```
pub struct DiffViewPlugin {
    settings: DiffViewSettings,
    input_map: InputMap<DiffViewAction>,
}

impl DiffViewPlugin {
    /// Create a plugin with the given keybindings
    pub fn new(input_map: InputMap<DiffViewAction>) -> Self {
        Self {
            settings: DiffViewSettings::default(),
            input_map,
        }
    }

    /// Set custom view settings
    pub fn with_settings(mut self, settings: DiffViewSettings) -> Self {
        self.settings = settings;
        self
    }
}

impl Default for DiffViewPlugin {
    fn default() -> Self {
        Self::new(crate::input::default_input_map())
    }
}

/// Resource to hold the configured input map until it is spawned
#[derive(Resource)]
struct PendingInputMap(InputMap<DiffViewAction>);

impl Plugin for DiffViewPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(self.settings.theme.background));
        app.insert_resource(self.settings.clone());
        app.insert_resource(DiffViewState::default());
        app.insert_resource(ViewportDimensions::default());
        app.insert_resource(SurfaceFrame::default());
        app.insert_resource(InstanceBuffers::default());
        app.insert_resource(crate::input::MouseDragState::default());
        app.init_resource::<SyntaxColors>();
        app.init_resource::<ColorCache>();

        app.add_message::<SetDiffs>();
        app.add_message::<ScrollToFile>();
        app.add_message::<ContentRebuilt>();

        app.insert_resource(PendingInputMap(self.input_map.clone()));
        app.add_plugins(InputManagerPlugin::<DiffViewAction>::default());

        app.add_plugins(GpuTextPlugin);
        app.add_plugins(ScrollbarPlugin);

        app.add_systems(
            Startup,
            (init_viewport_from_window, spawn_input_manager, setup).chain(),
        );

        app.add_systems(
            Update,
            (
                crate::input::handle_mouse_input,
                crate::input::handle_mouse_wheel,
                crate::input::handle_actions,
                detect_viewport_resize,
                apply_content_updates,
                handle_scroll_to_file,
                animate_smooth_scroll,
                reconcile_surface,
            )
                .chain(),
        );
        app.add_systems(
            Update,
            (update_diff_display, crate::gpu_text::update_atlas_texture)
                .chain()
                .after(reconcile_surface),
        );
    }
}

/// Spawn the input manager entity with the configured keybindings. Users
/// can query and modify the `InputMap` component at runtime.
fn spawn_input_manager(mut commands: Commands, pending: Res<PendingInputMap>) {
    commands.spawn((
        DiffViewInputManager,
        pending.0.clone(),
        ActionState::<DiffViewAction>::default(),
        Name::new("DiffViewInputManager"),
    ));
}

/// Initialize viewport dimensions from the actual window size
fn init_viewport_from_window(mut viewport: ResMut<ViewportDimensions>, windows: Query<&Window>) {
    if let Some(window) = windows.iter().next() {
        viewport.width = window.resolution.width() as u32;
        viewport.height = window.resolution.height() as u32;
    }
}

/// Detect viewport resize and trigger a full regeneration
fn detect_viewport_resize(
    mut viewport: ResMut<ViewportDimensions>,
    windows: Query<&Window>,
    mut state: ResMut<DiffViewState>,
) {
    if let Some(window) = windows.iter().next() {
        let new_width = window.resolution.width() as u32;
        let new_height = window.resolution.height() as u32;

        if viewport.width != new_width || viewport.height != new_height {
            viewport.width = new_width;
            viewport.height = new_height;
            state.needs_update = true;
        }
    }
}

fn setup(mut commands: Commands, settings: Res<DiffViewSettings>) {
    // 2D camera with 1:1 pixel mapping
    commands.spawn((
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0,
            ..OrthographicProjection::default_2d()
        }),
        Camera {
            clear_color: ClearColorConfig::Custom(settings.theme.background),
            ..default()
        },
        Name::new("DiffViewCamera"),
    ));
}
