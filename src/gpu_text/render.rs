//! GPU render plumbing: materials, shared quad state, atlas upload
//!
//! Visible content is drawn as two dynamic meshes rebuilt by the frame
//! systems: one mesh of colored quads (backgrounds, highlights, selection)
//! and one mesh of atlas-textured glyph quads. Per-instance color rides in
//! the vertex color attribute; the materials only multiply.

use bevy::prelude::*;
use bevy::render::render_resource::AsBindGroup;
use bevy::shader::ShaderRef;
use bevy::sprite_render::{AlphaMode2d, Material2d, Material2dPlugin};

use super::atlas::GlyphAtlas;
use crate::settings::DiffViewSettings;

/// Material for glyph quads sampling the atlas texture
#[derive(Asset, TypePath, AsBindGroup, Clone)]
pub struct TextMaterial {
    #[texture(0)]
    #[sampler(1, sampler_type = "filtering")]
    pub atlas_texture: Handle<Image>,

    /// Base color multiplier
    #[uniform(2)]
    pub color: LinearRgba,
}

impl Material2d for TextMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/diff_glyph.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode2d {
        AlphaMode2d::Blend
    }
}

/// Material for untextured colored quads
#[derive(Asset, TypePath, AsBindGroup, Clone)]
pub struct RectMaterial {
    /// Base color multiplier
    #[uniform(0)]
    pub color: LinearRgba,
}

impl Material2d for RectMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/diff_rect.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode2d {
        AlphaMode2d::Blend
    }
}

/// Handles shared by the frame systems
#[derive(Resource, Default)]
pub struct TextRenderState {
    pub text_material: Option<Handle<TextMaterial>>,
    pub rect_material: Option<Handle<RectMaterial>>,
}

/// Plugin registering the materials and creating the atlas
pub struct GpuTextPlugin;

impl Plugin for GpuTextPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            Material2dPlugin::<TextMaterial>::default(),
            Material2dPlugin::<RectMaterial>::default(),
        ))
        .init_resource::<TextRenderState>()
        .add_systems(Startup, setup_gpu_text);
        // update_atlas_texture runs from the main plugin's chain so it
        // executes after the frame systems populate the atlas
    }
}

/// Upload atlas changes to the GPU texture
pub fn update_atlas_texture(mut atlas: ResMut<GlyphAtlas>, mut images: ResMut<Assets<Image>>) {
    atlas.update_texture(&mut images);
}

fn setup_gpu_text(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut text_materials: ResMut<Assets<TextMaterial>>,
    mut rect_materials: ResMut<Assets<RectMaterial>>,
    mut render_state: ResMut<TextRenderState>,
    settings: Res<DiffViewSettings>,
) {
    let atlas = GlyphAtlas::new(&mut images, Some(&settings.font.family));

    render_state.text_material = Some(text_materials.add(TextMaterial {
        atlas_texture: atlas.texture.clone(),
        color: LinearRgba::WHITE,
    }));
    render_state.rect_material = Some(rect_materials.add(RectMaterial {
        color: LinearRgba::WHITE,
    }));

    commands.insert_resource(atlas);
}
