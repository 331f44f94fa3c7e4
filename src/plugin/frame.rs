//! Per-frame pipeline: content rebuilds, scrolling, surface reconciliation,
//! and mesh regeneration from the instance buffers.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh2d, PrimitiveTopology};
use bevy::prelude::*;
use bevy::sprite_render::MeshMaterial2d;

use crate::coords::device_to_world;
use crate::events::{ContentRebuilt, ScrollToFile, SetDiffs};
use crate::gpu_text::{GlyphAtlas, GlyphKey, RectMaterial, TextMaterial, TextRenderState};
use crate::instances::{self, InstanceBuffers};
use crate::layout;
use crate::settings::DiffViewSettings;
use crate::surface::{self, SurfaceFrame};
use crate::syntax::{ColorCache, SyntaxColors};
use crate::types::{DiffViewState, ViewportDimensions};

/// Marker for the background/highlight rect mesh entity
#[derive(Component)]
pub struct DiffRectMesh;

/// Marker for the glyph mesh entity
#[derive(Component)]
pub struct DiffGlyphMesh;

/// Apply queued `SetDiffs` payloads, debounced. When several payloads queue
/// up within the debounce window only the newest is applied; the layout is
/// replaced atomically and the selection dropped.
pub fn apply_content_updates(
    mut state: ResMut<DiffViewState>,
    mut set_diffs: MessageReader<SetDiffs>,
    mut rebuilt: MessageWriter<ContentRebuilt>,
    mut color_cache: ResMut<ColorCache>,
    settings: Res<DiffViewSettings>,
    time: Res<Time>,
) {
    // Latest payload wins
    for message in set_diffs.read() {
        state.pending_diffs = Some(message.diffs.clone());
    }

    if state.pending_diffs.is_none() {
        return;
    }

    let now_ms = time.elapsed_secs_f64() * 1000.0;
    // Only repeat rebuilds are debounced; the first one applies immediately
    if state.content_version > 0
        && now_ms - state.last_rebuild_time < settings.performance.rebuild_debounce_ms
    {
        return;
    }

    let Some(diffs) = state.pending_diffs.take() else {
        return;
    };

    let built = layout::rebuild(&diffs, &settings.layout.metrics(&settings.font));
    let max_line_chars = diffs
        .iter()
        .flat_map(|d| d.lines.iter())
        .map(|l| l.char_count())
        .max()
        .unwrap_or(0);

    state.diffs = diffs;
    state.sections = built.sections;
    state.lines = built.lines;
    state.layout = built.cache;
    state.max_line_chars = max_line_chars;
    state.clear_selection();
    state.content_version += 1;
    state.needs_update = true;
    state.last_rebuild_time = now_ms;
    color_cache.clear();

    debug!(
        "content rebuilt: {} rows, {:.0}px total",
        state.line_count(),
        state.total_height()
    );
    rebuilt.write(ContentRebuilt {
        total_height: state.total_height(),
        line_count: state.line_count(),
    });
}

/// Scroll so the requested file's header lands at the viewport top
pub fn handle_scroll_to_file(
    mut state: ResMut<DiffViewState>,
    mut requests: MessageReader<ScrollToFile>,
    viewport: Res<ViewportDimensions>,
) {
    for request in requests.read() {
        match state.section_offset(&request.file_id) {
            Some(offset) => {
                let max_scroll = state.max_scroll(viewport.height as f32);
                state.target_scroll_y = offset.clamp(0.0, max_scroll);
                state.needs_scroll_update = true;
            }
            None => debug!("scroll-to-file: unknown file {:?}", request.file_id),
        }
    }
}

/// Ease the scroll offsets toward their targets with exponential decay
pub fn animate_smooth_scroll(
    mut state: ResMut<DiffViewState>,
    time: Res<Time>,
    settings: Res<DiffViewSettings>,
) {
    if !settings.scrolling.smooth_scrolling {
        // No animation: jump straight to the targets, so scroll-to-file
        // and the page keys still land
        if state.scroll_y != state.target_scroll_y {
            state.scroll_y = state.target_scroll_y;
            state.needs_scroll_update = true;
        }
        if state.scroll_x != state.target_scroll_x {
            state.scroll_x = state.target_scroll_x;
            state.needs_update = true;
        }
        return;
    }

    let dt = time.delta_secs();
    let t = 1.0 - (-settings.scrolling.smoothness * dt).exp();

    let vertical_diff = state.target_scroll_y - state.scroll_y;
    if vertical_diff.abs() > 0.1 {
        state.scroll_y += vertical_diff * t;
        state.needs_scroll_update = true;
    } else if vertical_diff.abs() > 0.0 {
        // Snap to target when close enough
        state.scroll_y = state.target_scroll_y;
        state.needs_scroll_update = true;
    }

    let horizontal_diff = state.target_scroll_x - state.scroll_x;
    if horizontal_diff.abs() > 0.1 {
        state.scroll_x += horizontal_diff * t;
        state.needs_update = true;
    } else if horizontal_diff.abs() > 0.0 {
        state.scroll_x = state.target_scroll_x;
        state.needs_update = true;
    }
}

/// Clamp scroll into the valid range and refresh the surface frame.
/// Any scroll movement triggers instance regeneration; rows have varying
/// heights so there is no cheap transform-only path.
pub fn reconcile_surface(
    mut state: ResMut<DiffViewState>,
    mut frame: ResMut<SurfaceFrame>,
    viewport: Res<ViewportDimensions>,
) {
    let viewport_height = viewport.height as f32;
    let max_scroll = state.max_scroll(viewport_height);

    let clamped = state.scroll_y.clamp(0.0, max_scroll);
    if clamped != state.scroll_y {
        state.scroll_y = clamped;
        state.needs_scroll_update = true;
    }
    state.target_scroll_y = state.target_scroll_y.clamp(0.0, max_scroll);

    *frame = surface::reconcile(state.scroll_y, viewport_height, state.total_height());

    if state.needs_scroll_update {
        state.needs_update = true;
        state.needs_scroll_update = false;
    }
}

/// Regenerate the rect and glyph meshes for the visible range.
///
/// Instances are produced in device space, converted to world space here,
/// and glyphs resolved against the atlas as the mesh is built. Mesh entities
/// are reused; only the mesh handles are replaced.
#[allow(clippy::too_many_arguments)]
pub fn update_diff_display(
    mut commands: Commands,
    mut state: ResMut<DiffViewState>,
    settings: Res<DiffViewSettings>,
    viewport: Res<ViewportDimensions>,
    frame: Res<SurfaceFrame>,
    colors: Res<SyntaxColors>,
    mut color_cache: ResMut<ColorCache>,
    mut buffers: ResMut<InstanceBuffers>,
    mut atlas: ResMut<GlyphAtlas>,
    render_state: Res<TextRenderState>,
    mut text_materials: ResMut<Assets<TextMaterial>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut images: ResMut<Assets<Image>>,
    rect_query: Query<Entity, With<DiffRectMesh>>,
    glyph_query: Query<Entity, With<DiffGlyphMesh>>,
) {
    if !state.needs_update {
        return;
    }

    let range = layout::visible_range(
        &state.layout,
        frame.top,
        frame.top + frame.height,
        settings.performance.prefetch_rows,
    );
    instances::generate(
        &state,
        &settings,
        &colors,
        &mut color_cache,
        &viewport,
        range,
        &mut buffers,
    );

    let (Some(text_material), Some(rect_material)) = (
        render_state.text_material.clone(),
        render_state.rect_material.clone(),
    ) else {
        state.needs_update = false;
        return;
    };

    let vw = viewport.width as f32;
    let vh = viewport.height as f32;

    // Rect mesh
    let mut rect_builder = QuadMeshBuilder::with_capacity(buffers.rects.len());
    for rect in &buffers.rects {
        let world = device_to_world(Vec2::new(rect.x, rect.y), vw, vh, viewport.offset_x);
        rect_builder.push_quad(
            world.x,
            world.y,
            rect.width,
            rect.height,
            [Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO],
            rect.color,
        );
    }

    // Glyph mesh, resolving atlas UVs per character
    let mut glyph_builder = QuadMeshBuilder::with_capacity(buffers.glyphs.len());
    let font_size = settings.font.size;
    let baseline = settings.font.baseline_offset();
    for glyph in &buffers.glyphs {
        let Some(info) = atlas.get_or_insert(GlyphKey::new(glyph.ch, font_size)) else {
            continue;
        };
        let device_x = glyph.x + info.offset.x;
        let device_y = glyph.y + baseline - info.offset.y;
        let world = device_to_world(Vec2::new(device_x, device_y), vw, vh, viewport.offset_x);
        glyph_builder.push_quad(
            world.x,
            world.y,
            info.size.x,
            info.size.y,
            [
                Vec2::new(info.uv_min.x, info.uv_max.y),
                Vec2::new(info.uv_max.x, info.uv_max.y),
                Vec2::new(info.uv_max.x, info.uv_min.y),
                Vec2::new(info.uv_min.x, info.uv_min.y),
            ],
            glyph.color,
        );
    }

    // New glyphs may have landed in the atlas while building
    if let Some(material) = text_materials.get_mut(&text_material) {
        material.atlas_texture = atlas.texture.clone();
    }
    atlas.update_texture(&mut images);

    replace_mesh(
        &mut commands,
        &mut meshes,
        rect_query.iter().next(),
        rect_builder,
        0.0,
        || (DiffRectMesh, MeshMaterial2d(rect_material.clone())),
    );
    replace_mesh(
        &mut commands,
        &mut meshes,
        glyph_query.iter().next(),
        glyph_builder,
        1.0,
        || (DiffGlyphMesh, MeshMaterial2d(text_material.clone())),
    );

    state.needs_update = false;
}

/// Accumulates world-space quads into mesh attribute vectors
struct QuadMeshBuilder {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    colors: Vec<[f32; 4]>,
    indices: Vec<u32>,
    vertex_count: u32,
}

impl QuadMeshBuilder {
    fn with_capacity(quads: usize) -> Self {
        Self {
            positions: Vec::with_capacity(quads * 4),
            uvs: Vec::with_capacity(quads * 4),
            colors: Vec::with_capacity(quads * 4),
            indices: Vec::with_capacity(quads * 6),
            vertex_count: 0,
        }
    }

    fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Push a quad anchored at its world-space top-left corner. World Y
    /// grows upward, so the quad extends downward from `top_y`.
    fn push_quad(
        &mut self,
        left_x: f32,
        top_y: f32,
        width: f32,
        height: f32,
        uvs: [Vec2; 4],
        color: Color,
    ) {
        let rgba = color.to_linear();
        let color_arr = [rgba.red, rgba.green, rgba.blue, rgba.alpha];

        self.positions.push([left_x, top_y - height, 0.0]);
        self.positions.push([left_x + width, top_y - height, 0.0]);
        self.positions.push([left_x + width, top_y, 0.0]);
        self.positions.push([left_x, top_y, 0.0]);

        for uv in uvs {
            self.uvs.push([uv.x, uv.y]);
        }
        for _ in 0..4 {
            self.colors.push(color_arr);
        }

        let base = self.vertex_count;
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        self.vertex_count += 4;
    }

    fn build(self) -> Mesh {
        let mut mesh = Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD,
        );
        mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, self.positions);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs);
        mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, self.colors);
        mesh.insert_indices(Indices::U32(self.indices));
        mesh
    }
}

/// Swap a mesh entity's handle, spawning the entity on first use
fn replace_mesh<B: Bundle>(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    existing: Option<Entity>,
    builder: QuadMeshBuilder,
    z: f32,
    bundle: impl FnOnce() -> B,
) {
    if builder.is_empty() {
        if let Some(entity) = existing {
            commands.entity(entity).insert(Visibility::Hidden);
        }
        return;
    }

    let handle = meshes.add(builder.build());
    match existing {
        Some(entity) => {
            commands
                .entity(entity)
                .insert((Mesh2d(handle), Visibility::Visible));
        }
        None => {
            commands.spawn((
                Mesh2d(handle),
                bundle(),
                Transform::from_translation(Vec3::new(0.0, 0.0, z)),
                Visibility::Visible,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiffLine, FileDiff, RowKind};
    use bevy::ecs::message::Messages;
    use bevy::ecs::system::RunSystemOnce;

    fn file(id: &str, body: usize) -> FileDiff {
        let lines = (0..body)
            .map(|i| DiffLine::unchanged(i as u32 + 1, i as u32 + 1, format!("line {i}")))
            .collect();
        FileDiff::new(id, "rust", lines)
    }

    fn world_with_content(diffs: Vec<FileDiff>, viewport_height: u32) -> World {
        let mut world = World::new();
        let settings = DiffViewSettings::default();
        let built = layout::rebuild(&diffs, &settings.layout.metrics(&settings.font));
        world.insert_resource(DiffViewState {
            diffs,
            sections: built.sections,
            lines: built.lines,
            layout: built.cache,
            ..Default::default()
        });
        world.insert_resource(settings);
        world.insert_resource(ViewportDimensions {
            width: 800,
            height: viewport_height,
            offset_x: 0.0,
        });
        world.insert_resource(Time::<()>::default());
        world
    }

    #[test]
    fn disabled_smooth_scrolling_snaps_to_targets() {
        let mut world = world_with_content(vec![file("a.rs", 100)], 300);
        world
            .resource_mut::<DiffViewSettings>()
            .scrolling
            .smooth_scrolling = false;
        {
            let mut state = world.resource_mut::<DiffViewState>();
            state.target_scroll_y = 500.0;
            state.target_scroll_x = 40.0;
        }

        world.run_system_once(animate_smooth_scroll).unwrap();

        // Targets written by scroll-to-file or the page keys must still land
        let state = world.resource::<DiffViewState>();
        assert_eq!(state.scroll_y, 500.0);
        assert_eq!(state.target_scroll_y, 500.0);
        assert!(state.needs_scroll_update);
        assert_eq!(state.scroll_x, 40.0);
        assert!(state.needs_update);
    }

    #[test]
    fn scroll_to_file_lands_on_section_header() {
        let mut world = world_with_content(vec![file("a.rs", 40), file("b.rs", 30)], 300);
        world.init_resource::<Messages<ScrollToFile>>();
        world
            .resource_mut::<Messages<ScrollToFile>>()
            .write(ScrollToFile { file_id: "b.rs".into() });

        world.run_system_once(handle_scroll_to_file).unwrap();

        let state = world.resource::<DiffViewState>();
        let expected = state.sections[1].y_offset;
        assert_eq!(state.target_scroll_y, expected);
        assert!(state.needs_scroll_update);

        // The range visible at that offset starts on the file's header row
        let range = layout::visible_range(&state.layout, expected, expected + 300.0, 0);
        let first = state.lines[range.start];
        assert_eq!(first.section, 1);
        assert_eq!(first.kind, RowKind::Header);
    }

    #[test]
    fn first_rebuild_applies_without_debounce_wait() {
        let mut world = world_with_content(Vec::new(), 300);
        world.init_resource::<ColorCache>();
        world.init_resource::<Messages<SetDiffs>>();
        world.init_resource::<Messages<ContentRebuilt>>();
        world
            .resource_mut::<Messages<SetDiffs>>()
            .write(SetDiffs { diffs: vec![file("a.rs", 3)] });

        // Time still at zero: the first payload must not be held back
        world.run_system_once(apply_content_updates).unwrap();

        let state = world.resource::<DiffViewState>();
        assert_eq!(state.content_version, 1);
        assert_eq!(state.line_count(), 4);
        assert!(state.pending_diffs.is_none());
    }
}
