//! GPU text rendering: glyph atlas and material plumbing

pub mod atlas;
pub mod render;

pub use atlas::{AtlasError, GlyphAtlas, GlyphInfo, GlyphKey, ATLAS_SIZE};
pub use render::{update_atlas_texture, GpuTextPlugin, RectMaterial, TextMaterial, TextRenderState};
