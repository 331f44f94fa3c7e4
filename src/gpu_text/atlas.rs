//! Glyph atlas - caches rasterized glyphs in a GPU texture
//!
//! Uses cosmic_text for font rasterization. Glyphs are rasterized once and
//! cached in a texture atlas; the frame systems look up UV rects per
//! character when building the glyph mesh.

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use cosmic_text::{fontdb, CacheKey, FontSystem, SwashCache};
use std::collections::HashMap;
use thiserror::Error;

/// Size of the glyph atlas texture (power of 2 for GPU efficiency)
pub const ATLAS_SIZE: u32 = 2048;

/// Padding between glyphs to prevent bleeding
const GLYPH_PADDING: u32 = 2;

/// Atlas failure modes. A full atlas degrades to skipping new glyphs
/// rather than failing the frame.
#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("glyph atlas is full ({0}x{0} texture)")]
    Full(u32),
}

/// A unique identifier for a cached glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GlyphKey {
    /// The character
    pub character: char,
    /// Font size in pixels (scaled by 10 for sub-pixel precision)
    pub font_size_tenths: u32,
}

impl GlyphKey {
    pub fn new(character: char, font_size: f32) -> Self {
        Self {
            character,
            font_size_tenths: (font_size * 10.0) as u32,
        }
    }
}

/// Information about a glyph's location in the atlas
#[derive(Clone, Copy, Debug)]
pub struct GlyphInfo {
    /// UV coordinates in the atlas (0.0 to 1.0)
    pub uv_min: Vec2,
    pub uv_max: Vec2,
    /// Size in pixels
    pub size: Vec2,
    /// Offset from the baseline
    pub offset: Vec2,
    /// Advance width (how far to move for next character)
    pub advance: f32,
}

/// Row-based packing for the atlas (simple shelf algorithm)
struct AtlasRow {
    y: u32,
    height: u32,
    x_cursor: u32,
}

/// The glyph atlas resource
#[derive(Resource)]
pub struct GlyphAtlas {
    /// The atlas texture handle
    pub texture: Handle<Image>,
    /// Cached glyph information
    glyphs: HashMap<GlyphKey, GlyphInfo>,
    /// Current packing rows
    rows: Vec<AtlasRow>,
    /// Current Y position for new rows
    current_y: u32,
    /// Raw pixel data for CPU-side updates
    pixels: Vec<u8>,
    /// Whether the texture needs to be updated
    pub dirty: bool,
    /// Font system for text rasterization
    font_system: FontSystem,
    /// Swash cache for glyph rasterization
    swash_cache: SwashCache,
    /// Preferred font family, matched against the font database
    preferred_family: Option<String>,
    /// Set once the atlas fills up, so the warning logs only once
    full_reported: bool,
}

impl GlyphAtlas {
    /// Create a new glyph atlas preferring the given font family
    pub fn new(images: &mut Assets<Image>, preferred_family: Option<&str>) -> Self {
        let pixels = vec![0u8; (ATLAS_SIZE * ATLAS_SIZE * 4) as usize];

        let image = Image::new(
            Extent3d {
                width: ATLAS_SIZE,
                height: ATLAS_SIZE,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            pixels.clone(),
            TextureFormat::Rgba8UnormSrgb,
            default(),
        );

        let texture = images.add(image);

        Self {
            texture,
            glyphs: HashMap::new(),
            rows: Vec::new(),
            current_y: 0,
            pixels,
            dirty: false,
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            preferred_family: preferred_family.map(str::to_owned),
            full_reported: false,
        }
    }

    /// Get or create a glyph entry in the atlas.
    ///
    /// Returns `None` for glyphs that cannot be rasterized or no longer fit;
    /// callers skip those characters.
    pub fn get_or_insert(&mut self, key: GlyphKey) -> Option<GlyphInfo> {
        if let Some(info) = self.glyphs.get(&key) {
            return Some(*info);
        }

        let glyph = self
            .rasterize_with_cosmic(key)
            .or_else(|| fallback_rasterize(key.character, key.font_size_tenths as f32 / 10.0))?;

        let (x, y) = match self.allocate(glyph.width, glyph.height) {
            Ok(pos) => pos,
            Err(err) => {
                if !self.full_reported {
                    warn!("{err}; new glyphs will not render");
                    self.full_reported = true;
                }
                return None;
            }
        };

        self.copy_glyph_to_atlas(x, y, &glyph);

        let uv_min = Vec2::new(x as f32 / ATLAS_SIZE as f32, y as f32 / ATLAS_SIZE as f32);
        let uv_max = Vec2::new(
            (x + glyph.width) as f32 / ATLAS_SIZE as f32,
            (y + glyph.height) as f32 / ATLAS_SIZE as f32,
        );

        let info = GlyphInfo {
            uv_min,
            uv_max,
            size: Vec2::new(glyph.width as f32, glyph.height as f32),
            offset: Vec2::new(glyph.bearing_x, glyph.bearing_y),
            advance: glyph.advance,
        };

        self.glyphs.insert(key, info);
        self.dirty = true;
        Some(info)
    }

    /// Pick a face: preferred family first, then any monospace, then anything
    fn select_font(&self) -> Option<fontdb::ID> {
        let db = self.font_system.db();

        if let Some(family) = &self.preferred_family {
            let hit = db.faces().find_map(|face| {
                face.families
                    .iter()
                    .any(|(name, _)| name == family)
                    .then_some(face.id)
            });
            if hit.is_some() {
                return hit;
            }
            debug!("font family {family:?} not found, falling back to monospace");
        }

        db.faces()
            .find_map(|face| face.monospaced.then_some(face.id))
            .or_else(|| db.faces().next().map(|f| f.id))
    }

    /// Rasterize a glyph using cosmic_text/swash
    fn rasterize_with_cosmic(&mut self, key: GlyphKey) -> Option<RasterizedGlyph> {
        let font_size = key.font_size_tenths as f32 / 10.0;
        let character = key.character;

        if character.is_control() && character != '\t' {
            return None;
        }

        let font_id = self.select_font()?;
        let font = self.font_system.get_font(font_id)?;
        let swash_font = font.as_swash();

        let glyph_id = swash_font.charmap().map(character);
        if glyph_id == 0 && character != ' ' {
            return None;
        }

        let metrics = swash_font.glyph_metrics(&[]).scale(font_size);
        let advance = metrics.advance_width(glyph_id);

        let cache_key = CacheKey::new(
            font_id,
            glyph_id,
            font_size,
            (0.0, 0.0), // No subpixel offset
            cosmic_text::CacheKeyFlags::empty(),
        );

        let image = self
            .swash_cache
            .get_image_uncached(&mut self.font_system, cache_key.0)?;

        // Empty glyphs (like space) still carry an advance
        if image.placement.width == 0 || image.placement.height == 0 {
            return Some(RasterizedGlyph {
                width: 0,
                height: 0,
                bearing_x: 0.0,
                bearing_y: 0.0,
                advance,
                pixels: Vec::new(),
            });
        }

        let width = image.placement.width;
        let height = image.placement.height;
        let bearing_x = image.placement.left as f32;
        let bearing_y = image.placement.top as f32;

        // Reduce to single-channel coverage
        let pixels = match image.content {
            cosmic_text::SwashContent::Mask => image.data.clone(),
            cosmic_text::SwashContent::Color => {
                image.data.chunks(4).map(|pixel| pixel[3]).collect()
            }
            cosmic_text::SwashContent::SubpixelMask => image
                .data
                .chunks(3)
                .map(|pixel| ((pixel[0] as u16 + pixel[1] as u16 + pixel[2] as u16) / 3) as u8)
                .collect(),
        };

        Some(RasterizedGlyph {
            width,
            height,
            bearing_x,
            bearing_y,
            advance,
            pixels,
        })
    }

    /// Allocate space in the atlas using shelf packing
    fn allocate(&mut self, width: u32, height: u32) -> Result<(u32, u32), AtlasError> {
        if width == 0 || height == 0 {
            return Ok((0, 0));
        }

        let padded_width = width + GLYPH_PADDING;
        let padded_height = height + GLYPH_PADDING;

        // Try to fit in an existing row
        for row in &mut self.rows {
            if row.height >= padded_height && row.x_cursor + padded_width <= ATLAS_SIZE {
                let x = row.x_cursor;
                let y = row.y;
                row.x_cursor += padded_width;
                return Ok((x, y));
            }
        }

        // Create a new row
        if self.current_y + padded_height <= ATLAS_SIZE {
            let y = self.current_y;
            self.current_y += padded_height;
            self.rows.push(AtlasRow {
                y,
                height: padded_height,
                x_cursor: padded_width,
            });
            return Ok((0, y));
        }

        Err(AtlasError::Full(ATLAS_SIZE))
    }

    /// Copy glyph pixels to the atlas
    fn copy_glyph_to_atlas(&mut self, x: u32, y: u32, glyph: &RasterizedGlyph) {
        if glyph.width == 0 || glyph.height == 0 {
            return;
        }

        for gy in 0..glyph.height {
            for gx in 0..glyph.width {
                let src_idx = (gy * glyph.width + gx) as usize;
                let dst_x = x + gx;
                let dst_y = y + gy;
                let dst_idx = ((dst_y * ATLAS_SIZE + dst_x) * 4) as usize;

                if dst_idx + 3 < self.pixels.len() && src_idx < glyph.pixels.len() {
                    let alpha = glyph.pixels[src_idx];
                    // Store as white with alpha so the shader can tint
                    self.pixels[dst_idx] = 255;
                    self.pixels[dst_idx + 1] = 255;
                    self.pixels[dst_idx + 2] = 255;
                    self.pixels[dst_idx + 3] = alpha;
                }
            }
        }
    }

    /// Update the GPU texture with any changes
    pub fn update_texture(&mut self, images: &mut Assets<Image>) {
        if !self.dirty {
            return;
        }

        if let Some(image) = images.get_mut(&self.texture) {
            image.data = Some(self.pixels.clone());
        }

        self.dirty = false;
    }

    /// Clear the atlas (e.g., when the font changes)
    pub fn clear(&mut self) {
        self.glyphs.clear();
        self.rows.clear();
        self.current_y = 0;
        self.pixels.fill(0);
        self.dirty = true;
        self.full_reported = false;
    }

    /// Get cached glyph info
    pub fn get(&self, key: &GlyphKey) -> Option<&GlyphInfo> {
        self.glyphs.get(key)
    }
}

/// A rasterized glyph ready to be copied to the atlas
pub struct RasterizedGlyph {
    pub width: u32,
    pub height: u32,
    pub bearing_x: f32,
    pub bearing_y: f32,
    pub advance: f32,
    /// Grayscale pixels (alpha values)
    pub pixels: Vec<u8>,
}

/// Fallback software rasterizer for glyphs cosmic_text cannot supply.
/// Draws a filled box so missing glyphs stay visible instead of vanishing.
fn fallback_rasterize(character: char, font_size: f32) -> Option<RasterizedGlyph> {
    if character.is_control() && character != '\t' {
        return None;
    }

    let char_width = (font_size * 0.6).ceil() as u32;
    let char_height = font_size.ceil() as u32;
    let pixels = vec![200u8; (char_width * char_height) as usize];

    Some(RasterizedGlyph {
        width: char_width.max(1),
        height: char_height.max(1),
        bearing_x: 0.0,
        bearing_y: font_size * 0.8,
        advance: char_width as f32,
        pixels,
    })
}
