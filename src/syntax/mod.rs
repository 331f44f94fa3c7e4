//! Syntax color lookup
//!
//! Tokenization and language classification live outside the view; the host
//! injects a per-character color lookup and the instance generator consults
//! it for every visible glyph. Results are cached per row so steady-state
//! scrolling costs one hash lookup per visible line, not one trait call per
//! character.

use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use std::sync::Arc;

/// Host-provided per-character color lookup.
///
/// `line_index` is the body-line index within the file's diff, `char_index`
/// the character column. Returning `None` falls back to the theme
/// foreground. Implementations are read on every frame from the main
/// schedule only, so interior mutability is not required.
pub trait SyntaxColorLookup: Send + Sync {
    fn color_for(&self, file_id: &str, line_index: usize, char_index: usize) -> Option<Color>;
}

/// Lookup that colors nothing; every glyph renders in the theme foreground
#[derive(Default)]
pub struct NoHighlight;

impl SyntaxColorLookup for NoHighlight {
    fn color_for(&self, _file_id: &str, _line_index: usize, _char_index: usize) -> Option<Color> {
        None
    }
}

/// Resource wrapping the injected lookup
#[derive(Resource, Clone)]
pub struct SyntaxColors {
    lookup: Arc<dyn SyntaxColorLookup>,
}

impl SyntaxColors {
    pub fn new(lookup: impl SyntaxColorLookup + 'static) -> Self {
        Self { lookup: Arc::new(lookup) }
    }

    pub fn color_for(&self, file_id: &str, line_index: usize, char_index: usize) -> Option<Color> {
        self.lookup.color_for(file_id, line_index, char_index)
    }
}

impl Default for SyntaxColors {
    fn default() -> Self {
        Self::new(NoHighlight)
    }
}

/// Per-row color cache, keyed by (section, body line).
///
/// Invalidated by content version: a rebuild clears it wholesale, matching
/// the atomically-replaced layout it was derived from.
#[derive(Resource, Default)]
pub struct ColorCache {
    rows: HashMap<(usize, usize), Vec<Color>>,
    version: u64,
}

impl ColorCache {
    /// Cached colors for a row, if still valid for `version`
    pub fn get(&self, section: usize, line: usize, version: u64) -> Option<&[Color]> {
        if self.version != version {
            return None;
        }
        self.rows.get(&(section, line)).map(|v| v.as_slice())
    }

    pub fn insert(&mut self, section: usize, line: usize, version: u64, colors: Vec<Color>) {
        if self.version != version {
            self.rows.clear();
            self.version = version;
        }
        self.rows.insert((section, line), colors);
    }

    /// Drop everything; called when content is rebuilt
    pub fn clear(&mut self) {
        self.rows.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EvenBlue;
    impl SyntaxColorLookup for EvenBlue {
        fn color_for(&self, _f: &str, _l: usize, char_index: usize) -> Option<Color> {
            (char_index % 2 == 0).then_some(Color::srgb(0.0, 0.0, 1.0))
        }
    }

    #[test]
    fn lookup_is_consulted_per_character() {
        let colors = SyntaxColors::new(EvenBlue);
        assert!(colors.color_for("a.rs", 0, 0).is_some());
        assert!(colors.color_for("a.rs", 0, 1).is_none());
    }

    #[test]
    fn cache_invalidates_on_version_change() {
        let mut cache = ColorCache::default();
        cache.insert(0, 3, 1, vec![Color::WHITE]);
        assert!(cache.get(0, 3, 1).is_some());
        assert!(cache.get(0, 3, 2).is_none());

        cache.insert(0, 4, 2, vec![Color::WHITE]);
        // Old-version entries were dropped when the version advanced
        assert!(cache.get(0, 3, 2).is_none());
        assert!(cache.get(0, 4, 2).is_some());
    }
}
