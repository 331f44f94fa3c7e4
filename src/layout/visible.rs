//! Visible-range resolution
//!
//! Maps the viewport's document-space Y span to the minimal contiguous range
//! of global row indices, expanded by a prefetch margin. The range is always
//! recomputed from the current viewport - no incremental tracking, so rapid
//! scrolling cannot drift.

use std::ops::Range;

use super::LineLayoutCache;

/// Resolve the contiguous global-row range intersecting `[top, bottom]`,
/// widened by `prefetch_rows` on each side and clamped to the row count.
///
/// Non-empty whenever the cache has rows; `0..0` otherwise.
pub fn visible_range(
    cache: &LineLayoutCache,
    top: f32,
    bottom: f32,
    prefetch_rows: usize,
) -> Range<usize> {
    let n = cache.len();
    if n == 0 {
        return 0..0;
    }
    let first = cache.line_index(top);
    let last = cache.line_index(bottom.max(top));
    let start = first.saturating_sub(prefetch_rows);
    let end = (last + prefetch_rows + 1).min(n);
    start..end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(n: usize, h: f32) -> LineLayoutCache {
        LineLayoutCache::build(std::iter::repeat(h).take(n))
    }

    #[test]
    fn empty_cache_yields_empty_range() {
        assert_eq!(visible_range(&LineLayoutCache::default(), 0.0, 100.0, 4), 0..0);
    }

    #[test]
    fn range_covers_viewport() {
        let c = cache(100, 10.0);
        let range = visible_range(&c, 250.0, 450.0, 0);
        assert_eq!(range, 25..46);
    }

    #[test]
    fn prefetch_widens_and_clamps() {
        let c = cache(100, 10.0);
        let range = visible_range(&c, 0.0, 50.0, 8);
        assert_eq!(range.start, 0); // clamped at the front
        assert_eq!(range.end, 5 + 8 + 1);

        let range = visible_range(&c, 950.0, 2000.0, 8);
        assert_eq!(range.end, 100); // clamped at the back
        assert_eq!(range.start, 95 - 8);
    }

    #[test]
    fn never_empty_with_content() {
        let c = cache(3, 10.0);
        // Viewport entirely below the content still clamps to the last row
        let range = visible_range(&c, 500.0, 600.0, 0);
        assert!(!range.is_empty());
        assert!(range.end <= 3);
        // Negative viewport clamps to the first row
        let range = visible_range(&c, -50.0, -10.0, 0);
        assert_eq!(range, 0..1);
    }

    #[test]
    fn range_is_subset_of_rows() {
        let c = cache(10, 21.0);
        for top in [-10.0f32, 0.0, 55.0, 300.0] {
            let range = visible_range(&c, top, top + 120.0, 3);
            assert!(range.start <= range.end);
            assert!(range.end <= 10);
        }
    }
}
