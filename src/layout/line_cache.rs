//! Line layout cache - prefix sums over row heights
//!
//! Built once per content rebuild (O(n)), queried many times per frame for
//! visible-range resolution and hit testing (O(log n) per lookup). All Y
//! values are document-space `f32`; the same unit flows through layout,
//! instance generation, and hit testing, so there is no conversion step that
//! could accumulate rounding drift.

/// Prefix-sum cache over an ordered sequence of row heights.
///
/// `offsets[i]` is the document-space Y where row `i` starts; the final
/// entry is the total content height. Replaced wholesale on rebuild, never
/// mutated incrementally.
#[derive(Clone, Debug, Default)]
pub struct LineLayoutCache {
    /// `len() + 1` entries; `offsets[0] == 0.0`
    offsets: Vec<f32>,
}

impl LineLayoutCache {
    /// Build the cache from row heights, returning the total height.
    pub fn build(heights: impl IntoIterator<Item = f32>) -> Self {
        let iter = heights.into_iter();
        let mut offsets = Vec::with_capacity(iter.size_hint().0 + 1);
        let mut y = 0.0f32;
        offsets.push(y);
        for h in iter {
            y += h;
            offsets.push(y);
        }
        Self { offsets }
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total content height; 0 when empty
    pub fn total_height(&self) -> f32 {
        *self.offsets.last().unwrap_or(&0.0)
    }

    /// Index of the row containing document Y.
    ///
    /// Clamps rather than erroring: Y below 0 resolves to row 0, Y at or
    /// beyond the total height resolves to the last row. Returns 0 on an
    /// empty cache so callers always get a frameable answer.
    pub fn line_index(&self, at_y: f32) -> usize {
        let n = self.len();
        if n == 0 || at_y <= 0.0 {
            return 0;
        }
        // First offset strictly greater than at_y starts the *next* row.
        let idx = self.offsets.partition_point(|&o| o <= at_y);
        idx.saturating_sub(1).min(n - 1)
    }

    /// Document-space `[start, end)` Y-range of row `i`.
    ///
    /// Out-of-range indices clamp to the last row; an empty cache yields
    /// `(0.0, 0.0)`.
    pub fn y_range(&self, line: usize) -> (f32, f32) {
        let n = self.len();
        if n == 0 {
            return (0.0, 0.0);
        }
        let i = line.min(n - 1);
        (self.offsets[i], self.offsets[i + 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_cache() {
        let cache = LineLayoutCache::default();
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.total_height(), 0.0);
        assert_eq!(cache.line_index(100.0), 0);
        assert_eq!(cache.y_range(0), (0.0, 0.0));
    }

    #[test]
    fn build_accumulates_offsets() {
        let cache = LineLayoutCache::build([10.0, 20.0, 15.0]);
        assert_eq!(cache.len(), 3);
        assert_eq!(cache.total_height(), 45.0);
        assert_eq!(cache.y_range(0), (0.0, 10.0));
        assert_eq!(cache.y_range(1), (10.0, 30.0));
        assert_eq!(cache.y_range(2), (30.0, 45.0));
    }

    #[test]
    fn line_index_basic() {
        let cache = LineLayoutCache::build([10.0, 20.0, 15.0]);
        assert_eq!(cache.line_index(0.0), 0);
        assert_eq!(cache.line_index(9.9), 0);
        assert_eq!(cache.line_index(10.0), 1);
        assert_eq!(cache.line_index(29.9), 1);
        assert_eq!(cache.line_index(30.0), 2);
        assert_eq!(cache.line_index(44.9), 2);
    }

    #[test]
    fn line_index_clamps_out_of_range() {
        let cache = LineLayoutCache::build([10.0, 20.0, 15.0]);
        assert_eq!(cache.line_index(-5.0), 0);
        assert_eq!(cache.line_index(45.0), 2);
        assert_eq!(cache.line_index(1e6), 2);
    }

    #[test]
    fn y_range_clamps_index() {
        let cache = LineLayoutCache::build([10.0, 20.0]);
        assert_eq!(cache.y_range(99), (10.0, 30.0));
    }

    proptest! {
        /// y_range(i).start == sum of heights before i, total == sum of all
        #[test]
        fn prop_prefix_sums(heights in prop::collection::vec(1.0f32..100.0, 1..64)) {
            let cache = LineLayoutCache::build(heights.iter().copied());
            let mut expected = 0.0f32;
            for (i, &h) in heights.iter().enumerate() {
                let (start, end) = cache.y_range(i);
                prop_assert!((start - expected).abs() < 1e-3);
                expected += h;
                prop_assert!((end - expected).abs() < 1e-3);
            }
            prop_assert!((cache.total_height() - expected).abs() < 1e-3);
        }

        /// For Y inside row i's range, line_index recovers i
        #[test]
        fn prop_line_index_inverts_y_range(heights in prop::collection::vec(1.0f32..100.0, 1..64)) {
            let cache = LineLayoutCache::build(heights.iter().copied());
            for i in 0..cache.len() {
                let (start, end) = cache.y_range(i);
                let mid = (start + end) / 2.0;
                prop_assert_eq!(cache.line_index(mid), i);
                prop_assert_eq!(cache.line_index(start), i);
            }
        }
    }
}
