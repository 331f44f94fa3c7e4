//! Layout - prefix-sum line cache, section flattening, visible-range math
//!
//! The layout layer replaces a retained-mode framework's automatic layout
//! and cell recycling with an explicit pipeline: content rebuild produces a
//! flattened row sequence plus a prefix-sum cache; scrolling only re-reads
//! that cache to pick the visible rows. Nothing here touches the GPU.

mod global_index;
mod line_cache;
mod visible;

pub use global_index::{rebuild, GlobalLayout, LayoutMetrics};
pub use line_cache::LineLayoutCache;
pub use visible::visible_range;
