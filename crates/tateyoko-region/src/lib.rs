//! tateyoko-region - Glyph segmentation
//!
//! Per-page stage of the relayout engine:
//!
//! - [`find_connected_components`] - 8-connected component labeling
//! - [`GlyphDetector`] - one candidate per component, fragments flagged
//! - [`GlyphMerger`] - fixed-point fragment merging and area filtering
//!
//! Pages are independent: a detector and merger can run on each page on
//! its own thread.

pub mod conncomp;
pub mod detect;
pub mod error;
pub mod merge;

pub use conncomp::{ConnectedComponent, ConnectivityType, find_connected_components};
pub use detect::GlyphDetector;
pub use error::{RegionError, RegionResult};
pub use merge::{GlyphMerger, MergeOutcome};

use tateyoko_core::{Pix, SegmentationParams};

/// Detect and merge one page.
pub fn segment_page(
    page: &Pix,
    page_index: usize,
    params: &SegmentationParams,
) -> RegionResult<MergeOutcome> {
    let candidates = GlyphDetector::new(*params).detect(page, page_index)?;
    GlyphMerger::new(*params).merge(candidates)
}
