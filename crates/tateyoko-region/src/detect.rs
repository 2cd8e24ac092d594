//! Glyph candidate detection
//!
//! Every 8-connected foreground component of a binary page becomes one
//! [`Candidate`]. Components smaller than the minimum character box are
//! kept and flagged as fragments so the merger can reattach detached
//! strokes and dots.

use crate::conncomp::{ConnectivityType, find_connected_components};
use crate::error::RegionResult;
use tateyoko_core::{Candidate, GlyphId, Pix, SegmentationParams};
use tracing::debug;

/// Detects glyph candidates on one binary page
#[derive(Debug, Clone, Copy)]
pub struct GlyphDetector {
    params: SegmentationParams,
}

impl GlyphDetector {
    pub fn new(params: SegmentationParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &SegmentationParams {
        &self.params
    }

    /// Find candidates on `page`, in discovery (raster) order.
    ///
    /// A blank page yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RegionError::UnsupportedDepth`] unless `page` is 1 bpp.
    pub fn detect(&self, page: &Pix, page_index: usize) -> RegionResult<Vec<Candidate>> {
        let components = find_connected_components(page, ConnectivityType::EightWay)?;
        let candidates: Vec<Candidate> = components
            .into_iter()
            .enumerate()
            .map(|(local, cc)| Candidate {
                id: GlyphId::new(page_index, local),
                fragment: self.params.is_fragment(&cc.bounds),
                bbox: cc.bounds,
                mask: cc.mask,
                area: cc.pixel_count,
            })
            .collect();

        debug!(
            page = page_index,
            candidates = candidates.len(),
            fragments = candidates.iter().filter(|c| c.fragment).count(),
            "detected glyph candidates"
        );
        Ok(candidates)
    }
}
