//! Fragment merging and area filtering
//!
//! Candidates are merged pairwise until no eligible pair remains. A pair
//! is eligible when at least one side is a fragment and the boxes are no
//! more than `merge_threshold` background pixels apart on both axes.
//! Every merge removes one candidate, so the loop terminates.
//!
//! After convergence, candidates outside `[min_area, max_area]` are
//! dropped: small ones as speckle noise, large ones as borders or
//! bleed-through.

use crate::error::RegionResult;
use tateyoko_core::{Candidate, Glyph, PixMut, PixelDepth, SegmentationParams};
use tracing::debug;

/// Result of merging one page's candidates
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// Finalized glyphs, sorted by id
    pub glyphs: Vec<Glyph>,
    /// Number of pairwise merges performed
    pub merges: usize,
    /// Candidates dropped for `area < min_area`
    pub dropped_noise: usize,
    /// Candidates dropped for `area > max_area`
    pub dropped_oversize: usize,
}

/// Merges fragments and filters candidates by area
#[derive(Debug, Clone, Copy)]
pub struct GlyphMerger {
    params: SegmentationParams,
}

impl GlyphMerger {
    pub fn new(params: SegmentationParams) -> Self {
        Self { params }
    }

    /// Union of two candidates. Keeps the smaller id.
    fn join(&self, a: &Candidate, b: &Candidate) -> RegionResult<Candidate> {
        let bbox = a.bbox.union(&b.bbox);
        let mut mask = PixMut::new(bbox.w as u32, bbox.h as u32, PixelDepth::Bit1)?;
        mask.or_from(&a.mask, a.bbox.x - bbox.x, a.bbox.y - bbox.y)?;
        mask.or_from(&b.mask, b.bbox.x - bbox.x, b.bbox.y - bbox.y)?;
        Ok(Candidate {
            id: a.id.min(b.id),
            bbox,
            mask: mask.into(),
            area: a.area + b.area,
            fragment: self.params.is_fragment(&bbox),
        })
    }

    fn eligible(&self, a: &Candidate, b: &Candidate) -> bool {
        (a.fragment || b.fragment)
            && a.bbox
                .within_gap(&b.bbox, self.params.merge_threshold() as i32)
    }

    /// Merge to a fixed point, then filter by area.
    ///
    /// Candidates may come from one page in any order; the outcome does
    /// not depend on input order.
    pub fn merge(&self, candidates: Vec<Candidate>) -> RegionResult<MergeOutcome> {
        let threshold = self.params.merge_threshold() as i32;
        let mut cands = candidates;
        let mut merges = 0;

        loop {
            // Sorted by left edge, so the inner scan can stop once the
            // horizontal gap alone exceeds the threshold.
            cands.sort_by_key(|c| (c.bbox.x, c.id));
            let mut changed = false;
            let mut i = 0;
            while i < cands.len() {
                let mut j = i + 1;
                while j < cands.len() {
                    if cands[j].bbox.x - cands[i].bbox.right() > threshold {
                        break;
                    }
                    if self.eligible(&cands[i], &cands[j]) {
                        // The union keeps cands[i].bbox.x, so the order holds
                        let other = cands.remove(j);
                        cands[i] = self.join(&cands[i], &other)?;
                        merges += 1;
                        changed = true;
                        j = i + 1;
                        continue;
                    }
                    j += 1;
                }
                i += 1;
            }
            if !changed {
                break;
            }
        }

        let mut outcome = MergeOutcome {
            merges,
            ..Default::default()
        };
        for cand in cands {
            if cand.area < self.params.min_area() {
                outcome.dropped_noise += 1;
            } else if cand.area > self.params.max_area() {
                outcome.dropped_oversize += 1;
            } else {
                outcome.glyphs.push(Glyph::from_candidate(cand));
            }
        }
        outcome.glyphs.sort_by_key(|g| g.id());

        debug!(
            glyphs = outcome.glyphs.len(),
            merges = outcome.merges,
            dropped_noise = outcome.dropped_noise,
            dropped_oversize = outcome.dropped_oversize,
            "merged candidates"
        );
        Ok(outcome)
    }
}
