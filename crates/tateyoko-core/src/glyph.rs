//! Glyphs and glyph candidates
//!
//! A glyph moves through three shapes on its way through the engine:
//!
//! 1. [`Candidate`] - one connected component (or a union of several),
//!    possibly flagged as a fragment, owned by the detector and merger.
//! 2. [`Glyph`] - a finalized region that survived merging and area
//!    filtering. Immutable.
//! 3. [`OrderedGlyph`] - a glyph with its column and global reading
//!    position, produced by the reading-order resolver.
//!
//! Each stage owns its mask exclusively; the mask is finally moved into
//! the page composer.

use crate::params::SegmentationParams;
use crate::pix::Pix;
use crate::rect::Rect;
use std::fmt;

/// Identity of a glyph within one run.
///
/// Unique without a shared counter, so pages can be segmented on
/// separate threads. When two candidates merge, the result keeps the
/// smaller id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId {
    /// Source page index
    pub page: usize,
    /// Discovery index within the page
    pub local: usize,
}

impl GlyphId {
    pub const fn new(page: usize, local: usize) -> Self {
        Self { page, local }
    }
}

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}.{}", self.page, self.local)
    }
}

/// A candidate glyph region
///
/// `mask` is a 1 bpp image exactly the size of `bbox`, holding only the
/// pixels of the component(s) this candidate was built from.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub id: GlyphId,
    pub bbox: Rect,
    pub mask: Pix,
    /// Foreground pixel count
    pub area: u64,
    /// Too small to stand alone; eligible for merging
    pub fragment: bool,
}

impl Candidate {
    /// Rebuild a candidate from a finalized glyph, re-deriving the
    /// fragment flag from `params`.
    pub fn from_glyph(glyph: Glyph, params: &SegmentationParams) -> Self {
        let fragment = params.is_fragment(&glyph.bbox);
        Candidate {
            id: glyph.id,
            bbox: glyph.bbox,
            mask: glyph.mask,
            area: glyph.area,
            fragment,
        }
    }

    /// Source page index.
    #[inline]
    pub fn source_page(&self) -> usize {
        self.id.page
    }
}

/// A finalized glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    id: GlyphId,
    bbox: Rect,
    mask: Pix,
    area: u64,
}

impl Glyph {
    /// Finalize a candidate. The fragment flag is dropped.
    pub fn from_candidate(candidate: Candidate) -> Self {
        Glyph {
            id: candidate.id,
            bbox: candidate.bbox,
            mask: candidate.mask,
            area: candidate.area,
        }
    }

    #[inline]
    pub fn id(&self) -> GlyphId {
        self.id
    }

    #[inline]
    pub fn source_page(&self) -> usize {
        self.id.page
    }

    /// Bounding box in source-page pixels
    #[inline]
    pub fn bbox(&self) -> Rect {
        self.bbox
    }

    #[inline]
    pub fn mask(&self) -> &Pix {
        &self.mask
    }

    /// Foreground pixel count
    #[inline]
    pub fn area(&self) -> u64 {
        self.area
    }

    /// Give up the mask, e.g. to hand it to the composer.
    pub fn into_mask(self) -> Pix {
        self.mask
    }
}

/// A glyph with its place in the reading order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedGlyph {
    glyph: Glyph,
    column_id: usize,
    order_index: usize,
}

impl OrderedGlyph {
    pub fn new(glyph: Glyph, column_id: usize, order_index: usize) -> Self {
        Self {
            glyph,
            column_id,
            order_index,
        }
    }

    #[inline]
    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }

    #[inline]
    pub fn id(&self) -> GlyphId {
        self.glyph.id
    }

    /// Column (or row, for horizontal sources) the glyph was read from
    #[inline]
    pub fn column_id(&self) -> usize {
        self.column_id
    }

    /// Position in the run-wide reading order
    #[inline]
    pub fn order_index(&self) -> usize {
        self.order_index
    }

    pub fn into_glyph(self) -> Glyph {
        self.glyph
    }
}
