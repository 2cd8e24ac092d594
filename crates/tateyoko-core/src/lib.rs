//! tateyoko core - data structures for the glyph relayout engine
//!
//! - [`Pix`] / [`PixMut`] - raster container for pages, masks and canvases
//! - [`Rect`] - pixel rectangles
//! - [`Candidate`] / [`Glyph`] / [`OrderedGlyph`] - a glyph at each stage
//! - [`Placement`] / [`ComposedPage`] - layout and composition output
//! - [`SegmentationParams`] / [`LayoutParameters`] - validated settings

pub mod error;
pub mod glyph;
pub mod params;
pub mod pix;
pub mod placement;
pub mod rect;

pub use error::{Error, Result};
pub use glyph::{Candidate, Glyph, GlyphId, OrderedGlyph};
pub use params::{
    Background, Direction, Flow, LayoutOptions, LayoutParameters, ReadingOrder,
    SegmentationOptions, SegmentationParams,
};
pub use pix::{Pix, PixMut, PixelDepth};
pub use placement::{ComposedPage, Placement};
pub use rect::Rect;
