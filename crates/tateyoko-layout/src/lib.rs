//! tateyoko-layout - Reading order and destination layout
//!
//! - [`ReadingOrderResolver`] - clusters a page's glyphs into columns and
//!   numbers them in reading order, continuing from an [`OrderCursor`]
//! - [`LayoutPlanner`] - flows the ordered glyph stream onto destination
//!   pages and returns one [`Placement`](tateyoko_core::Placement) per glyph
//!
//! Resolution is page-local but must run in source-page order. Planning
//! runs once over the whole ordered stream.

pub mod error;
pub mod order;
pub mod plan;

pub use error::{LayoutError, LayoutResult};
pub use order::{Column, OrderCursor, ReadingOrderResolver};
pub use plan::{LayoutPlan, LayoutPlanner, Pagination};

use tateyoko_core::{Glyph, OrderedGlyph};

/// Resolve consecutive source pages, threading the cursor through them.
///
/// `pages` must be in source-page order. Returns the concatenated glyph
/// stream and the cursor after the last page.
pub fn resolve_pages<I>(
    resolver: &ReadingOrderResolver,
    pages: I,
    cursor: OrderCursor,
) -> (Vec<OrderedGlyph>, OrderCursor)
where
    I: IntoIterator<Item = Vec<Glyph>>,
{
    let mut cursor = cursor;
    let mut stream = Vec::new();
    for glyphs in pages {
        let (ordered, next) = resolver.resolve(glyphs, cursor);
        stream.extend(ordered);
        cursor = next;
    }
    (stream, cursor)
}
