//! Destination layout planning
//!
//! The planner walks the ordered glyph stream once, keeping a cursor on
//! the current destination page. It works in (flow, cross) coordinates:
//! glyphs advance along the flow axis within a line and lines stack
//! along the cross axis. For horizontal output the flow axis is x; for
//! vertical output the roles of width and height swap.
//!
//! - A glyph that would run past the end of the line wraps to a new line
//!   `line_spacing` past the widest footprint of the current one.
//! - A line that would run past the end of the page starts a new page.
//! - After a glyph, the cursor advances by its footprint plus
//!   `char_spacing`.
//!
//! Footprints on one page therefore never overlap and `dest_page` never
//! decreases along the reading order.

use crate::error::{LayoutError, LayoutResult};
use tateyoko_core::{Flow, LayoutParameters, OrderedGlyph, Placement};
use tracing::{debug, warn};

/// Where destination pages break relative to source pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Pagination {
    /// Glyphs from every source page share one continuous stream
    #[default]
    Continuous,
    /// Each source page starts on a fresh destination page
    PerSourcePage,
}

impl Pagination {
    pub fn as_str(self) -> &'static str {
        match self {
            Pagination::Continuous => "continuous",
            Pagination::PerSourcePage => "per_source_page",
        }
    }
}

/// Output of [`LayoutPlanner::plan`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutPlan {
    /// One placement per glyph, in reading order
    pub placements: Vec<Placement>,
    /// Number of destination pages (at least one)
    pub page_count: usize,
}

impl LayoutPlan {
    /// Placements that land on destination page `page`.
    pub fn page(&self, page: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.dest_page == page)
    }
}

/// Running position on the destination
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    page: usize,
    /// Offset along the flow axis from the start of the line
    flow: u32,
    /// Offset along the cross axis from the first line
    cross: u32,
    /// Largest cross extent on the current line
    line_extent: u32,
    /// Glyphs already on the current line
    line_len: usize,
    /// Glyphs already on the current page
    page_len: usize,
}

impl Cursor {
    fn new_line(&mut self, line_spacing: u32) {
        self.cross += self.line_extent + line_spacing;
        self.flow = 0;
        self.line_extent = 0;
        self.line_len = 0;
    }

    fn new_page(&mut self) {
        self.page += 1;
        self.flow = 0;
        self.cross = 0;
        self.line_extent = 0;
        self.line_len = 0;
        self.page_len = 0;
    }
}

/// Computes destination placements for an ordered glyph stream
#[derive(Debug, Clone, Copy)]
pub struct LayoutPlanner {
    params: LayoutParameters,
    pagination: Pagination,
}

impl LayoutPlanner {
    pub fn new(params: LayoutParameters) -> Self {
        Self {
            params,
            pagination: Pagination::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    pub fn params(&self) -> &LayoutParameters {
        &self.params
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Writable extents as (flow, cross).
    fn extents(&self, flow: Flow) -> (u32, u32) {
        let (w, h) = (self.params.writable_width(), self.params.writable_height());
        if flow.is_vertical() { (h, w) } else { (w, h) }
    }

    /// Convert a (flow, cross) offset to the top-left page pixel of a
    /// `width` x `height` footprint.
    fn to_page(&self, flow: Flow, f: u32, c: u32, width: u32) -> (u32, u32) {
        let m = self.params.margin();
        match flow {
            Flow::Horizontal => (m + f, m + c),
            Flow::VerticalLeftToRight => (m + c, m + f),
            // Columns stack leftwards; glyphs hang from the column's right edge
            Flow::VerticalRightToLeft => (self.params.page_width() - m - c - width, m + f),
        }
    }

    /// Place every glyph.
    ///
    /// `glyphs` must be in ascending `order_index`.
    ///
    /// # Errors
    ///
    /// [`LayoutError::Overflow`] if a glyph does not fit on an empty page,
    /// [`LayoutError::OutOfOrder`] if the stream is not in reading order.
    pub fn plan(&self, glyphs: &[OrderedGlyph]) -> LayoutResult<LayoutPlan> {
        let flow = self.params.flow();
        let (flow_extent, cross_extent) = self.extents(flow);
        let char_spacing = self.params.char_spacing();
        let line_spacing = self.params.line_spacing();

        let mut cur = Cursor::default();
        let mut placements = Vec::with_capacity(glyphs.len());
        let mut previous: Option<&OrderedGlyph> = None;

        for g in glyphs {
            if let Some(prev) = previous {
                if g.order_index() <= prev.order_index() {
                    return Err(LayoutError::OutOfOrder {
                        previous: prev.order_index(),
                        found: g.order_index(),
                    });
                }
                if self.pagination == Pagination::PerSourcePage
                    && g.glyph().source_page() != prev.glyph().source_page()
                    && cur.page_len > 0
                {
                    cur.new_page();
                }
            }
            previous = Some(g);

            let (width, height) = self.params.scaled_size(&g.glyph().bbox());
            let (along, across) = if flow.is_vertical() {
                (height, width)
            } else {
                (width, height)
            };
            if along > flow_extent || across > cross_extent {
                warn!(
                    glyph = %g.id(),
                    width, height,
                    writable_width = self.params.writable_width(),
                    writable_height = self.params.writable_height(),
                    "glyph does not fit on a page"
                );
                return Err(LayoutError::Overflow {
                    glyph: g.id(),
                    required: (width, height),
                    available: (self.params.writable_width(), self.params.writable_height()),
                });
            }

            if cur.line_len > 0 && cur.flow + along > flow_extent {
                cur.new_line(line_spacing);
            }
            if cur.page_len > 0 && cur.cross + across > cross_extent {
                cur.new_page();
                debug!(page = cur.page, order_index = g.order_index(), "page break");
            }

            let (dest_x, dest_y) = self.to_page(flow, cur.flow, cur.cross, width);
            placements.push(Placement {
                glyph_id: g.id(),
                order_index: g.order_index(),
                dest_page: cur.page,
                dest_x,
                dest_y,
                dest_width: width,
                dest_height: height,
                dest_scale: self.params.scale_factor(),
            });

            cur.flow += along + char_spacing;
            cur.line_extent = cur.line_extent.max(across);
            cur.line_len += 1;
            cur.page_len += 1;
        }

        let page_count = cur.page + 1;
        debug!(
            glyphs = placements.len(),
            pages = page_count,
            flow = ?flow,
            "planned layout"
        );
        Ok(LayoutPlan {
            placements,
            page_count,
        })
    }
}
