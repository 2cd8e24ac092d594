//! Reading-order resolution
//!
//! Glyphs of one page are grouped into [`Column`]s by their position on
//! the reading axis (x-center for vertical sources, y-center for
//! horizontal ones), the columns are ordered by the reading order, and
//! glyphs within a column are read along the perpendicular axis.
//!
//! Clustering is a single greedy pass. Glyphs are visited top to bottom
//! (left to right for horizontal sources); each joins the nearest open
//! column whose running mean lies within the tolerance, or opens a new
//! one. Equal distances go to the column opened first, so the result
//! depends only on the glyph geometry and ids.
//!
//! The global counters live in an explicit [`OrderCursor`] that is passed
//! in and handed back for every page. Pages can therefore be resolved in
//! isolation, as long as they are resolved in source-page order.

use tateyoko_core::{Glyph, OrderedGlyph, ReadingOrder, SegmentationParams};
use tracing::debug;

/// Next free order index and column id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderCursor {
    pub next_order: usize,
    pub next_column: usize,
}

impl OrderCursor {
    pub const fn new() -> Self {
        Self {
            next_order: 0,
            next_column: 0,
        }
    }
}

/// Glyphs inferred to share one source line
#[derive(Debug, Clone)]
pub struct Column {
    sum: f64,
    glyphs: Vec<Glyph>,
}

impl Column {
    fn open(axis: f64, glyph: Glyph) -> Self {
        Self {
            sum: axis,
            glyphs: vec![glyph],
        }
    }

    fn push(&mut self, axis: f64, glyph: Glyph) {
        self.sum += axis;
        self.glyphs.push(glyph);
    }

    /// Running mean of the members' reading-axis centers
    pub fn axis_position(&self) -> f64 {
        self.sum / self.glyphs.len() as f64
    }

    /// Members in reading order along the column
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn into_glyphs(self) -> Vec<Glyph> {
        self.glyphs
    }
}

/// Assigns column ids and reading-order indices to one page of glyphs
#[derive(Debug, Clone, Copy)]
pub struct ReadingOrderResolver {
    order: ReadingOrder,
    tolerance: f64,
}

impl ReadingOrderResolver {
    /// `tolerance` is a fraction of the median glyph extent on the
    /// reading axis.
    pub fn new(order: ReadingOrder, tolerance: f64) -> Self {
        Self { order, tolerance }
    }

    /// Resolver using the clustering tolerance from `params`.
    pub fn from_params(order: ReadingOrder, params: &SegmentationParams) -> Self {
        Self::new(order, params.column_tolerance())
    }

    pub fn reading_order(&self) -> ReadingOrder {
        self.order
    }

    /// Position on the axis that separates columns
    fn axis(&self, glyph: &Glyph) -> f64 {
        let b = glyph.bbox();
        if self.order.is_vertical_source() {
            b.center_x()
        } else {
            b.center_y()
        }
    }

    /// Position along a column
    fn along(&self, glyph: &Glyph) -> f64 {
        let b = glyph.bbox();
        if self.order.is_vertical_source() {
            b.center_y()
        } else {
            b.center_x()
        }
    }

    fn extent(&self, glyph: &Glyph) -> i32 {
        let b = glyph.bbox();
        if self.order.is_vertical_source() { b.w } else { b.h }
    }

    /// Clustering distance in source pixels for this page.
    pub fn page_tolerance(&self, glyphs: &[Glyph]) -> f64 {
        if glyphs.is_empty() {
            return 0.0;
        }
        let mut extents: Vec<i32> = glyphs.iter().map(|g| self.extent(g)).collect();
        extents.sort_unstable();
        let n = extents.len();
        let median = extents[((n - 1) as f64 * 0.5 + 0.5) as usize];
        self.tolerance * median as f64
    }

    /// Group glyphs into columns, returned in reading order.
    pub fn cluster(&self, glyphs: Vec<Glyph>) -> Vec<Column> {
        let tolerance = self.page_tolerance(&glyphs);

        let mut glyphs = glyphs;
        glyphs.sort_by(|a, b| {
            self.along(a)
                .total_cmp(&self.along(b))
                .then_with(|| self.axis(a).total_cmp(&self.axis(b)))
                .then_with(|| a.id().cmp(&b.id()))
        });

        let mut columns: Vec<Column> = Vec::new();
        for glyph in glyphs {
            let axis = self.axis(&glyph);
            let mut best: Option<(usize, f64)> = None;
            for (i, col) in columns.iter().enumerate() {
                let dist = (col.axis_position() - axis).abs();
                if dist <= tolerance && best.is_none_or(|(_, d)| dist < d) {
                    best = Some((i, dist));
                }
            }
            match best {
                Some((i, _)) => columns[i].push(axis, glyph),
                None => columns.push(Column::open(axis, glyph)),
            }
        }

        // Stable, so equal positions keep their opening order
        let descending = matches!(self.order, ReadingOrder::RightToLeft);
        columns.sort_by(|a, b| {
            let ord = a.axis_position().total_cmp(&b.axis_position());
            if descending { ord.reverse() } else { ord }
        });
        columns
    }

    /// Resolve one page, continuing from `cursor`.
    ///
    /// Returns the page's glyphs in reading order together with the
    /// cursor for the next page.
    pub fn resolve(
        &self,
        glyphs: Vec<Glyph>,
        cursor: OrderCursor,
    ) -> (Vec<OrderedGlyph>, OrderCursor) {
        let page = glyphs.first().map(|g| g.source_page());
        let columns = self.cluster(glyphs);
        let column_count = columns.len();

        let mut cursor = cursor;
        let mut ordered = Vec::new();
        for column in columns {
            let column_id = cursor.next_column;
            cursor.next_column += 1;
            for glyph in column.into_glyphs() {
                ordered.push(OrderedGlyph::new(glyph, column_id, cursor.next_order));
                cursor.next_order += 1;
            }
        }

        debug!(
            page = ?page,
            columns = column_count,
            glyphs = ordered.len(),
            next_order = cursor.next_order,
            "resolved reading order"
        );
        (ordered, cursor)
    }
}
