//! Synthetic binary pages

use tateyoko_core::{Pix, PixMut, PixelDepth, Rect};

/// Draws known shapes into a blank 1 bpp page
pub struct PageBuilder {
    pix: PixMut,
}

impl PageBuilder {
    /// Blank page of the given size.
    ///
    /// # Panics
    ///
    /// Panics on a zero dimension.
    pub fn new(width: u32, height: u32) -> Self {
        let pix = PixMut::new(width, height, PixelDepth::Bit1)
            .unwrap_or_else(|e| panic!("blank page {width}x{height}: {e}"));
        Self { pix }
    }

    /// Solid filled rectangle.
    pub fn rect(mut self, x: i32, y: i32, w: i32, h: i32) -> Self {
        self.pix.fill_rect(&Rect::new_unchecked(x, y, w, h), 1);
        self
    }

    /// Same as [`rect`](Self::rect), taking a [`Rect`].
    pub fn fill(self, r: Rect) -> Self {
        self.rect(r.x, r.y, r.w, r.h)
    }

    /// Single pixel.
    pub fn dot(self, x: i32, y: i32) -> Self {
        self.rect(x, y, 1, 1)
    }

    /// Hollow rectangle with a 1 px outline.
    pub fn frame(self, x: i32, y: i32, w: i32, h: i32) -> Self {
        self.rect(x, y, w, 1)
            .rect(x, y + h - 1, w, 1)
            .rect(x, y, 1, h)
            .rect(x + w - 1, y, 1, h)
    }

    /// Diagonal staircase of single pixels, 8-connected but not 4-connected.
    pub fn diagonal(mut self, x: i32, y: i32, len: i32) -> Self {
        for i in 0..len {
            self.pix.fill_rect(&Rect::new_unchecked(x + i, y + i, 1, 1), 1);
        }
        self
    }

    pub fn build(self) -> Pix {
        self.pix.into()
    }
}

/// Regular grid of solid glyph blocks arranged in vertical columns
#[derive(Debug, Clone)]
pub struct GridLayout {
    pub columns: usize,
    pub rows: usize,
    pub glyph_w: i32,
    pub glyph_h: i32,
    /// Horizontal distance between column origins
    pub col_pitch: i32,
    /// Vertical distance between row origins
    pub row_pitch: i32,
    pub origin_x: i32,
    pub origin_y: i32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 2,
            rows: 3,
            glyph_w: 20,
            glyph_h: 20,
            col_pitch: 40,
            row_pitch: 30,
            origin_x: 10,
            origin_y: 10,
        }
    }
}

/// Render a grid of glyph blocks.
///
/// Returns the page and the block rectangles as `rects[column][row]`, with
/// columns indexed left to right and rows top to bottom.
pub fn grid_page(width: u32, height: u32, layout: &GridLayout) -> (Pix, Vec<Vec<Rect>>) {
    let mut builder = PageBuilder::new(width, height);
    let mut rects = Vec::with_capacity(layout.columns);
    for c in 0..layout.columns {
        let mut column = Vec::with_capacity(layout.rows);
        for r in 0..layout.rows {
            let rect = Rect::new_unchecked(
                layout.origin_x + c as i32 * layout.col_pitch,
                layout.origin_y + r as i32 * layout.row_pitch,
                layout.glyph_w,
                layout.glyph_h,
            );
            builder = builder.fill(rect);
            column.push(rect);
        }
        rects.push(column);
    }
    (builder.build(), rects)
}
