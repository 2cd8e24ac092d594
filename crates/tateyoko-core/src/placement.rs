//! Destination placements and composed pages

use crate::glyph::GlyphId;
use crate::pix::Pix;
use crate::rect::Rect;

/// Where one glyph lands in the relaid-out document
///
/// Created by the layout planner and consumed once by the page composer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub glyph_id: GlyphId,
    /// Reading-order position of the placed glyph
    pub order_index: usize,
    pub dest_page: usize,
    pub dest_x: u32,
    pub dest_y: u32,
    /// Scaled footprint width
    pub dest_width: u32,
    /// Scaled footprint height
    pub dest_height: u32,
    pub dest_scale: f64,
}

impl Placement {
    /// Destination footprint on its page.
    pub fn dest_rect(&self) -> Rect {
        Rect::new_unchecked(
            self.dest_x as i32,
            self.dest_y as i32,
            self.dest_width as i32,
            self.dest_height as i32,
        )
    }
}

/// One finished destination page
///
/// `pix` is an 8 bpp canvas whose resolution carries the declared dpi.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPage {
    pub index: usize,
    pub pix: Pix,
}

impl ComposedPage {
    /// Declared resolution in pixels per inch.
    pub fn dpi(&self) -> u32 {
        self.pix.xres()
    }
}
