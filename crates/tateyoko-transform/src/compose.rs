//! Page composition
//!
//! Every destination page starts as an 8 bpp canvas of the configured
//! size, filled with the background gray. Each placed glyph mask is
//! resampled to its footprint and blended onto the canvas: the scaled
//! coverage decides how far each pixel moves from the background toward
//! the ink level.
//!
//! Canvases are disjoint, so pages are composed in parallel. The output
//! is always in destination-page order.

use crate::scale::{ScaleMethod, scale_to_size};
use crate::{TransformError, TransformResult};
use rayon::prelude::*;
use tateyoko_core::pix::{get_data_bit, get_data_byte, set_data_byte};
use tateyoko_core::{Background, ComposedPage, LayoutParameters, Pix, PixMut, PixelDepth, Placement};
use tracing::debug;

/// A placement together with the glyph mask it places
///
/// The mask is moved in; the composer never hands it back.
#[derive(Debug, Clone)]
pub struct PlacedGlyph {
    pub placement: Placement,
    pub mask: Pix,
}

/// Rasterizes placed glyphs onto destination canvases
#[derive(Debug, Clone, Copy)]
pub struct PageComposer {
    width: u32,
    height: u32,
    dpi: u32,
    background: Background,
    method: ScaleMethod,
}

impl PageComposer {
    pub fn new(params: &LayoutParameters) -> Self {
        Self {
            width: params.page_width(),
            height: params.page_height(),
            dpi: params.dpi(),
            background: params.background(),
            method: ScaleMethod::default(),
        }
    }

    pub fn with_method(mut self, method: ScaleMethod) -> Self {
        self.method = method;
        self
    }

    pub fn method(&self) -> ScaleMethod {
        self.method
    }

    /// An empty destination page.
    pub fn blank_page(&self, index: usize) -> TransformResult<ComposedPage> {
        let mut canvas = PixMut::new(self.width, self.height, PixelDepth::Bit8)?;
        canvas.fill(self.background.0)?;
        canvas.set_resolution(self.dpi, self.dpi);
        Ok(ComposedPage {
            index,
            pix: canvas.into(),
        })
    }

    /// Compose one destination page from the glyphs placed on it.
    pub fn compose_page(
        &self,
        index: usize,
        glyphs: Vec<PlacedGlyph>,
    ) -> TransformResult<ComposedPage> {
        let mut canvas = self.blank_page(index)?.pix.into_mut();
        let count = glyphs.len();
        for placed in glyphs {
            if placed.placement.dest_page != index {
                return Err(TransformError::InvalidParameters(format!(
                    "glyph {} belongs on page {}, not {index}",
                    placed.placement.glyph_id, placed.placement.dest_page
                )));
            }
            self.draw(&mut canvas, &placed)?;
        }
        debug!(page = index, glyphs = count, "composed page");
        Ok(ComposedPage {
            index,
            pix: canvas.into(),
        })
    }

    /// Compose `page_count` pages in parallel.
    ///
    /// # Errors
    ///
    /// [`TransformError::InvalidParameters`] if a placement targets a page
    /// at or past `page_count`.
    pub fn compose(
        &self,
        page_count: usize,
        glyphs: Vec<PlacedGlyph>,
    ) -> TransformResult<Vec<ComposedPage>> {
        group_by_page(page_count, glyphs)?
            .into_par_iter()
            .enumerate()
            .map(|(index, page)| self.compose_page(index, page))
            .collect()
    }

    fn draw(&self, canvas: &mut PixMut, placed: &PlacedGlyph) -> TransformResult<()> {
        let p = &placed.placement;
        let scaled = scale_to_size(&placed.mask, p.dest_width, p.dest_height, self.method)?;
        let bg = self.background.0 as f64;
        let ink = self.background.ink() as f64;

        for sy in 0..scaled.height() {
            let ty = p.dest_y + sy;
            if ty >= self.height {
                break;
            }
            let src = scaled.row_data(sy);
            for sx in 0..scaled.width() {
                let tx = p.dest_x + sx;
                if tx >= self.width {
                    break;
                }
                let coverage = match scaled.depth() {
                    PixelDepth::Bit1 => get_data_bit(src, sx) as f64,
                    PixelDepth::Bit8 => get_data_byte(src, sx) as f64 / 255.0,
                };
                if coverage <= 0.0 {
                    continue;
                }
                let line = canvas.row_data_mut(ty);
                let current = get_data_byte(line, tx) as f64;
                // Overlapping footprints accumulate ink
                let blended = current + (ink - bg) * coverage;
                let lo = bg.min(ink);
                let hi = bg.max(ink);
                set_data_byte(line, tx, blended.round().clamp(lo, hi) as u32);
            }
        }
        Ok(())
    }
}

/// Split placed glyphs into per-page buckets, keeping their order.
pub fn group_by_page(
    page_count: usize,
    glyphs: Vec<PlacedGlyph>,
) -> TransformResult<Vec<Vec<PlacedGlyph>>> {
    let mut pages: Vec<Vec<PlacedGlyph>> = (0..page_count).map(|_| Vec::new()).collect();
    for placed in glyphs {
        let page = placed.placement.dest_page;
        pages
            .get_mut(page)
            .ok_or_else(|| {
                TransformError::InvalidParameters(format!(
                    "placement on page {page} but only {page_count} pages planned"
                ))
            })?
            .push(placed);
    }
    Ok(pages)
}
