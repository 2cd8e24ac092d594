//! Raster operations
//!
//! The handful of region operations the engine needs: counting ink,
//! OR-ing masks together when fragments merge, filling canvases and
//! turning gray into binary.

use super::{Pix, PixMut, PixelDepth, get_data_bit, get_data_byte, set_data_bit};
use crate::error::{Error, Result};
use crate::rect::Rect;

impl Pix {
    /// Count foreground pixels of a 1 bpp image.
    ///
    /// For 8 bpp images, counts non-zero pixels.
    pub fn count_foreground(&self) -> u64 {
        match self.depth() {
            PixelDepth::Bit1 => {
                // Padding bits past `width` are always zero
                self.data().iter().map(|w| w.count_ones() as u64).sum()
            }
            PixelDepth::Bit8 => {
                let mut count = 0u64;
                for y in 0..self.height() {
                    let line = self.row_data(y);
                    count += (0..self.width())
                        .filter(|&x| get_data_byte(line, x) != 0)
                        .count() as u64;
                }
                count
            }
        }
    }

    /// Convert an 8 bpp gray image to 1 bpp.
    ///
    /// Pixels darker than `threshold` become foreground. A 1 bpp input is
    /// returned unchanged.
    pub fn threshold_to_binary(&self, threshold: u8) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit1 {
            return Ok(self.clone());
        }
        let mut out = PixMut::new(self.width(), self.height(), PixelDepth::Bit1)?;
        out.set_resolution(self.xres(), self.yres());
        for y in 0..self.height() {
            let src = self.row_data(y);
            let dst = out.row_data_mut(y);
            for x in 0..self.width() {
                if get_data_byte(src, x) < u32::from(threshold) {
                    set_data_bit(dst, x, 1);
                }
            }
        }
        Ok(out.into())
    }
}

impl PixMut {
    /// OR a 1 bpp `src` into this 1 bpp image with its origin at `(dx, dy)`.
    ///
    /// Source pixels that land outside this image are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleDepths`] unless both images are 1 bpp.
    pub fn or_from(&mut self, src: &Pix, dx: i32, dy: i32) -> Result<()> {
        if self.depth() != PixelDepth::Bit1 || src.depth() != PixelDepth::Bit1 {
            return Err(Error::IncompatibleDepths(
                self.depth().bits(),
                src.depth().bits(),
            ));
        }
        let (w, h) = (self.width() as i32, self.height() as i32);
        for sy in 0..src.height() as i32 {
            let ty = sy + dy;
            if ty < 0 || ty >= h {
                continue;
            }
            let line = src.row_data(sy as u32);
            for sx in 0..src.width() as i32 {
                let tx = sx + dx;
                if tx < 0 || tx >= w || get_data_bit(line, sx as u32) == 0 {
                    continue;
                }
                set_data_bit(self.row_data_mut(ty as u32), tx as u32, 1);
            }
        }
        Ok(())
    }

    /// Set every pixel of an 8 bpp image to `val`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for 1 bpp images.
    pub fn fill(&mut self, val: u8) -> Result<()> {
        if self.depth() != PixelDepth::Bit8 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        let v = u32::from(val);
        let word = (v << 24) | (v << 16) | (v << 8) | v;
        self.data_mut().fill(word);
        Ok(())
    }

    /// Set every pixel inside `rect` (clipped to the image) to `val`.
    pub fn fill_rect(&mut self, rect: &Rect, val: u32) {
        let Some(r) = rect.clip(self.width() as i32, self.height() as i32) else {
            return;
        };
        for y in r.y..r.bottom() {
            for x in r.x..r.right() {
                self.set_pixel_unchecked(x as u32, y as u32, val);
            }
        }
    }
}
