//! Pixel access
//!
//! Word-level helpers mirror the packing described in the parent module:
//! bit `x` of a 1 bpp row lives in word `x / 32` at shift `31 - x % 32`,
//! byte `x` of an 8 bpp row lives in word `x / 4` at shift `24 - 8 * (x % 4)`.

use super::{Pix, PixMut, PixelDepth};
use crate::error::{Error, Result};

/// Read one bit from a packed 1 bpp row.
#[inline]
pub fn get_data_bit(line: &[u32], x: u32) -> u32 {
    (line[(x >> 5) as usize] >> (31 - (x & 31))) & 1
}

/// Write one bit into a packed 1 bpp row.
#[inline]
pub fn set_data_bit(line: &mut [u32], x: u32, val: u32) {
    let word = &mut line[(x >> 5) as usize];
    let mask = 1u32 << (31 - (x & 31));
    if val & 1 != 0 {
        *word |= mask;
    } else {
        *word &= !mask;
    }
}

/// Read one byte from a packed 8 bpp row.
#[inline]
pub fn get_data_byte(line: &[u32], x: u32) -> u32 {
    (line[(x >> 2) as usize] >> (24 - 8 * (x & 3))) & 0xff
}

/// Write one byte into a packed 8 bpp row.
#[inline]
pub fn set_data_byte(line: &mut [u32], x: u32, val: u32) {
    let word = &mut line[(x >> 2) as usize];
    let shift = 24 - 8 * (x & 3);
    *word = (*word & !(0xff << shift)) | ((val & 0xff) << shift);
}

#[inline]
fn read(line: &[u32], depth: PixelDepth, x: u32) -> u32 {
    match depth {
        PixelDepth::Bit1 => get_data_bit(line, x),
        PixelDepth::Bit8 => get_data_byte(line, x),
    }
}

impl Pix {
    /// Get a pixel value, or `None` when `(x, y)` is outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(read(self.row_data(y), self.depth(), x))
    }

    /// Get a pixel value without the bounds check on `x`.
    ///
    /// # Panics
    ///
    /// Panics if `y` is outside the image.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read(self.row_data(y), self.depth(), x)
    }
}

impl PixMut {
    /// Get a pixel value, or `None` when `(x, y)` is outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let wpl = self.wpl() as usize;
        let line = &self.data()[y as usize * wpl..(y as usize + 1) * wpl];
        Some(read(line, self.depth(), x))
    }

    /// Set a pixel value. The value is masked to the image depth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `(x, y)` is outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value without the bounds check on `x`.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        let line = self.row_data_mut(y);
        match depth {
            PixelDepth::Bit1 => set_data_bit(line, x, val),
            PixelDepth::Bit8 => set_data_byte(line, x, val),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_packing_msb_first() {
        let mut line = [0u32; 2];
        set_data_bit(&mut line, 0, 1);
        set_data_bit(&mut line, 33, 1);
        assert_eq!(line[0], 0x8000_0000);
        assert_eq!(line[1], 0x4000_0000);
        assert_eq!(get_data_bit(&line, 33), 1);
        set_data_bit(&mut line, 0, 0);
        assert_eq!(line[0], 0);
    }

    #[test]
    fn test_byte_packing() {
        let mut line = [0u32; 1];
        set_data_byte(&mut line, 1, 0xab);
        assert_eq!(line[0], 0x00ab_0000);
        assert_eq!(get_data_byte(&line, 1), 0xab);
        set_data_byte(&mut line, 1, 0x01);
        assert_eq!(get_data_byte(&line, 1), 0x01);
    }

    #[test]
    fn test_set_get_pixel() {
        let mut pm = PixMut::new(10, 3, PixelDepth::Bit8).unwrap();
        pm.set_pixel(9, 2, 200).unwrap();
        assert_eq!(pm.get_pixel(9, 2), Some(200));
        assert!(pm.set_pixel(10, 0, 1).is_err());

        let pix: Pix = pm.into();
        assert_eq!(pix.get_pixel(9, 2), Some(200));
        assert_eq!(pix.get_pixel(10, 2), None);
    }
}
