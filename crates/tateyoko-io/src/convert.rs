//! Conversions between codec byte buffers and `Pix`
//!
//! Every reader produces an 8 bpp gray page; every writer consumes gray
//! bytes. In 1 bpp images ink (`1`) maps to black (`0`).

use crate::IoResult;
use tateyoko_core::pix::{get_data_bit, get_data_byte, set_data_byte};
use tateyoko_core::{Pix, PixMut, PixelDepth};

/// ITU-R 601 luma
#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000) as u8
}

/// Composite a gray value with coverage `alpha` over white.
#[inline]
pub(crate) fn over_white(v: u8, alpha: u8) -> u8 {
    let (v, a) = (v as u32, alpha as u32);
    ((v * a + 255 * (255 - a) + 127) / 255) as u8
}

/// Build an 8 bpp page from row-major gray bytes.
pub(crate) fn gray_pix(width: u32, height: u32, gray: &[u8], dpi: Option<u32>) -> IoResult<Pix> {
    let mut pm = PixMut::new(width, height, PixelDepth::Bit8)?;
    if let Some(dpi) = dpi.filter(|d| *d > 0) {
        pm.set_resolution(dpi, dpi);
    }
    for (y, row) in gray.chunks_exact(width as usize).take(height as usize).enumerate() {
        let line = pm.row_data_mut(y as u32);
        for (x, &v) in row.iter().enumerate() {
            set_data_byte(line, x as u32, v as u32);
        }
    }
    Ok(pm.into())
}

/// Row-major gray bytes for a 1 bpp or 8 bpp image.
pub(crate) fn gray_bytes(pix: &Pix) -> Vec<u8> {
    let (w, h) = (pix.width(), pix.height());
    let mut out = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        let line = pix.row_data(y);
        match pix.depth() {
            PixelDepth::Bit1 => {
                out.extend((0..w).map(|x| if get_data_bit(line, x) != 0 { 0 } else { 255 }))
            }
            PixelDepth::Bit8 => out.extend((0..w).map(|x| get_data_byte(line, x) as u8)),
        }
    }
    out
}

/// Dots per inch from pixels per metre.
pub(crate) fn dpi_from_ppm(ppm: u32) -> u32 {
    (ppm as f64 * 0.0254).round() as u32
}

/// Pixels per metre from dots per inch.
pub(crate) fn ppm_from_dpi(dpi: u32) -> u32 {
    (dpi as f64 / 0.0254).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_round_trip() {
        let gray: Vec<u8> = (0..12).map(|v| v * 20).collect();
        let pix = gray_pix(4, 3, &gray, Some(150)).unwrap();
        assert_eq!(pix.get_pixel(3, 2), Some(220));
        assert_eq!(pix.xres(), 150);
        assert_eq!(gray_bytes(&pix), gray);
    }

    #[test]
    fn test_binary_ink_is_black() {
        let mut pm = PixMut::new(3, 1, PixelDepth::Bit1).unwrap();
        pm.set_pixel(1, 0, 1).unwrap();
        assert_eq!(gray_bytes(&pm.into()), vec![255, 0, 255]);
    }

    #[test]
    fn test_luma_and_alpha() {
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(over_white(0, 0), 255);
        assert_eq!(over_white(0, 255), 0);
        assert_eq!(dpi_from_ppm(ppm_from_dpi(300)), 300);
    }
}
