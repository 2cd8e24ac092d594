//! Image scaling operations
//!
//! Glyph masks are resampled to their destination footprint with one of
//! two methods:
//!
//! - Sampling (nearest neighbor): keeps the input depth, hard edges
//! - Area mapping: each destination pixel averages the source area it
//!   covers, weighted by overlap. A 1 bpp input produces an 8 bpp
//!   coverage map where 255 means fully inked; an 8 bpp input produces
//!   the mean gray level.

use crate::{TransformError, TransformResult};
use std::fmt;
use std::str::FromStr;
use tateyoko_core::pix::{get_data_bit, get_data_byte, set_data_bit, set_data_byte};
use tateyoko_core::{Pix, PixMut, PixelDepth};

/// Scaling method to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScaleMethod {
    /// Nearest-neighbor sampling (fastest, pixelated results)
    Sampling,
    /// Area mapping (anti-aliased)
    #[default]
    AreaMap,
}

impl ScaleMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ScaleMethod::Sampling => "sampling",
            ScaleMethod::AreaMap => "area_map",
        }
    }
}

impl fmt::Display for ScaleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScaleMethod {
    type Err = TransformError;

    fn from_str(s: &str) -> TransformResult<Self> {
        match s {
            "sampling" | "nearest" => Ok(ScaleMethod::Sampling),
            "area_map" | "area" => Ok(ScaleMethod::AreaMap),
            other => Err(TransformError::InvalidParameters(format!(
                "unknown resample method: {other}"
            ))),
        }
    }
}

fn check_size(width: u32, height: u32) -> TransformResult<()> {
    if width == 0 || height == 0 {
        return Err(TransformError::InvalidParameters(format!(
            "target size must be non-zero, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Scale an image to exactly `width` x `height`.
///
/// See the module docs for the output depth of each method.
pub fn scale_to_size(
    pix: &Pix,
    width: u32,
    height: u32,
    method: ScaleMethod,
) -> TransformResult<Pix> {
    match method {
        ScaleMethod::Sampling => scale_by_sampling(pix, width, height),
        ScaleMethod::AreaMap => scale_by_area_map(pix, width, height),
    }
}

/// Scale an image using nearest-neighbor sampling.
///
/// The output has the same depth and resolution as the input.
pub fn scale_by_sampling(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    check_size(width, height)?;
    if pix.width() == width && pix.height() == height {
        return Ok(pix.clone());
    }

    let sample = |dst: u32, src: u32| -> Vec<u32> {
        let ratio = src as f64 / dst as f64;
        (0..dst)
            .map(|d| (((d as f64 + 0.5) * ratio) as u32).min(src - 1))
            .collect()
    };
    let xmap = sample(width, pix.width());
    let ymap = sample(height, pix.height());

    let mut out = PixMut::new(width, height, pix.depth())?;
    out.set_resolution(pix.xres(), pix.yres());
    for (dy, &sy) in ymap.iter().enumerate() {
        let src = pix.row_data(sy);
        let dst = out.row_data_mut(dy as u32);
        for (dx, &sx) in xmap.iter().enumerate() {
            match pix.depth() {
                PixelDepth::Bit1 => set_data_bit(dst, dx as u32, get_data_bit(src, sx)),
                PixelDepth::Bit8 => set_data_byte(dst, dx as u32, get_data_byte(src, sx)),
            }
        }
    }
    Ok(out.into())
}

/// Source pixels overlapped by each destination pixel along one axis,
/// with the overlapped fraction of each.
fn area_spans(src: u32, dst: u32) -> Vec<Vec<(u32, f64)>> {
    let ratio = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * ratio;
            let end = (start + ratio).min(src as f64);
            let mut span = Vec::new();
            let mut s = start.floor() as u32;
            while s < src && (s as f64) < end {
                let lo = start.max(s as f64);
                let hi = end.min(s as f64 + 1.0);
                if hi > lo {
                    span.push((s, hi - lo));
                }
                s += 1;
            }
            span
        })
        .collect()
}

/// Scale an image by area mapping. The output is always 8 bpp.
pub fn scale_by_area_map(pix: &Pix, width: u32, height: u32) -> TransformResult<Pix> {
    check_size(width, height)?;
    let xspans = area_spans(pix.width(), width);
    let yspans = area_spans(pix.height(), height);
    let depth = pix.depth();
    let gain = match depth {
        PixelDepth::Bit1 => 255.0,
        PixelDepth::Bit8 => 1.0,
    };

    let mut out = PixMut::new(width, height, PixelDepth::Bit8)?;
    out.set_resolution(pix.xres(), pix.yres());
    for (dy, yspan) in yspans.iter().enumerate() {
        let wy_total: f64 = yspan.iter().map(|&(_, w)| w).sum();
        let dst = out.row_data_mut(dy as u32);
        for (dx, xspan) in xspans.iter().enumerate() {
            let wx_total: f64 = xspan.iter().map(|&(_, w)| w).sum();
            let mut acc = 0.0;
            for &(sy, wy) in yspan {
                let line = pix.row_data(sy);
                for &(sx, wx) in xspan {
                    let v = match depth {
                        PixelDepth::Bit1 => get_data_bit(line, sx),
                        PixelDepth::Bit8 => get_data_byte(line, sx),
                    };
                    acc += v as f64 * wx * wy;
                }
            }
            let total = wx_total * wy_total;
            let val = if total > 0.0 { gain * acc / total } else { 0.0 };
            set_data_byte(dst, dx as u32, val.round().clamp(0.0, 255.0) as u32);
        }
    }
    Ok(out.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tateyoko_core::Rect;

    fn solid(w: u32, h: u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit1).unwrap();
        pm.fill_rect(&Rect::new_unchecked(0, 0, w as i32, h as i32), 1);
        pm.into()
    }

    #[test]
    fn test_sampling_keeps_depth() {
        let s = scale_by_sampling(&solid(3, 4), 6, 8).unwrap();
        assert_eq!(s.depth(), PixelDepth::Bit1);
        assert_eq!(s.count_foreground(), 48);
        assert_eq!(scale_by_sampling(&solid(3, 4), 3, 4).unwrap(), solid(3, 4));
    }

    #[test]
    fn test_area_map_coverage() {
        // Left half inked
        let mut pm = PixMut::new(2, 2, PixelDepth::Bit1).unwrap();
        pm.set_pixel(0, 0, 1).unwrap();
        pm.set_pixel(0, 1, 1).unwrap();
        let half: Pix = pm.into();
        let c = scale_by_area_map(&half, 1, 1).unwrap();
        assert_eq!(c.depth(), PixelDepth::Bit8);
        assert_eq!(c.get_pixel(0, 0), Some(128));

        let up = scale_by_area_map(&solid(2, 2), 3, 3).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(up.get_pixel(x, y), Some(255));
            }
        }
    }

    #[test]
    fn test_area_map_gray_mean() {
        let mut pm = PixMut::new(2, 1, PixelDepth::Bit8).unwrap();
        pm.set_pixel(0, 0, 100).unwrap();
        pm.set_pixel(1, 0, 200).unwrap();
        let g = scale_by_area_map(&pm.into(), 1, 1).unwrap();
        assert_eq!(g.get_pixel(0, 0), Some(150));
    }

    #[test]
    fn test_fractional_spans() {
        let spans = area_spans(3, 2);
        assert_eq!(spans[0], vec![(0, 1.0), (1, 0.5)]);
        assert_eq!(spans[1], vec![(1, 0.5), (2, 1.0)]);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(scale_to_size(&solid(2, 2), 0, 4, ScaleMethod::AreaMap).is_err());
        assert!("bicubic".parse::<ScaleMethod>().is_err());
        assert_eq!("sampling".parse::<ScaleMethod>().unwrap(), ScaleMethod::Sampling);
    }
}
