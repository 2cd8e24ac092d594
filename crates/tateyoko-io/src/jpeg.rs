//! JPEG support
//!
//! Reads with `jpeg-decoder` (any pixel format, reduced to gray) and
//! writes 8-bit luma with `jpeg-encoder`.

use crate::convert::{gray_bytes, gray_pix, luma};
use crate::{IoError, IoResult};
use jpeg_decoder::PixelFormat;
use jpeg_encoder::{ColorType, Encoder, PixelDensity, PixelDensityUnit};
use std::io::{Read, Write};
use tateyoko_core::Pix;

/// Read a JPEG image as an 8 bpp gray page
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = jpeg_decoder::Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;
    let (width, height) = (info.width as u32, info.height as u32);

    let gray: Vec<u8> = match info.pixel_format {
        PixelFormat::L8 => pixels,
        // 16-bit samples come out big-endian
        PixelFormat::L16 => pixels.chunks_exact(2).map(|c| c[0]).collect(),
        PixelFormat::RGB24 => pixels
            .chunks_exact(3)
            .map(|c| luma(c[0], c[1], c[2]))
            .collect(),
        PixelFormat::CMYK32 => pixels
            .chunks_exact(4)
            .map(|c| {
                let k = 255 - c[3] as u32;
                let ch = |v: u8| ((255 - v as u32) * k / 255) as u8;
                luma(ch(c[0]), ch(c[1]), ch(c[2]))
            })
            .collect(),
    };

    gray_pix(width, height, &gray, None)
}

/// Write a 1 bpp or 8 bpp image as a gray JPEG.
///
/// `quality` is clamped to `1..=100`.
pub fn write_jpeg<W: Write>(pix: &Pix, writer: W, quality: u8) -> IoResult<()> {
    let (width, height) = (pix.width(), pix.height());
    let (w16, h16) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "{}x{} exceeds the JPEG size limit",
                width, height
            )));
        }
    };

    let mut encoder = Encoder::new(writer, quality.clamp(1, 100));
    if let Ok(dpi) = u16::try_from(pix.xres())
        && dpi > 0
    {
        encoder.set_density(PixelDensity {
            density: (dpi, dpi),
            unit: PixelDensityUnit::Inches,
        });
    }
    encoder
        .encode(&gray_bytes(pix), w16, h16, ColorType::Luma)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}
