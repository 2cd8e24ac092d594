//! PNG support
//!
//! Any PNG color type is read as an 8 bpp gray page: color is reduced to
//! luma, alpha is composited over white and palettes are expanded.

use crate::convert::{dpi_from_ppm, gray_bytes, gray_pix, luma, over_white, ppm_from_dpi};
use crate::{IoError, IoResult};
use png::{BitDepth, ColorType, Decoder, Encoder, PixelDimensions, Unit};
use std::io::{BufRead, Seek, Write};
use tateyoko_core::{Pix, PixelDepth};

/// Fetch sample `index` of a row at `bits` per sample, unscaled.
#[inline]
fn raw_sample(row: &[u8], index: usize, bits: u8) -> u16 {
    match bits {
        16 => ((row[index * 2] as u16) << 8) | row[index * 2 + 1] as u16,
        8 => row[index] as u16,
        _ => {
            let per_byte = 8 / bits as usize;
            let byte = row[index / per_byte];
            let shift = 8 - bits as usize * (index % per_byte + 1);
            ((byte >> shift) & ((1u16 << bits) - 1) as u8) as u16
        }
    }
}

/// Fetch a sample scaled to 8 bits.
#[inline]
fn sample8(row: &[u8], index: usize, bits: u8) -> u8 {
    let v = raw_sample(row, index, bits);
    match bits {
        16 => (v >> 8) as u8,
        8 => v as u8,
        _ => (v * 255 / ((1u16 << bits) - 1)) as u8,
    }
}

/// Read a PNG image as an 8 bpp gray page
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let decoder = Decoder::new(reader);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let (width, height) = (info.width, info.height);
    let color_type = info.color_type;
    let bits = info.bit_depth as u8;
    let palette = info.palette.as_ref().map(|p| p.to_vec());
    let dpi = info
        .pixel_dims
        .as_ref()
        .filter(|d| d.unit == Unit::Meter)
        .map(|d| dpi_from_ppm(d.xppu));

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;
    let line_size = output_info.line_size;

    let mut gray = Vec::with_capacity((width * height) as usize);
    for y in 0..height as usize {
        let row = &buf[y * line_size..(y + 1) * line_size];
        for x in 0..width as usize {
            let v = match color_type {
                ColorType::Grayscale => sample8(row, x, bits),
                ColorType::GrayscaleAlpha => {
                    over_white(sample8(row, x * 2, bits), sample8(row, x * 2 + 1, bits))
                }
                ColorType::Rgb => luma(
                    sample8(row, x * 3, bits),
                    sample8(row, x * 3 + 1, bits),
                    sample8(row, x * 3 + 2, bits),
                ),
                ColorType::Rgba => over_white(
                    luma(
                        sample8(row, x * 4, bits),
                        sample8(row, x * 4 + 1, bits),
                        sample8(row, x * 4 + 2, bits),
                    ),
                    sample8(row, x * 4 + 3, bits),
                ),
                ColorType::Indexed => {
                    let idx = raw_sample(row, x, bits) as usize * 3;
                    match palette.as_deref() {
                        Some(p) if idx + 2 < p.len() => luma(p[idx], p[idx + 1], p[idx + 2]),
                        _ => {
                            return Err(IoError::InvalidData(format!(
                                "palette index {} out of range",
                                idx / 3
                            )));
                        }
                    }
                }
            };
            gray.push(v);
        }
    }

    gray_pix(width, height, &gray, dpi)
}

/// Write a 1 bpp or 8 bpp image as a grayscale PNG.
///
/// 1 bpp images are written at bit depth 1 with ink as black.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let (width, height) = (pix.width(), pix.height());
    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(ColorType::Grayscale);
    if pix.xres() > 0 {
        let ppm = ppm_from_dpi(pix.xres());
        encoder.set_pixel_dims(Some(PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: Unit::Meter,
        }));
    }

    let data = match pix.depth() {
        PixelDepth::Bit1 => {
            encoder.set_depth(BitDepth::One);
            let bytes_per_row = width.div_ceil(8) as usize;
            let mut data = Vec::with_capacity(bytes_per_row * height as usize);
            for y in 0..height {
                let row: Vec<u8> = pix
                    .row_data(y)
                    .iter()
                    .flat_map(|word| word.to_be_bytes())
                    .map(|b| !b)
                    .take(bytes_per_row)
                    .collect();
                data.extend_from_slice(&row);
            }
            data
        }
        PixelDepth::Bit8 => {
            encoder.set_depth(BitDepth::Eight);
            gray_bytes(pix)
        }
    };

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    Ok(())
}
