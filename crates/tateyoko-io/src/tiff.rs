//! TIFF support
//!
//! Multipage TIFFs are the usual container for scanned books, so the
//! reader returns every directory as its own gray page.

use crate::convert::{gray_bytes, gray_pix, luma, over_white};
use crate::{IoError, IoResult};
use std::io::{Read, Seek, Write};
use tateyoko_core::Pix;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::Gray8;
use tiff::encoder::{Compression, DeflateLevel, TiffEncoder};
use tiff::tags::Tag;

/// Read the first page of a TIFF file
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;
    decode_page(&mut decoder)
}

/// Read all pages from a multipage TIFF file
pub fn read_tiff_multipage<R: Read + Seek>(reader: R) -> IoResult<Vec<Pix>> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let mut pages = Vec::new();
    loop {
        pages.push(decode_page(&mut decoder)?);
        if !decoder.more_images() {
            break;
        }
        decoder
            .next_image()
            .map_err(|e| IoError::DecodeError(format!("TIFF page navigation error: {}", e)))?;
    }
    Ok(pages)
}

/// Write pages as a Deflate-compressed gray multipage TIFF
pub fn write_tiff_multipage<W: Write + Seek>(pages: &[&Pix], writer: W) -> IoResult<()> {
    if pages.is_empty() {
        return Err(IoError::InvalidData("no pages to write".to_string()));
    }
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?
        .with_compression(Compression::Deflate(DeflateLevel::default()));

    for pix in pages {
        encoder
            .write_image::<Gray8>(pix.width(), pix.height(), &gray_bytes(pix))
            .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    }
    Ok(())
}

/// Decode the directory the decoder currently points at
fn decode_page<R: Read + Seek>(decoder: &mut Decoder<R>) -> IoResult<Pix> {
    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("Failed to get TIFF color type: {}", e)))?;
    // PhotometricInterpretation 0 = WhiteIsZero
    let white_is_zero = decoder
        .get_tag_u32(Tag::PhotometricInterpretation)
        .map(|v| v == 0)
        .unwrap_or(false);
    // ResolutionUnit 2 = inch, 3 = centimetre
    let per_inch = match decoder.get_tag_u32(Tag::ResolutionUnit) {
        Ok(2) => Some(1.0),
        Ok(3) => Some(2.54),
        _ => None,
    };
    let dpi = per_inch.and_then(|scale| {
        decoder
            .get_tag_f32(Tag::XResolution)
            .ok()
            .filter(|r| r.is_finite() && *r > 0.0)
            .map(|r| (r * scale).round() as u32)
    });

    let image = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;

    let n = (width * height) as usize;
    let mut gray = match (image, color_type) {
        (DecodingResult::U8(data), ColorType::Gray(1)) => {
            let bytes_per_row = width.div_ceil(8) as usize;
            if data.len() < bytes_per_row * height as usize {
                return Err(IoError::InvalidData("TIFF bilevel data too short".to_string()));
            }
            let mut gray = Vec::with_capacity(n);
            for y in 0..height as usize {
                let row = &data[y * bytes_per_row..(y + 1) * bytes_per_row];
                gray.extend((0..width as usize).map(|x| {
                    if (row[x / 8] >> (7 - x % 8)) & 1 != 0 { 255 } else { 0 }
                }));
            }
            gray
        }
        (DecodingResult::U8(data), ColorType::Gray(8)) => data,
        (DecodingResult::U16(data), ColorType::Gray(16)) => {
            data.iter().map(|v| (v >> 8) as u8).collect()
        }
        (DecodingResult::U8(data), ColorType::GrayA(8)) => data
            .chunks_exact(2)
            .map(|c| over_white(c[0], c[1]))
            .collect(),
        (DecodingResult::U8(data), ColorType::RGB(8)) => data
            .chunks_exact(3)
            .map(|c| luma(c[0], c[1], c[2]))
            .collect(),
        (DecodingResult::U8(data), ColorType::RGBA(8)) => data
            .chunks_exact(4)
            .map(|c| over_white(luma(c[0], c[1], c[2]), c[3]))
            .collect(),
        (_, other) => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF color type: {:?}",
                other
            )));
        }
    };
    if gray.len() < n {
        return Err(IoError::InvalidData(format!(
            "TIFF strip data too short: {} < {}",
            gray.len(),
            n
        )));
    }
    if white_is_zero {
        gray.iter_mut().for_each(|v| *v = 255 - *v);
    }

    gray_pix(width, height, &gray, dpi)
}
