//! tateyoko-io - Page sources and document writers
//!
//! The engine itself never touches files. This crate provides the
//! reference collaborators around it:
//!
//! - [`PageSource`] / [`ImageFileSource`] - decode PNG, JPEG and TIFF
//!   pages and binarize them
//! - [`DocumentWriter`] / [`PdfDocumentWriter`] / [`ImageSequenceWriter`]
//!   - encode composed pages
//!
//! Codecs other than PNG sit behind cargo features (`jpeg`,
//! `tiff-format`, `pdf-format`), all enabled by default.

mod convert;
pub mod error;
pub mod format;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "pdf-format")]
pub mod pdf;
pub mod png;
pub mod source;
#[cfg(feature = "tiff-format")]
pub mod tiff;
pub mod writer;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};
pub use source::{ImageFileSource, MemoryPageSource, PageSource};
#[cfg(feature = "pdf-format")]
pub use writer::PdfDocumentWriter;
#[cfg(feature = "tiff-format")]
pub use writer::TiffDocumentWriter;
pub use writer::{DocumentWriter, ImageSequenceWriter, MemoryDocumentWriter};

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tateyoko_core::Pix;

/// Read every page of an image file as 8 bpp gray.
///
/// PNG and JPEG files hold one page; TIFF files may hold several.
pub fn read_image_pages<P: AsRef<Path>>(path: P) -> IoResult<Vec<Pix>> {
    let format = detect_format(&path)?;
    let reader = BufReader::new(File::open(&path)?);
    match format {
        ImageFormat::Png => Ok(vec![png::read_png(reader)?]),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => Ok(vec![jpeg::read_jpeg(reader)?]),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::read_tiff_multipage(reader),
        other => Err(IoError::UnsupportedFormat(format!(
            "cannot read {other} input"
        ))),
    }
}

/// Read the first page of an image file as 8 bpp gray.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    read_image_pages(path)?
        .into_iter()
        .next()
        .ok_or_else(|| IoError::InvalidData("image has no pages".to_string()))
}

/// Write a single page to a file.
///
/// `quality` only applies to JPEG.
#[cfg_attr(not(feature = "jpeg"), allow(unused_variables))]
pub fn write_image<P: AsRef<Path>>(
    pix: &Pix,
    path: P,
    format: ImageFormat,
    quality: u8,
) -> IoResult<()> {
    let file = File::create(&path)?;
    let writer = BufWriter::new(file);
    match format {
        ImageFormat::Png => png::write_png(pix, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(pix, writer, quality),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::write_tiff_multipage(&[pix], writer),
        #[cfg(feature = "pdf-format")]
        ImageFormat::Pdf => pdf::write_pdf_multi(&[pix], writer),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{other} support is not enabled"
        ))),
    }
}
