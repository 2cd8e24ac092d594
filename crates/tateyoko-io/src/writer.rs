//! Document writers
//!
//! A [`DocumentWriter`] receives composed pages in destination order and
//! encodes them. `finish` is called exactly once after the last page.

use crate::format::ImageFormat;
use crate::{IoError, IoResult, write_image};
use std::fs;
use std::path::{Path, PathBuf};
use tateyoko_core::ComposedPage;
use tracing::{debug, info};

/// Receives finished destination pages
pub trait DocumentWriter {
    fn write_page(&mut self, page: &ComposedPage) -> IoResult<()>;

    /// Flush the document. No pages are written afterwards.
    fn finish(&mut self) -> IoResult<()>;
}

/// Multi-page PDF file
#[cfg(feature = "pdf-format")]
#[derive(Debug)]
pub struct PdfDocumentWriter {
    path: PathBuf,
    title: Option<String>,
    pages: Vec<crate::pdf::PdfPage>,
}

#[cfg(feature = "pdf-format")]
impl PdfDocumentWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            title: None,
            pages: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(feature = "pdf-format")]
impl DocumentWriter for PdfDocumentWriter {
    fn write_page(&mut self, page: &ComposedPage) -> IoResult<()> {
        self.pages.push(crate::pdf::PdfPage::encode(&page.pix));
        debug!(page = page.index, "encoded PDF page");
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        let file = fs::File::create(&self.path)?;
        crate::pdf::write_pdf_pages(
            &self.pages,
            std::io::BufWriter::new(file),
            self.title.as_deref(),
        )?;
        info!(path = %self.path.display(), pages = self.pages.len(), "wrote PDF");
        self.pages.clear();
        Ok(())
    }
}

/// Multipage TIFF file
#[cfg(feature = "tiff-format")]
#[derive(Debug)]
pub struct TiffDocumentWriter {
    path: PathBuf,
    pages: Vec<tateyoko_core::Pix>,
}

#[cfg(feature = "tiff-format")]
impl TiffDocumentWriter {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            pages: Vec::new(),
        }
    }
}

#[cfg(feature = "tiff-format")]
impl DocumentWriter for TiffDocumentWriter {
    fn write_page(&mut self, page: &ComposedPage) -> IoResult<()> {
        self.pages.push(page.pix.clone());
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        let file = fs::File::create(&self.path)?;
        let refs: Vec<_> = self.pages.iter().collect();
        crate::tiff::write_tiff_multipage(&refs, std::io::BufWriter::new(file))?;
        info!(path = %self.path.display(), pages = self.pages.len(), "wrote TIFF");
        self.pages.clear();
        Ok(())
    }
}

/// One image file per page: `page_0001.png`, `page_0002.png`, ...
#[derive(Debug)]
pub struct ImageSequenceWriter {
    dir: PathBuf,
    format: ImageFormat,
    quality: u8,
    written: Vec<PathBuf>,
}

impl ImageSequenceWriter {
    /// Create the output directory if needed.
    ///
    /// # Errors
    ///
    /// [`IoError::UnsupportedFormat`] unless `format` is PNG or JPEG.
    pub fn new<P: AsRef<Path>>(dir: P, format: ImageFormat) -> IoResult<Self> {
        if !matches!(format, ImageFormat::Png | ImageFormat::Jpeg) {
            return Err(IoError::UnsupportedFormat(format!(
                "image sequences are png or jpeg, not {format}"
            )));
        }
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
            format,
            quality: 95,
            written: Vec::new(),
        })
    }

    /// JPEG quality, `1..=100`
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Files written so far, in page order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl DocumentWriter for ImageSequenceWriter {
    fn write_page(&mut self, page: &ComposedPage) -> IoResult<()> {
        let path = self.dir.join(format!(
            "page_{:04}.{}",
            page.index + 1,
            self.format.extension()
        ));
        write_image(&page.pix, &path, self.format, self.quality)?;
        debug!(path = %path.display(), "wrote page image");
        self.written.push(path);
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        info!(dir = %self.dir.display(), pages = self.written.len(), "wrote page images");
        Ok(())
    }
}

/// Keeps composed pages in memory
#[derive(Debug, Default)]
pub struct MemoryDocumentWriter {
    pub pages: Vec<ComposedPage>,
    pub finished: bool,
}

impl DocumentWriter for MemoryDocumentWriter {
    fn write_page(&mut self, page: &ComposedPage) -> IoResult<()> {
        self.pages.push(page.clone());
        Ok(())
    }

    fn finish(&mut self) -> IoResult<()> {
        self.finished = true;
        Ok(())
    }
}
