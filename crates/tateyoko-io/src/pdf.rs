//! PDF output (write-only)
//!
//! Each composed page becomes one PDF page holding a single
//! Flate-compressed DeviceGray image, sized from the page resolution so
//! the physical page dimensions match the configured paper.
//!
//! Pages are compressed as they arrive ([`PdfPage::encode`]) and the
//! document structure is generated once all pages are known.

use crate::convert::gray_bytes;
use crate::{IoError, IoResult};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, TextStr};
use std::io::Write;
use tateyoko_core::Pix;

/// Resolution assumed when a page declares none
pub const DEFAULT_RESOLUTION: u32 = 300;

/// Points per inch in PDF coordinates
const POINTS_PER_INCH: f32 = 72.0;

/// One compressed page awaiting assembly
#[derive(Debug, Clone)]
pub struct PdfPage {
    width: u32,
    height: u32,
    resolution: u32,
    data: Vec<u8>,
}

impl PdfPage {
    /// Compress a 1 bpp or 8 bpp image as a gray page.
    pub fn encode(pix: &Pix) -> Self {
        let resolution = if pix.xres() > 0 {
            pix.xres()
        } else {
            DEFAULT_RESOLUTION
        };
        Self {
            width: pix.width(),
            height: pix.height(),
            resolution,
            data: compress_to_vec_zlib(&gray_bytes(pix), 6),
        }
    }

    /// Page size in points
    pub fn size_pt(&self) -> (f32, f32) {
        let res = self.resolution as f32;
        (
            self.width as f32 * POINTS_PER_INCH / res,
            self.height as f32 * POINTS_PER_INCH / res,
        )
    }
}

/// Assemble encoded pages into a PDF document
pub fn write_pdf_pages<W: Write>(
    pages: &[PdfPage],
    mut writer: W,
    title: Option<&str>,
) -> IoResult<()> {
    if pages.is_empty() {
        return Err(IoError::InvalidData("no pages provided".to_string()));
    }

    let mut pdf = Pdf::new();

    // Catalog(1), Pages(2), then [Page, Contents, XObject] per page
    let catalog_id = Ref::new(1);
    let pages_id = Ref::new(2);
    let page_refs: Vec<Ref> = (0..pages.len())
        .map(|i| Ref::new((3 + i * 3) as i32))
        .collect();

    pdf.catalog(catalog_id).pages(pages_id);
    if let Some(title) = title {
        let info_id = Ref::new((3 + pages.len() * 3) as i32);
        pdf.document_info(info_id).title(TextStr(title));
    }
    pdf.pages(pages_id)
        .kids(page_refs.iter().copied())
        .count(pages.len() as i32);

    for (i, page) in pages.iter().enumerate() {
        let page_id = page_refs[i];
        let contents_id = Ref::new((4 + i * 3) as i32);
        let image_id = Ref::new((5 + i * 3) as i32);
        let (width_pt, height_pt) = page.size_pt();

        let mut image = pdf.image_xobject(image_id, &page.data);
        image.filter(Filter::FlateDecode);
        image.width(page.width as i32);
        image.height(page.height as i32);
        image.color_space().device_gray();
        image.bits_per_component(8);
        image.finish();

        // Unit square scaled to the page; the image fills it
        let mut content = Content::new();
        content.save_state();
        content.transform([width_pt, 0.0, 0.0, height_pt, 0.0, 0.0]);
        content.x_object(Name(b"Im0"));
        content.restore_state();
        let content_data = content.finish();
        pdf.stream(contents_id, &content_data);

        let mut pdf_page = pdf.page(page_id);
        pdf_page.parent(pages_id);
        pdf_page.media_box(Rect::new(0.0, 0.0, width_pt, height_pt));
        pdf_page.contents(contents_id);
        pdf_page.resources().x_objects().pair(Name(b"Im0"), image_id);
        pdf_page.finish();
    }

    writer.write_all(&pdf.finish())?;
    Ok(())
}

/// Write images as a multi-page PDF
pub fn write_pdf_multi<W: Write>(images: &[&Pix], writer: W) -> IoResult<()> {
    let pages: Vec<PdfPage> = images.iter().map(|pix| PdfPage::encode(pix)).collect();
    write_pdf_pages(&pages, writer, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tateyoko_core::{PixMut, PixelDepth};

    fn page(w: u32, h: u32, dpi: u32) -> Pix {
        let mut pm = PixMut::new(w, h, PixelDepth::Bit8).unwrap();
        pm.fill(255).unwrap();
        pm.set_resolution(dpi, dpi);
        pm.into()
    }

    #[test]
    fn test_page_size_follows_resolution() {
        let p = PdfPage::encode(&page(600, 300, 300));
        assert_eq!(p.size_pt(), (144.0, 72.0));
        let p = PdfPage::encode(&Pix::new(300, 300, PixelDepth::Bit1).unwrap());
        assert_eq!(p.size_pt(), (72.0, 72.0));
    }

    #[test]
    fn test_multi_page_document() {
        let a = page(100, 100, 150);
        let b = page(100, 100, 150);
        let mut out = Vec::new();
        write_pdf_multi(&[&a, &b], &mut out).unwrap();
        assert!(out.starts_with(b"%PDF-"));
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("/Count 2"));
        assert!(text.contains("/FlateDecode"));
    }

    #[test]
    fn test_empty_document_is_an_error() {
        assert!(matches!(
            write_pdf_multi(&[], Vec::new()),
            Err(IoError::InvalidData(_))
        ));
    }
}
