//! Page source and document writer regression test
//!
//! Binary pages written in every supported format are read back through
//! `ImageFileSource`; composed pages go out through each writer.

use tateyoko_core::{ComposedPage, Pix, PixMut, PixelDepth, Rect};
use tateyoko_io::{
    DocumentWriter, ImageFileSource, ImageFormat, ImageSequenceWriter, PageSource,
    PdfDocumentWriter, TiffDocumentWriter, detect_format, read_image, read_image_pages,
    write_image,
};
use tateyoko_test::{PageBuilder, RegParams};

fn sample_page(shift: i32) -> Pix {
    PageBuilder::new(120, 80)
        .rect(10 + shift, 10, 20, 30)
        .rect(60, 20 + shift, 25, 25)
        .dot(100, 70)
        .build()
}

fn canvas(index: usize, level: u8) -> ComposedPage {
    let mut pm = PixMut::new(64, 48, PixelDepth::Bit8).unwrap();
    pm.fill(255).unwrap();
    pm.fill_rect(&Rect::new_unchecked(8, 8, 16, 16), level as u32);
    pm.set_resolution(150, 150);
    ComposedPage {
        index,
        pix: pm.into(),
    }
}

#[test]
fn io_source_reg() {
    let mut rp = RegParams::new("io_source");
    let dir = tempfile::tempdir().unwrap();

    let png_page = sample_page(0);
    let jpeg_page = sample_page(3);
    let tiff_pages = [sample_page(5), sample_page(7)];

    let png_path = dir.path().join("a.png");
    let jpeg_path = dir.path().join("b.jpg");
    let tiff_path = dir.path().join("c.tif");
    write_image(&png_page, &png_path, ImageFormat::Png, 0).unwrap();
    write_image(&jpeg_page, &jpeg_path, ImageFormat::Jpeg, 95).unwrap();
    let file = std::io::BufWriter::new(std::fs::File::create(&tiff_path).unwrap());
    tateyoko_io::tiff::write_tiff_multipage(&[&tiff_pages[0], &tiff_pages[1]], file).unwrap();

    // --- Format detection ---
    rp.compare_values(1.0, (detect_format(&png_path).unwrap() == ImageFormat::Png) as u8 as f64, 0.0);
    rp.compare_values(1.0, (detect_format(&jpeg_path).unwrap() == ImageFormat::Jpeg) as u8 as f64, 0.0);
    rp.compare_values(1.0, (detect_format(&tiff_path).unwrap() == ImageFormat::Tiff) as u8 as f64, 0.0);
    rp.compare_values(2.0, read_image_pages(&tiff_path).unwrap().len() as f64, 0.0);

    // --- Source: one page per PNG/JPEG, one per TIFF directory ---
    let mut source = ImageFileSource::new([&png_path, &jpeg_path, &tiff_path]);
    let mut pages = Vec::new();
    while let Some(page) = source.next_page().unwrap() {
        pages.push(page);
    }
    rp.compare_values(4.0, pages.len() as f64, 0.0);
    for page in &pages {
        rp.compare_values(1.0, page.depth().bits() as f64, 0.0);
    }
    rp.compare_pix(&png_page, &pages[0]);
    let expected = jpeg_page.count_foreground() as f64;
    rp.compare_values(expected, pages[1].count_foreground() as f64, expected * 0.02);
    rp.compare_pix(&tiff_pages[0], &pages[2]);
    rp.compare_pix(&tiff_pages[1], &pages[3]);

    // --- Threshold: a light gray page is blank at 128, ink at 250 ---
    let mut gray = PixMut::new(10, 10, PixelDepth::Bit8).unwrap();
    gray.fill(200).unwrap();
    let gray_path = dir.path().join("gray.png");
    write_image(&gray.into(), &gray_path, ImageFormat::Png, 0).unwrap();
    let mut src = ImageFileSource::new([&gray_path]);
    rp.compare_values(0.0, src.next_page().unwrap().unwrap().count_foreground() as f64, 0.0);
    let mut src = ImageFileSource::new([&gray_path]).with_threshold(250);
    rp.compare_values(100.0, src.next_page().unwrap().unwrap().count_foreground() as f64, 0.0);

    assert!(rp.cleanup(), "io_source regression test failed");
}

#[test]
fn io_writer_reg() {
    let mut rp = RegParams::new("io_writer");
    let dir = tempfile::tempdir().unwrap();
    let pages = [canvas(0, 0), canvas(1, 64), canvas(2, 128)];

    // --- PDF ---
    let pdf_path = dir.path().join("out.pdf");
    let mut pdf = PdfDocumentWriter::new(&pdf_path).with_title("relayout");
    for page in &pages {
        pdf.write_page(page).unwrap();
    }
    pdf.finish().unwrap();
    rp.compare_values(1.0, (detect_format(&pdf_path).unwrap() == ImageFormat::Pdf) as u8 as f64, 0.0);
    let bytes = std::fs::read(&pdf_path).unwrap();
    rp.compare_values(1.0, String::from_utf8_lossy(&bytes).contains("/Count 3") as u8 as f64, 0.0);

    // --- TIFF ---
    let tiff_path = dir.path().join("out.tif");
    let mut tiff = TiffDocumentWriter::new(&tiff_path);
    for page in &pages {
        tiff.write_page(page).unwrap();
    }
    tiff.finish().unwrap();
    let back = read_image_pages(&tiff_path).unwrap();
    rp.compare_values(3.0, back.len() as f64, 0.0);
    for (page, read) in pages.iter().zip(&back) {
        rp.compare_pix(&page.pix, read);
    }

    // --- PNG sequence ---
    let seq_dir = dir.path().join("png");
    let mut seq = ImageSequenceWriter::new(&seq_dir, ImageFormat::Png).unwrap();
    for page in &pages {
        seq.write_page(page).unwrap();
    }
    seq.finish().unwrap();
    rp.compare_values(3.0, seq.written().len() as f64, 0.0);
    let name = seq.written()[1].file_name().unwrap().to_string_lossy().into_owned();
    rp.compare_values(1.0, (name == "page_0002.png") as u8 as f64, 0.0);
    let second = read_image(&seq.written()[1]).unwrap();
    rp.compare_pix(&pages[1].pix, &second);
    rp.compare_values(150.0, second.xres() as f64, 0.0);

    // --- JPEG sequence ---
    let jpg_dir = dir.path().join("jpg");
    let mut jpg = ImageSequenceWriter::new(&jpg_dir, ImageFormat::Jpeg)
        .unwrap()
        .with_quality(90);
    jpg.write_page(&pages[0]).unwrap();
    jpg.finish().unwrap();
    let first = read_image(&jpg.written()[0]).unwrap();
    rp.compare_values(0.0, first.get_pixel(16, 16).unwrap() as f64, 30.0);
    rp.compare_values(255.0, first.get_pixel(50, 40).unwrap() as f64, 30.0);

    if let Some(path) = rp.write_pix_for_display(&pages[1].pix, "canvas").unwrap() {
        eprintln!("  wrote {}", path);
    }

    assert!(rp.cleanup(), "io_writer regression test failed");
}
