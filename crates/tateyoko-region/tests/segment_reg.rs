//! Glyph segmentation regression test
//!
//! Detection and merging on synthetic pages: split glyphs, detached
//! dots, speckle noise and page borders.

use tateyoko_core::{Candidate, GlyphId, Rect, SegmentationParams};
use tateyoko_region::{GlyphDetector, GlyphMerger, segment_page};
use tateyoko_test::{GridLayout, PageBuilder, RegParams, grid_page};

fn params(merge_threshold: i32) -> SegmentationParams {
    SegmentationParams::new(10, 15, 100, 50_000, merge_threshold, 0.5).unwrap()
}

#[test]
fn segment_reg() {
    let mut rp = RegParams::new("segment");

    // --- Split glyph: two fragments 2 px apart, threshold 3 ---
    eprintln!("=== Split glyph ===");
    let page = PageBuilder::new(100, 60)
        .rect(10, 10, 6, 30)
        .rect(18, 10, 6, 30)
        .build();
    let candidates = GlyphDetector::new(params(3)).detect(&page, 0).unwrap();
    rp.compare_values(2.0, candidates.len() as f64, 0.0);
    rp.compare_values(2.0, candidates.iter().filter(|c| c.fragment).count() as f64, 0.0);
    let out = GlyphMerger::new(params(3)).merge(candidates).unwrap();
    rp.compare_values(1.0, out.glyphs.len() as f64, 0.0);
    let union = Rect::new_unchecked(10, 10, 6, 30).union(&Rect::new_unchecked(18, 10, 6, 30));
    rp.compare_rects(&union, &out.glyphs[0].bbox());
    rp.compare_values(360.0, out.glyphs[0].area() as f64, 0.0);

    // Same page with a threshold below the gap keeps them apart
    let out = segment_page(&page, 0, &params(1)).unwrap();
    rp.compare_values(2.0, out.glyphs.len() as f64, 0.0);

    // --- Detached dot above a stroke ---
    eprintln!("=== Diacritic dot ===");
    let page = PageBuilder::new(80, 80)
        .rect(20, 10, 8, 8)
        .rect(20, 21, 8, 30)
        .build();
    let out = segment_page(&page, 2, &params(5)).unwrap();
    rp.compare_values(1.0, out.glyphs.len() as f64, 0.0);
    rp.compare_rects(&Rect::new_unchecked(20, 10, 8, 41), &out.glyphs[0].bbox());
    rp.compare_values(2.0, out.glyphs[0].source_page() as f64, 0.0);

    // --- Speckle and border removal ---
    eprintln!("=== Noise and artifacts ===");
    let page = PageBuilder::new(400, 400)
        .rect(250, 20, 120, 100)
        .rect(100, 100, 20, 20)
        .dot(50, 350)
        .build();
    let p = SegmentationParams::new(10, 15, 100, 10_000, 5, 0.5).unwrap();
    let out = segment_page(&page, 0, &p).unwrap();
    rp.compare_values(1.0, out.glyphs.len() as f64, 0.0);
    rp.compare_rects(&Rect::new_unchecked(100, 100, 20, 20), &out.glyphs[0].bbox());
    rp.compare_values(1.0, out.dropped_noise as f64, 0.0);
    rp.compare_values(1.0, out.dropped_oversize as f64, 0.0);
    let speck = out
        .glyphs
        .iter()
        .any(|g| g.bbox() == Rect::new_unchecked(50, 350, 1, 1));
    rp.compare_values(0.0, if speck { 1.0 } else { 0.0 }, 0.0);

    // --- Grid of separate glyphs ---
    eprintln!("=== Grid ===");
    let (page, rects) = grid_page(200, 200, &GridLayout::default());
    let out = segment_page(&page, 0, &params(5)).unwrap();
    rp.compare_values(6.0, out.glyphs.len() as f64, 0.0);
    for glyph in &out.glyphs {
        let known = rects.iter().flatten().any(|r| *r == glyph.bbox());
        rp.compare_values(1.0, if known { 1.0 } else { 0.0 }, 0.0);
    }

    // --- Blank page ---
    let page = PageBuilder::new(50, 50).build();
    let out = segment_page(&page, 0, &params(5)).unwrap();
    rp.compare_values(0.0, out.glyphs.len() as f64, 0.0);

    assert!(rp.cleanup(), "segment regression test failed");
}

#[test]
fn merge_ids_reg() {
    let mut rp = RegParams::new("merge_ids");

    // Ids are page-scoped and the union keeps the smaller one
    let page = PageBuilder::new(60, 60)
        .rect(30, 5, 6, 30)
        .rect(20, 40, 6, 6)
        .rect(38, 5, 6, 30)
        .build();
    let candidates = GlyphDetector::new(params(3)).detect(&page, 7).unwrap();
    let first = candidates.iter().map(|c| c.id).min().unwrap();
    rp.compare_values(7.0, first.page as f64, 0.0);
    let out = GlyphMerger::new(params(3)).merge(candidates).unwrap();
    let ids: Vec<GlyphId> = out.glyphs.iter().map(|g| g.id()).collect();
    rp.compare_values(1.0, if ids.contains(&first) { 1.0 } else { 0.0 }, 0.0);

    // Re-merging finalized glyphs is a no-op
    let again: Vec<Candidate> = out
        .glyphs
        .iter()
        .cloned()
        .map(|g| Candidate::from_glyph(g, &params(3)))
        .collect();
    let out2 = GlyphMerger::new(params(3)).merge(again).unwrap();
    rp.compare_values(0.0, out2.merges as f64, 0.0);
    rp.compare_values(1.0, if out2.glyphs == out.glyphs { 1.0 } else { 0.0 }, 0.0);

    assert!(rp.cleanup(), "merge_ids regression test failed");
}
