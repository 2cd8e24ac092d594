//! Reading order regression test
//!
//! Segmented synthetic pages with known column structure are resolved
//! and the resulting sequence is compared against the column geometry.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tateyoko_core::{OrderedGlyph, ReadingOrder, Rect, SegmentationParams};
use tateyoko_layout::{OrderCursor, ReadingOrderResolver, resolve_pages};
use tateyoko_region::segment_page;
use tateyoko_test::{GridLayout, PageBuilder, RegParams, grid_page};

fn boxes(ordered: &[OrderedGlyph]) -> Vec<Rect> {
    ordered.iter().map(|g| g.glyph().bbox()).collect()
}

#[test]
fn order_reg() {
    let mut rp = RegParams::new("order");
    let params = SegmentationParams::default();

    // --- Two columns of three, right to left ---
    let (page, rects) = grid_page(200, 200, &GridLayout::default());
    let glyphs = segment_page(&page, 0, &params).unwrap().glyphs;
    rp.compare_values(6.0, glyphs.len() as f64, 0.0);

    let resolver = ReadingOrderResolver::from_params(ReadingOrder::RightToLeft, &params);
    let (ordered, cursor) = resolver.resolve(glyphs.clone(), OrderCursor::new());
    let expected: Vec<Rect> = rects[1].iter().chain(&rects[0]).copied().collect();
    let actual = boxes(&ordered);
    for (e, a) in expected.iter().zip(&actual) {
        rp.compare_rects(e, a);
    }
    for (i, g) in ordered.iter().enumerate() {
        rp.compare_values(i as f64, g.order_index() as f64, 0.0);
        rp.compare_values((i / 3) as f64, g.column_id() as f64, 0.0);
    }
    rp.compare_values(6.0, cursor.next_order as f64, 0.0);
    rp.compare_values(2.0, cursor.next_column as f64, 0.0);

    // --- Left to right reads the left column first ---
    let resolver_ltr = ReadingOrderResolver::from_params(ReadingOrder::LeftToRight, &params);
    let (ordered, _) = resolver_ltr.resolve(glyphs.clone(), OrderCursor::new());
    let expected: Vec<Rect> = rects[0].iter().chain(&rects[1]).copied().collect();
    for (e, a) in expected.iter().zip(&boxes(&ordered)) {
        rp.compare_rects(e, a);
    }

    // --- Repeated runs give identical assignments ---
    let (again, _) = resolver.resolve(glyphs, OrderCursor::new());
    let (first, _) = resolver.resolve(
        segment_page(&page, 0, &params).unwrap().glyphs,
        OrderCursor::new(),
    );
    rp.compare_values(1.0, (again == first) as u8 as f64, 0.0);

    // --- Horizontal rows, top to bottom ---
    let page = PageBuilder::new(200, 100)
        .rect(100, 50, 20, 20)
        .rect(10, 52, 20, 20)
        .rect(100, 10, 20, 20)
        .rect(10, 8, 20, 20)
        .build();
    let glyphs = segment_page(&page, 0, &params).unwrap().glyphs;
    let resolver = ReadingOrderResolver::from_params(ReadingOrder::TopToBottom, &params);
    let (ordered, _) = resolver.resolve(glyphs, OrderCursor::new());
    let xs: Vec<i32> = ordered.iter().map(|g| g.glyph().bbox().x).collect();
    let ys: Vec<i32> = ordered.iter().map(|g| g.glyph().bbox().y).collect();
    rp.compare_values(1.0, (xs == vec![10, 100, 10, 100]) as u8 as f64, 0.0);
    rp.compare_values(1.0, (ys == vec![8, 10, 52, 50]) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "order regression test failed");
}

#[test]
fn order_multipage_reg() {
    let mut rp = RegParams::new("order_multipage");
    let params = SegmentationParams::default();
    let resolver = ReadingOrderResolver::from_params(ReadingOrder::RightToLeft, &params);

    let (page0, _) = grid_page(200, 200, &GridLayout::default());
    let blank = PageBuilder::new(200, 200).build();
    let (page2, _) = grid_page(
        200,
        200,
        &GridLayout {
            columns: 3,
            rows: 2,
            ..Default::default()
        },
    );
    let pages: Vec<_> = [page0, blank, page2]
        .iter()
        .enumerate()
        .map(|(i, p)| segment_page(p, i, &params).unwrap().glyphs)
        .collect();

    let (stream, cursor) = resolve_pages(&resolver, pages, OrderCursor::new());
    rp.compare_values(12.0, stream.len() as f64, 0.0);
    rp.compare_values(12.0, cursor.next_order as f64, 0.0);
    rp.compare_values(5.0, cursor.next_column as f64, 0.0);

    // Permutation of 0..N, in source-page order
    let mut indices: Vec<usize> = stream.iter().map(|g| g.order_index()).collect();
    let pages_seen: Vec<usize> = stream.iter().map(|g| g.glyph().source_page()).collect();
    rp.compare_values(1.0, pages_seen.is_sorted() as u8 as f64, 0.0);
    indices.sort_unstable();
    rp.compare_values(1.0, (indices == (0..12).collect::<Vec<_>>()) as u8 as f64, 0.0);

    assert!(rp.cleanup(), "order_multipage regression test failed");
}

#[test]
fn order_jitter_reg() {
    let mut rp = RegParams::new("order_jitter");
    let params = SegmentationParams::new(10, 10, 50, 10_000, 2, 0.5).unwrap();
    let resolver = ReadingOrderResolver::from_params(ReadingOrder::RightToLeft, &params);
    let mut rng = StdRng::seed_from_u64(0x1234);

    for round in 0..20 {
        let columns = rng.gen_range(1..6);
        let rows = rng.gen_range(1..8);
        let mut builder = PageBuilder::new(400, 400);
        // expected[column][row], columns left to right
        let mut expected: Vec<Vec<Rect>> = Vec::new();
        for c in 0..columns {
            let mut col = Vec::new();
            for r in 0..rows {
                let w = rng.gen_range(20..=24);
                let h = rng.gen_range(20..=28);
                let x = 20 + c * 60 + rng.gen_range(-3..=3);
                let y = 10 + r * 45 + rng.gen_range(0..=6);
                let rect = Rect::new_unchecked(x, y, w, h);
                builder = builder.fill(rect);
                col.push(rect);
            }
            expected.push(col);
        }
        let page = builder.build();
        let glyphs = segment_page(&page, round, &params).unwrap().glyphs;
        let (ordered, _) = resolver.resolve(glyphs, OrderCursor::new());

        let want: Vec<Rect> = expected.iter().rev().flatten().copied().collect();
        rp.compare_values(1.0, (boxes(&ordered) == want) as u8 as f64, 0.0);
    }

    assert!(rp.cleanup(), "order_jitter regression test failed");
}
