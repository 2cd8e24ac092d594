//! Layout planner regression test
//!
//! Fixed line-filling cases plus randomized glyph streams checked for
//! page monotonicity, non-overlapping footprints, containment in the
//! writable area and determinism across every destination flow.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tateyoko_core::{
    Candidate, Direction, Glyph, GlyphId, LayoutOptions, LayoutParameters, OrderedGlyph, PixMut,
    PixelDepth, ReadingOrder, Rect,
};
use tateyoko_layout::{LayoutError, LayoutPlan, LayoutPlanner, Pagination};
use tateyoko_test::RegParams;

fn stream(sizes: &[(usize, i32, i32)]) -> Vec<OrderedGlyph> {
    sizes
        .iter()
        .enumerate()
        .map(|(i, &(page, w, h))| {
            let mut mask = PixMut::new(w as u32, h as u32, PixelDepth::Bit1).unwrap();
            mask.fill_rect(&Rect::new_unchecked(0, 0, w, h), 1);
            let glyph = Glyph::from_candidate(Candidate {
                id: GlyphId::new(page, i),
                bbox: Rect::new_unchecked(0, 0, w, h),
                mask: mask.into(),
                area: (w * h) as u64,
                fragment: false,
            });
            OrderedGlyph::new(glyph, 0, i)
        })
        .collect()
}

/// Check the structural guarantees of a plan. Returns true when all hold.
fn plan_is_sound(plan: &LayoutPlan, params: &LayoutParameters, count: usize) -> bool {
    if plan.placements.len() != count {
        return false;
    }
    let m = params.margin() as i32;
    let right = (params.page_width() - params.margin()) as i32;
    let bottom = (params.page_height() - params.margin()) as i32;

    let mut last_page = 0;
    for (i, p) in plan.placements.iter().enumerate() {
        if p.order_index != i || p.dest_page < last_page || p.dest_page >= plan.page_count {
            return false;
        }
        last_page = p.dest_page;
        let r = p.dest_rect();
        if r.x < m || r.y < m || r.right() > right || r.bottom() > bottom {
            return false;
        }
    }
    for page in 0..plan.page_count {
        let rects: Vec<Rect> = plan.page(page).map(|p| p.dest_rect()).collect();
        for (i, a) in rects.iter().enumerate() {
            if rects[i + 1..].iter().any(|b| a.overlaps(b)) {
                return false;
            }
        }
    }
    true
}

#[test]
fn plan_reg() {
    let mut rp = RegParams::new("plan");

    // --- scale 1.5, 1000 px page, 50 px margin, 100 px glyphs: 5 per line ---
    let params = LayoutOptions::default()
        .with_page_size(1000, 1400)
        .with_margin(50)
        .with_spacing(10, 20)
        .with_scale_factor(1.5)
        .validate()
        .unwrap();
    let glyphs = stream(&[(0, 100, 100); 10]);
    let plan = LayoutPlanner::new(params).plan(&glyphs).unwrap();
    let first_line = plan
        .placements
        .iter()
        .take_while(|p| p.dest_y == params.margin())
        .count();
    rp.compare_values(5.0, first_line as f64, 0.0);
    rp.compare_values(150.0, plan.placements[0].dest_width as f64, 0.0);
    rp.compare_values(1.5, plan.placements[0].dest_scale, 0.0);
    rp.compare_values(220.0, plan.placements[5].dest_y as f64, 0.0);
    rp.compare_values(50.0, plan.placements[5].dest_x as f64, 0.0);
    rp.compare_values(1.0, plan_is_sound(&plan, &params, 10) as u8 as f64, 0.0);

    // --- Mixed heights: the next line clears the tallest glyph ---
    let glyphs = stream(&[(0, 400, 40), (0, 400, 90), (0, 400, 10)]);
    let params = LayoutOptions::default()
        .with_page_size(1000, 1000)
        .with_margin(50)
        .with_spacing(10, 20)
        .with_scale_factor(1.0)
        .validate()
        .unwrap();
    let plan = LayoutPlanner::new(params).plan(&glyphs).unwrap();
    rp.compare_values(50.0 + 90.0 + 20.0, plan.placements[2].dest_y as f64, 0.0);

    // --- Overflow names the glyph and both sizes ---
    let glyphs = stream(&[(0, 10, 10), (0, 10, 1000)]);
    match LayoutPlanner::new(params).plan(&glyphs) {
        Err(LayoutError::Overflow {
            glyph,
            required,
            available,
        }) => {
            rp.compare_values(1.0, (glyph == GlyphId::new(0, 1)) as u8 as f64, 0.0);
            rp.compare_values(1000.0, required.1 as f64, 0.0);
            rp.compare_values(900.0, available.1 as f64, 0.0);
        }
        other => panic!("expected overflow, got {other:?}"),
    }

    assert!(rp.cleanup(), "plan regression test failed");
}

#[test]
fn plan_props_reg() {
    let mut rp = RegParams::new("plan_props");
    let mut rng = StdRng::seed_from_u64(0xc0de);
    let flows = [
        (Direction::VerticalToHorizontal, ReadingOrder::RightToLeft),
        (Direction::Identity, ReadingOrder::RightToLeft),
        (Direction::Identity, ReadingOrder::LeftToRight),
        (Direction::Identity, ReadingOrder::TopToBottom),
    ];

    for round in 0..40 {
        let (direction, order) = flows[round % flows.len()];
        let params = LayoutOptions::default()
            .with_page_size(rng.gen_range(400..900), rng.gen_range(400..900))
            .with_margin(rng.gen_range(10..60))
            .with_spacing(rng.gen_range(1..20), rng.gen_range(1..30))
            .with_scale_factor(rng.gen_range(0.5..2.0))
            .with_direction(direction)
            .with_reading_order(order)
            .validate()
            .unwrap();
        let pagination = if rng.gen_bool(0.5) {
            Pagination::Continuous
        } else {
            Pagination::PerSourcePage
        };

        let n = rng.gen_range(0..200);
        let mut page = 0;
        let sizes: Vec<(usize, i32, i32)> = (0..n)
            .map(|_| {
                if rng.gen_bool(0.05) {
                    page += 1;
                }
                (page, rng.gen_range(3..80), rng.gen_range(3..80))
            })
            .collect();
        let glyphs = stream(&sizes);

        let planner = LayoutPlanner::new(params).with_pagination(pagination);
        let plan = planner.plan(&glyphs).unwrap();
        rp.compare_values(1.0, plan_is_sound(&plan, &params, n) as u8 as f64, 0.0);

        let again = planner.plan(&glyphs).unwrap();
        rp.compare_values(1.0, (plan == again) as u8 as f64, 0.0);

        if pagination == Pagination::PerSourcePage {
            // No destination page mixes source pages
            let mixed = plan.placements.windows(2).any(|w| {
                w[0].dest_page == w[1].dest_page && w[0].glyph_id.page != w[1].glyph_id.page
            });
            rp.compare_values(0.0, mixed as u8 as f64, 0.0);
        }
    }

    assert!(rp.cleanup(), "plan_props regression test failed");
}
