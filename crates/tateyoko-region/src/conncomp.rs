//! Connected component analysis
//!
//! Two-pass labeling over a 1 bpp image with a union-find table. The
//! first pass assigns provisional labels and records equivalences from
//! already-visited neighbors; the second pass resolves every label to its
//! root and accumulates bounds and pixel counts. Components are numbered
//! in the raster order of their first pixel, so output order depends
//! only on the image.

use crate::error::{RegionError, RegionResult};
use tateyoko_core::pix::{get_data_bit, set_data_bit};
use tateyoko_core::{Pix, PixMut, PixelDepth, Rect};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    FourWay,
    /// 8-way connectivity (includes diagonals)
    #[default]
    EightWay,
}

/// A connected component in an image
#[derive(Debug, Clone)]
pub struct ConnectedComponent {
    /// 1-based label in raster discovery order
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u64,
    /// Bounding box of this component
    pub bounds: Rect,
    /// 1 bpp mask the size of `bounds`, holding only this component
    pub mask: Pix,
}

/// Union-find over provisional labels. Index 0 is background.
struct Equivalence {
    parent: Vec<u32>,
}

impl Equivalence {
    fn new() -> Self {
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let label = self.parent.len() as u32;
        self.parent.push(label);
        label
    }

    fn find(&mut self, mut label: u32) -> u32 {
        while self.parent[label as usize] != label {
            let grand = self.parent[self.parent[label as usize] as usize];
            self.parent[label as usize] = grand;
            label = grand;
        }
        label
    }

    fn union(&mut self, a: u32, b: u32) -> u32 {
        let ra = self.find(a);
        let rb = self.find(b);
        let (lo, hi) = if ra <= rb { (ra, rb) } else { (rb, ra) };
        self.parent[hi as usize] = lo;
        lo
    }
}

/// Label all foreground pixels.
///
/// Returns the label buffer (row-major, `0` = background) and the
/// equivalence table after the first pass.
fn first_pass(pix: &Pix, connectivity: ConnectivityType) -> (Vec<u32>, Equivalence) {
    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let mut labels = vec![0u32; w * h];
    let mut eq = Equivalence::new();
    let diagonal = connectivity == ConnectivityType::EightWay;

    for y in 0..h {
        let line = pix.row_data(y as u32);
        for x in 0..w {
            if get_data_bit(line, x as u32) == 0 {
                continue;
            }
            let mut current = 0u32;
            let join = |current: &mut u32, neighbor: u32, eq: &mut Equivalence| {
                if neighbor == 0 {
                    return;
                }
                *current = if *current == 0 {
                    eq.find(neighbor)
                } else {
                    eq.union(*current, neighbor)
                };
            };
            if x > 0 {
                join(&mut current, labels[y * w + x - 1], &mut eq);
            }
            if y > 0 {
                let up = (y - 1) * w;
                join(&mut current, labels[up + x], &mut eq);
                if diagonal {
                    if x > 0 {
                        join(&mut current, labels[up + x - 1], &mut eq);
                    }
                    if x + 1 < w {
                        join(&mut current, labels[up + x + 1], &mut eq);
                    }
                }
            }
            labels[y * w + x] = if current == 0 { eq.make() } else { current };
        }
    }
    (labels, eq)
}

/// Find all connected components in a binary image.
///
/// Each component carries its own mask, so overlapping bounding boxes of
/// different components never share pixels.
///
/// # Errors
///
/// Returns [`RegionError::UnsupportedDepth`] unless `pix` is 1 bpp.
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1-bit",
            actual: pix.depth().bits(),
        });
    }
    let w = pix.width() as usize;
    let (mut labels, mut eq) = first_pass(pix, connectivity);

    // Resolve roots to compact, discovery-ordered labels and gather extents
    let mut compact = vec![0u32; eq.parent.len()];
    let mut extents: Vec<(i32, i32, i32, i32, u64)> = Vec::new();
    for (i, label) in labels.iter_mut().enumerate() {
        if *label == 0 {
            continue;
        }
        let root = eq.find(*label) as usize;
        if compact[root] == 0 {
            extents.push((i32::MAX, i32::MAX, i32::MIN, i32::MIN, 0));
            compact[root] = extents.len() as u32;
        }
        *label = compact[root];
        let (x, y) = ((i % w) as i32, (i / w) as i32);
        let e = &mut extents[*label as usize - 1];
        e.0 = e.0.min(x);
        e.1 = e.1.min(y);
        e.2 = e.2.max(x);
        e.3 = e.3.max(y);
        e.4 += 1;
    }

    let mut masks = Vec::with_capacity(extents.len());
    for &(x0, y0, x1, y1, _) in &extents {
        masks.push(PixMut::new((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32, PixelDepth::Bit1)?);
    }
    for (i, &label) in labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        let idx = label as usize - 1;
        let (x0, y0) = (extents[idx].0, extents[idx].1);
        let (x, y) = ((i % w) as i32 - x0, (i / w) as i32 - y0);
        set_data_bit(masks[idx].row_data_mut(y as u32), x as u32, 1);
    }

    Ok(extents
        .into_iter()
        .zip(masks)
        .enumerate()
        .map(|(i, ((x0, y0, x1, y1, count), mask))| ConnectedComponent {
            label: i as u32 + 1,
            pixel_count: count,
            bounds: Rect::new_unchecked(x0, y0, x1 - x0 + 1, y1 - y0 + 1),
            mask: mask.into(),
        })
        .collect())
}
