//! Axis-aligned rectangles
//!
//! `right()` and `bottom()` are exclusive, so a rectangle at `x = 3` with
//! `w = 2` covers columns 3 and 4.

use crate::error::{Error, Result};

/// A rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
}

impl Rect {
    /// Create a rectangle
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "rect dimensions must be non-negative: w={w}, h={h}"
            )));
        }
        Ok(Self { x, y, w, h })
    }

    /// Create a rectangle without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Bottom edge (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Horizontal center, in sub-pixel precision
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x as f64 + self.w as f64 / 2.0
    }

    /// Vertical center, in sub-pixel precision
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.h as f64 / 2.0
    }

    /// Box area (not the foreground pixel count)
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// True when the rectangle covers no pixels
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// True when the interiors of the two rectangles share a pixel.
    ///
    /// Rectangles that merely touch along an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Number of background pixels separating two rectangles along x and y.
    ///
    /// A component is zero when the projections touch or overlap.
    pub fn gap(&self, other: &Rect) -> (i32, i32) {
        let gx = (other.x - self.right()).max(self.x - other.right()).max(0);
        let gy = (other.y - self.bottom()).max(self.y - other.bottom()).max(0);
        (gx, gy)
    }

    /// True when the rectangles are at most `threshold` pixels apart on both axes.
    pub fn within_gap(&self, other: &Rect, threshold: i32) -> bool {
        let (gx, gy) = self.gap(other);
        gx <= threshold && gy <= threshold
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Clip to `[0, width) x [0, height)`, or `None` if nothing remains
    pub fn clip(&self, width: i32, height: i32) -> Option<Rect> {
        let x = self.x.max(0);
        let y = self.y.max(0);
        let right = self.right().min(width);
        let bottom = self.bottom().min(height);
        (x < right && y < bottom).then(|| Rect {
            x,
            y,
            w: right - x,
            h: bottom - y,
        })
    }
}
