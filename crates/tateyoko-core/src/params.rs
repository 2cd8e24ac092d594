//! Engine parameters
//!
//! Each stage is driven by an immutable, validated parameter set. The
//! `*Options` types are plain builders with public fields; converting one
//! into its `*Params` / [`LayoutParameters`] counterpart is the single
//! place where [`Error::InvalidConfiguration`] can be raised.

use crate::error::{Error, Result};
use crate::rect::Rect;
use std::fmt;
use std::str::FromStr;

/// Writing-direction transform applied by the relayout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    /// Vertical source columns become horizontal destination lines
    #[default]
    VerticalToHorizontal,
    /// Destination keeps the source orientation
    Identity,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::VerticalToHorizontal => "vertical_to_horizontal",
            Direction::Identity => "identity",
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertical_to_horizontal" => Ok(Direction::VerticalToHorizontal),
            "identity" => Ok(Direction::Identity),
            other => Err(Error::config(format!("unknown direction: {other}"))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order in which the source lines are read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadingOrder {
    /// Vertical columns, rightmost first
    #[default]
    RightToLeft,
    /// Vertical columns, leftmost first
    LeftToRight,
    /// Horizontal rows, topmost first
    TopToBottom,
}

impl ReadingOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            ReadingOrder::RightToLeft => "right_to_left",
            ReadingOrder::LeftToRight => "left_to_right",
            ReadingOrder::TopToBottom => "top_to_bottom",
        }
    }

    /// True when the source lines are vertical columns.
    pub fn is_vertical_source(self) -> bool {
        !matches!(self, ReadingOrder::TopToBottom)
    }
}

impl FromStr for ReadingOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "right_to_left" => Ok(ReadingOrder::RightToLeft),
            "left_to_right" => Ok(ReadingOrder::LeftToRight),
            "top_to_bottom" => Ok(ReadingOrder::TopToBottom),
            other => Err(Error::config(format!("unknown reading order: {other}"))),
        }
    }
}

impl fmt::Display for ReadingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How glyphs advance on the destination page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Lines run left to right and stack downwards
    Horizontal,
    /// Columns run top to bottom and stack leftwards from the right margin
    VerticalRightToLeft,
    /// Columns run top to bottom and stack rightwards from the left margin
    VerticalLeftToRight,
}

impl Flow {
    /// Destination flow for a direction / reading-order pair.
    pub fn resolve(direction: Direction, order: ReadingOrder) -> Flow {
        match (direction, order) {
            (Direction::Identity, ReadingOrder::RightToLeft) => Flow::VerticalRightToLeft,
            (Direction::Identity, ReadingOrder::LeftToRight) => Flow::VerticalLeftToRight,
            _ => Flow::Horizontal,
        }
    }

    #[inline]
    pub fn is_vertical(self) -> bool {
        !matches!(self, Flow::Horizontal)
    }
}

/// Canvas background as an 8-bit gray level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Background(pub u8);

impl Background {
    pub const WHITE: Background = Background(255);
    pub const BLACK: Background = Background(0);

    /// Gray level used for glyph ink: black on light backgrounds, white on dark.
    pub fn ink(self) -> u8 {
        if self.0 >= 128 { 0 } else { 255 }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::WHITE
    }
}

impl FromStr for Background {
    type Err = Error;

    /// Accepts `white`, `black`, `gray`, a decimal level `0..=255`, or `#rrggbb`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "white" => return Ok(Background::WHITE),
            "black" => return Ok(Background::BLACK),
            "gray" | "grey" => return Ok(Background(128)),
            _ => {}
        }
        if let Some(hex) = s.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return Err(Error::config(format!("bad background color: {s}")));
            }
            let channel = |i: usize| {
                u8::from_str_radix(&hex[i..i + 2], 16)
                    .map_err(|_| Error::config(format!("bad background color: {s}")))
            };
            let (r, g, b) = (channel(0)?, channel(2)?, channel(4)?);
            // ITU-R 601 luma
            let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32 + 500) / 1000;
            return Ok(Background(luma as u8));
        }
        s.parse::<u8>()
            .map(Background)
            .map_err(|_| Error::config(format!("bad background color: {s}")))
    }
}

/// Raw segmentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationOptions {
    /// Components narrower than this are fragments
    pub min_char_width: u32,
    /// Components shorter than this are fragments
    pub min_char_height: u32,
    /// Finalized glyphs below this foreground count are dropped as noise
    pub min_area: u64,
    /// Finalized glyphs above this foreground count are dropped as artifacts
    pub max_area: u64,
    /// Largest gap (pixels) a fragment merge may bridge
    pub merge_threshold: i32,
    /// Column clustering tolerance as a fraction of the median glyph extent
    pub column_tolerance: f64,
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            min_char_width: 10,
            min_char_height: 15,
            min_area: 100,
            max_area: 50_000,
            merge_threshold: 5,
            column_tolerance: 0.5,
        }
    }
}

impl SegmentationOptions {
    pub fn with_min_char_size(mut self, width: u32, height: u32) -> Self {
        self.min_char_width = width;
        self.min_char_height = height;
        self
    }

    pub fn with_area_range(mut self, min_area: u64, max_area: u64) -> Self {
        self.min_area = min_area;
        self.max_area = max_area;
        self
    }

    pub fn with_merge_threshold(mut self, threshold: i32) -> Self {
        self.merge_threshold = threshold;
        self
    }

    pub fn with_column_tolerance(mut self, tolerance: f64) -> Self {
        self.column_tolerance = tolerance;
        self
    }

    /// Validate into [`SegmentationParams`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if `max_area < min_area`, the merge
    /// threshold is negative, or the column tolerance is not a positive number.
    pub fn validate(self) -> Result<SegmentationParams> {
        if self.max_area < self.min_area {
            return Err(Error::config(format!(
                "max_area ({}) < min_area ({})",
                self.max_area, self.min_area
            )));
        }
        if self.merge_threshold < 0 {
            return Err(Error::config(format!(
                "merge_threshold must be >= 0, got {}",
                self.merge_threshold
            )));
        }
        if !self.column_tolerance.is_finite() || self.column_tolerance <= 0.0 {
            return Err(Error::config(format!(
                "column_tolerance must be > 0, got {}",
                self.column_tolerance
            )));
        }
        Ok(SegmentationParams {
            min_char_width: self.min_char_width,
            min_char_height: self.min_char_height,
            min_area: self.min_area,
            max_area: self.max_area,
            merge_threshold: self.merge_threshold as u32,
            column_tolerance: self.column_tolerance,
        })
    }
}

/// Validated segmentation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentationParams {
    min_char_width: u32,
    min_char_height: u32,
    min_area: u64,
    max_area: u64,
    merge_threshold: u32,
    column_tolerance: f64,
}

impl SegmentationParams {
    /// Shorthand for building and validating [`SegmentationOptions`].
    pub fn new(
        min_char_width: u32,
        min_char_height: u32,
        min_area: u64,
        max_area: u64,
        merge_threshold: i32,
        column_tolerance: f64,
    ) -> Result<Self> {
        SegmentationOptions {
            min_char_width,
            min_char_height,
            min_area,
            max_area,
            merge_threshold,
            column_tolerance,
        }
        .validate()
    }

    pub fn min_char_width(&self) -> u32 {
        self.min_char_width
    }

    pub fn min_char_height(&self) -> u32 {
        self.min_char_height
    }

    pub fn min_area(&self) -> u64 {
        self.min_area
    }

    pub fn max_area(&self) -> u64 {
        self.max_area
    }

    pub fn merge_threshold(&self) -> u32 {
        self.merge_threshold
    }

    pub fn column_tolerance(&self) -> f64 {
        self.column_tolerance
    }

    /// True if a region with this box is below the minimum glyph size.
    pub fn is_fragment(&self, bbox: &Rect) -> bool {
        (bbox.w as u32) < self.min_char_width || (bbox.h as u32) < self.min_char_height
    }

    /// True if `area` lies within `[min_area, max_area]`.
    pub fn area_in_range(&self, area: u64) -> bool {
        (self.min_area..=self.max_area).contains(&area)
    }
}

impl Default for SegmentationParams {
    fn default() -> Self {
        let d = SegmentationOptions::default();
        SegmentationParams {
            min_char_width: d.min_char_width,
            min_char_height: d.min_char_height,
            min_area: d.min_area,
            max_area: d.max_area,
            merge_threshold: d.merge_threshold as u32,
            column_tolerance: d.column_tolerance,
        }
    }
}

/// Raw destination layout settings
///
/// Defaults follow an A4 page at 300 dpi.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub page_width: u32,
    pub page_height: u32,
    pub dpi: u32,
    pub margin: i32,
    pub char_spacing: i32,
    pub line_spacing: i32,
    pub scale_factor: f64,
    pub direction: Direction,
    pub reading_order: ReadingOrder,
    pub background: Background,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            page_width: 2480,
            page_height: 3508,
            dpi: 300,
            margin: 100,
            char_spacing: 10,
            line_spacing: 20,
            scale_factor: 1.5,
            direction: Direction::default(),
            reading_order: ReadingOrder::default(),
            background: Background::default(),
        }
    }
}

impl LayoutOptions {
    pub fn with_page_size(mut self, width: u32, height: u32) -> Self {
        self.page_width = width;
        self.page_height = height;
        self
    }

    pub fn with_margin(mut self, margin: i32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_spacing(mut self, char_spacing: i32, line_spacing: i32) -> Self {
        self.char_spacing = char_spacing;
        self.line_spacing = line_spacing;
        self
    }

    pub fn with_scale_factor(mut self, scale: f64) -> Self {
        self.scale_factor = scale;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_reading_order(mut self, order: ReadingOrder) -> Self {
        self.reading_order = order;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Validate into [`LayoutParameters`].
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] if margin or spacing is not positive,
    /// the scale factor is not a positive number, the dpi is zero, or the
    /// margins leave no writable area.
    pub fn validate(self) -> Result<LayoutParameters> {
        for (name, value) in [
            ("margin", self.margin),
            ("char_spacing", self.char_spacing),
            ("line_spacing", self.line_spacing),
        ] {
            if value <= 0 {
                return Err(Error::config(format!("{name} must be > 0, got {value}")));
            }
        }
        if !self.scale_factor.is_finite() || self.scale_factor <= 0.0 {
            return Err(Error::config(format!(
                "scale_factor must be > 0, got {}",
                self.scale_factor
            )));
        }
        if self.dpi == 0 {
            return Err(Error::config("dpi must be > 0"));
        }
        let margin = self.margin as u32;
        if self.page_width <= 2 * margin || self.page_height <= 2 * margin {
            return Err(Error::config(format!(
                "page {}x{} leaves no writable area inside margin {}",
                self.page_width, self.page_height, margin
            )));
        }
        Ok(LayoutParameters {
            page_width: self.page_width,
            page_height: self.page_height,
            dpi: self.dpi,
            margin,
            char_spacing: self.char_spacing as u32,
            line_spacing: self.line_spacing as u32,
            scale_factor: self.scale_factor,
            direction: self.direction,
            reading_order: self.reading_order,
            background: self.background,
        })
    }
}

/// Validated destination layout parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParameters {
    page_width: u32,
    page_height: u32,
    dpi: u32,
    margin: u32,
    char_spacing: u32,
    line_spacing: u32,
    scale_factor: f64,
    direction: Direction,
    reading_order: ReadingOrder,
    background: Background,
}

impl LayoutParameters {
    pub fn page_width(&self) -> u32 {
        self.page_width
    }

    pub fn page_height(&self) -> u32 {
        self.page_height
    }

    pub fn dpi(&self) -> u32 {
        self.dpi
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn char_spacing(&self) -> u32 {
        self.char_spacing
    }

    pub fn line_spacing(&self) -> u32 {
        self.line_spacing
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn reading_order(&self) -> ReadingOrder {
        self.reading_order
    }

    pub fn background(&self) -> Background {
        self.background
    }

    /// Destination flow implied by direction and reading order.
    pub fn flow(&self) -> Flow {
        Flow::resolve(self.direction, self.reading_order)
    }

    /// Writable width inside the margins.
    pub fn writable_width(&self) -> u32 {
        self.page_width - 2 * self.margin
    }

    /// Writable height inside the margins.
    pub fn writable_height(&self) -> u32 {
        self.page_height - 2 * self.margin
    }

    /// Destination size of a source box after scaling (at least 1x1).
    pub fn scaled_size(&self, bbox: &Rect) -> (u32, u32) {
        let s = |v: i32| ((v as f64 * self.scale_factor).round() as u32).max(1);
        (s(bbox.w), s(bbox.h))
    }
}

impl Default for LayoutParameters {
    fn default() -> Self {
        let d = LayoutOptions::default();
        LayoutParameters {
            page_width: d.page_width,
            page_height: d.page_height,
            dpi: d.dpi,
            margin: d.margin as u32,
            char_spacing: d.char_spacing as u32,
            line_spacing: d.line_spacing as u32,
            scale_factor: d.scale_factor,
            direction: d.direction,
            reading_order: d.reading_order,
            background: d.background,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segmentation_validation() {
        assert!(SegmentationOptions::default().validate().is_ok());
        let err = SegmentationOptions::default()
            .with_area_range(500, 100)
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(
            SegmentationOptions::default()
                .with_merge_threshold(-1)
                .validate()
                .is_err()
        );
        assert!(
            SegmentationOptions::default()
                .with_column_tolerance(f64::NAN)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_layout_validation() {
        assert!(LayoutOptions::default().validate().is_ok());
        assert!(LayoutOptions::default().with_margin(0).validate().is_err());
        assert!(LayoutOptions::default().with_spacing(-3, 20).validate().is_err());
        assert!(LayoutOptions::default().with_spacing(10, 0).validate().is_err());
        assert!(
            LayoutOptions::default()
                .with_scale_factor(0.0)
                .validate()
                .is_err()
        );
        assert!(
            LayoutOptions::default()
                .with_page_size(200, 3000)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_writable_area_and_scaling() {
        let p = LayoutOptions::default()
            .with_page_size(1000, 800)
            .with_margin(50)
            .with_scale_factor(1.5)
            .validate()
            .unwrap();
        assert_eq!(p.writable_width(), 900);
        assert_eq!(p.writable_height(), 700);
        assert_eq!(p.scaled_size(&Rect::new_unchecked(0, 0, 100, 3)), (150, 5));
        assert_eq!(p.scaled_size(&Rect::new_unchecked(0, 0, 0, 1)), (1, 2));
    }

    #[test]
    fn test_background_parsing() {
        assert_eq!("white".parse::<Background>().unwrap(), Background::WHITE);
        assert_eq!("Black".parse::<Background>().unwrap(), Background::BLACK);
        assert_eq!("200".parse::<Background>().unwrap(), Background(200));
        assert_eq!("#ffffff".parse::<Background>().unwrap(), Background(255));
        assert_eq!("#000000".parse::<Background>().unwrap(), Background(0));
        assert!("#fff".parse::<Background>().is_err());
        assert!("beige".parse::<Background>().is_err());
        // Six bytes, but not six hex digits
        assert!(matches!(
            "#a\u{e9}bbb".parse::<Background>(),
            Err(Error::InvalidConfiguration(_))
        ));
        assert_eq!(Background::WHITE.ink(), 0);
        assert_eq!(Background::BLACK.ink(), 255);
    }

    #[test]
    fn test_flow_resolution() {
        use ReadingOrder::*;
        assert_eq!(
            Flow::resolve(Direction::VerticalToHorizontal, RightToLeft),
            Flow::Horizontal
        );
        assert_eq!(
            Flow::resolve(Direction::Identity, RightToLeft),
            Flow::VerticalRightToLeft
        );
        assert_eq!(
            Flow::resolve(Direction::Identity, LeftToRight),
            Flow::VerticalLeftToRight
        );
        assert_eq!(Flow::resolve(Direction::Identity, TopToBottom), Flow::Horizontal);
        assert_eq!("top_to_bottom".parse::<ReadingOrder>().unwrap(), TopToBottom);
        assert!("diagonal".parse::<Direction>().is_err());
    }
}
