//! Error types for tateyoko-layout

use tateyoko_core::GlyphId;
use thiserror::Error;

/// Errors that can occur while planning the destination layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A glyph's scaled footprint does not fit inside the writable area of
    /// an empty page. Sizes are `(width, height)` in destination pixels.
    #[error(
        "glyph {glyph} needs {}x{} px but the writable area is {}x{} px",
        required.0, required.1, available.0, available.1
    )]
    Overflow {
        glyph: GlyphId,
        required: (u32, u32),
        available: (u32, u32),
    },

    /// Glyphs were not supplied in ascending reading order
    #[error("glyph order index {found} follows {previous}")]
    OutOfOrder { previous: usize, found: usize },
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;
