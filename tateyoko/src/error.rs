//! Error types for the tateyoko facade
//!
//! Configuration problems from any layer surface as
//! [`Error::InvalidConfiguration`] and a glyph too large for the page as
//! [`Error::LayoutOverflow`]; everything else wraps the originating
//! crate's error.

use tateyoko_core::GlyphId;
use tateyoko_io::IoError;
use tateyoko_layout::LayoutError;
use tateyoko_region::RegionError;
use tateyoko_transform::TransformError;
use thiserror::Error;

/// Facade error type
#[derive(Debug, Error)]
pub enum Error {
    /// Rejected configuration; raised before any page is processed
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A glyph's scaled footprint exceeds the writable page area
    #[error(
        "layout overflow: glyph {glyph} needs {}x{} px, writable area is {}x{} px",
        required.0, required.1, available.0, available.1
    )]
    LayoutOverflow {
        glyph: GlyphId,
        required: (u32, u32),
        available: (u32, u32),
    },

    /// The caller asked the run to stop
    #[error("cancelled after {completed_units} units of work")]
    Cancelled { completed_units: usize },

    /// Configuration file could not be read or parsed
    #[error("config error: {0}")]
    Config(String),

    #[error("core error: {0}")]
    Core(tateyoko_core::Error),

    #[error("segmentation error: {0}")]
    Region(RegionError),

    #[error("layout error: {0}")]
    Layout(LayoutError),

    #[error("composition error: {0}")]
    Transform(#[from] TransformError),

    #[error("I/O error: {0}")]
    Io(#[from] IoError),
}

/// Result type for facade operations
pub type Result<T> = std::result::Result<T, Error>;

impl From<tateyoko_core::Error> for Error {
    fn from(e: tateyoko_core::Error) -> Self {
        match e {
            tateyoko_core::Error::InvalidConfiguration(msg) => Error::InvalidConfiguration(msg),
            other => Error::Core(other),
        }
    }
}

impl From<RegionError> for Error {
    fn from(e: RegionError) -> Self {
        match e {
            RegionError::Core(core) => core.into(),
            other => Error::Region(other),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(e: LayoutError) -> Self {
        match e {
            LayoutError::Overflow {
                glyph,
                required,
                available,
            } => Error::LayoutOverflow {
                glyph,
                required,
                available,
            },
            other => Error::Layout(other),
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Config(e.to_string())
    }
}
