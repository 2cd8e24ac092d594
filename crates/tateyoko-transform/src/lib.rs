//! tateyoko-transform - Glyph resampling and page composition
//!
//! - [`scale_to_size`] - resample a mask by sampling or area mapping
//! - [`PageComposer`] - draw placed glyphs onto background-filled
//!   destination canvases, one rayon task per page

pub mod compose;
pub mod error;
pub mod scale;

pub use compose::{PageComposer, PlacedGlyph, group_by_page};
pub use error::{TransformError, TransformResult};
pub use scale::{ScaleMethod, scale_by_area_map, scale_by_sampling, scale_to_size};
