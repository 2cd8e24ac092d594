//! tateyoko - Relayout of vertically typeset page scans
//!
//! Detects every character glyph on binary page images, recovers the
//! reading order of the vertical columns they sit in, and flows the
//! glyphs onto new pages in a different writing direction with their
//! own scale, spacing and page size.
//!
//! # Overview
//!
//! - [`region`] - connected components, glyph detection and fragment merging
//! - [`layout`] - reading-order resolution and destination page planning
//! - [`transform`] - mask resampling and page composition
//! - [`io`] - image page sources and PDF / TIFF / image-sequence writers
//! - [`config`] / [`pipeline`] - YAML configuration and the end-to-end run
//!
//! # Example
//!
//! ```
//! use tateyoko::{Config, Pipeline, PixMut, PixelDepth, Rect};
//!
//! // One source page with two glyphs stacked in a single column
//! let mut page = PixMut::new(120, 120, PixelDepth::Bit1).unwrap();
//! page.fill_rect(&Rect::new_unchecked(50, 10, 20, 20), 1);
//! page.fill_rect(&Rect::new_unchecked(50, 50, 20, 20), 1);
//!
//! let mut config = Config::default();
//! config.layout.output.page_width = Some(300);
//! config.layout.output.page_height = Some(200);
//! config.layout.output.margin = 20;
//!
//! let out = Pipeline::new(&config).unwrap().process_pages(vec![page.into()]).unwrap();
//! assert_eq!(out.glyphs.len(), 2);
//! assert_eq!(out.pages.len(), 1);
//! ```

// Core types are used everywhere
pub use tateyoko_core::*;

// Stage crates stay behind module names
pub use tateyoko_io as io;
pub use tateyoko_layout as layout;
pub use tateyoko_region as region;
pub use tateyoko_transform as transform;

pub mod config;
pub mod error;
pub mod pipeline;

pub use config::{
    Config, EngineConfig, OutputFormat, OutputSettings, load_config, page_size,
};
pub use error::{Error, Result};
pub use pipeline::{GlyphRecord, Pipeline, Relayout, RunSummary, open_writer};
