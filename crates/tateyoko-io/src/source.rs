//! Page sources
//!
//! A [`PageSource`] feeds binary pages into the engine, one source page
//! at a time, in reading order.

use crate::{IoResult, read_image_pages};
use std::collections::VecDeque;
use std::path::PathBuf;
use tateyoko_core::Pix;
use tracing::debug;

/// Supplies binary (1 bpp) source pages in document order
pub trait PageSource {
    /// Next page, or `None` when the source is exhausted.
    fn next_page(&mut self) -> IoResult<Option<Pix>>;

    /// Number of remaining pages, if known.
    fn remaining_hint(&self) -> Option<usize> {
        None
    }
}

/// Reads PNG, JPEG and TIFF files and binarizes them with a global threshold
///
/// A multipage TIFF contributes one source page per directory.
#[derive(Debug)]
pub struct ImageFileSource {
    paths: VecDeque<PathBuf>,
    pending: VecDeque<Pix>,
    threshold: u8,
}

impl ImageFileSource {
    /// Gray levels below this become ink
    pub const DEFAULT_THRESHOLD: u8 = 128;

    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            pending: VecDeque::new(),
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }
}

impl PageSource for ImageFileSource {
    fn next_page(&mut self) -> IoResult<Option<Pix>> {
        loop {
            if let Some(gray) = self.pending.pop_front() {
                return Ok(Some(gray.threshold_to_binary(self.threshold)?));
            }
            let Some(path) = self.paths.pop_front() else {
                return Ok(None);
            };
            let pages = read_image_pages(&path)?;
            debug!(path = %path.display(), pages = pages.len(), "read source image");
            self.pending.extend(pages);
        }
    }

    fn remaining_hint(&self) -> Option<usize> {
        // Only exact once every file has been opened
        self.paths.is_empty().then_some(self.pending.len())
    }
}

/// Pages already decoded by the caller
#[derive(Debug, Default)]
pub struct MemoryPageSource {
    pages: VecDeque<Pix>,
}

impl MemoryPageSource {
    pub fn new(pages: Vec<Pix>) -> Self {
        Self {
            pages: pages.into(),
        }
    }
}

impl From<Vec<Pix>> for MemoryPageSource {
    fn from(pages: Vec<Pix>) -> Self {
        Self::new(pages)
    }
}

impl PageSource for MemoryPageSource {
    fn next_page(&mut self) -> IoResult<Option<Pix>> {
        Ok(self.pages.pop_front())
    }

    fn remaining_hint(&self) -> Option<usize> {
        Some(self.pages.len())
    }
}
