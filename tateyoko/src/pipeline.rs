//! End-to-end relayout pipeline
//!
//! Stages, in order:
//!
//! 1. detect + merge, one source page per task (parallel)
//! 2. reading-order resolution, stitched in source-page order
//! 3. layout planning over the whole ordered stream
//! 4. composition, one destination page per task (parallel)
//!
//! A cancel flag set by the caller is checked before each unit of work
//! (a source page in stage 1, a destination page in stage 4).

use crate::config::{Config, EngineConfig, OutputFormat, OutputSettings};
use crate::error::{Error, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tateyoko_core::{ComposedPage, GlyphId, Pix, Placement, Rect};
use tateyoko_io::{
    DocumentWriter, ImageFileSource, ImageFormat, ImageSequenceWriter, PageSource,
    PdfDocumentWriter, TiffDocumentWriter,
};
use tateyoko_layout::{LayoutPlanner, OrderCursor, ReadingOrderResolver, resolve_pages};
use tateyoko_region::{MergeOutcome, segment_page};
use tateyoko_transform::{PageComposer, PlacedGlyph, group_by_page};
use tracing::{debug, info};

/// Metadata of one finalized glyph, in reading order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphRecord {
    pub id: GlyphId,
    /// Bounding box on the source page
    pub bbox: Rect,
    pub area: u64,
    pub column_id: usize,
    pub order_index: usize,
}

/// Counters for a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub source_pages: usize,
    pub glyphs: usize,
    pub merges: usize,
    pub dropped_noise: usize,
    pub dropped_oversize: usize,
    pub dest_pages: usize,
}

/// Everything the engine produced for a set of source pages
#[derive(Debug, Clone)]
pub struct Relayout {
    pub glyphs: Vec<GlyphRecord>,
    pub placements: Vec<Placement>,
    pub pages: Vec<ComposedPage>,
    pub summary: RunSummary,
}

/// Configured relayout engine
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    engine: EngineConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Pipeline {
    /// Validate `config` and build a pipeline from it.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] before any page is touched.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::from_engine(config.validate()?))
    }

    pub fn from_engine(engine: EngineConfig) -> Self {
        Self {
            engine,
            cancel: None,
        }
    }

    /// Stop at the next unit boundary once `flag` becomes true.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    fn check_cancel(&self, completed: &AtomicUsize) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled {
                completed_units: completed.load(Ordering::Relaxed),
            }),
            _ => Ok(()),
        }
    }

    /// Run every stage on pages already in memory.
    ///
    /// Pages must be 1 bpp with foreground pixels set to 1.
    pub fn process_pages(&self, pages: Vec<Pix>) -> Result<Relayout> {
        let completed = AtomicUsize::new(0);
        let source_pages = pages.len();
        let seg = &self.engine.segmentation;

        let outcomes: Vec<MergeOutcome> = pages
            .par_iter()
            .enumerate()
            .map(|(index, page)| {
                self.check_cancel(&completed)?;
                let outcome = segment_page(page, index, seg)?;
                completed.fetch_add(1, Ordering::Relaxed);
                Ok(outcome)
            })
            .collect::<Result<_>>()?;
        drop(pages);

        let mut summary = RunSummary {
            source_pages,
            ..RunSummary::default()
        };
        let mut per_page = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            summary.merges += outcome.merges;
            summary.dropped_noise += outcome.dropped_noise;
            summary.dropped_oversize += outcome.dropped_oversize;
            per_page.push(outcome.glyphs);
        }

        let resolver =
            ReadingOrderResolver::from_params(self.engine.layout.reading_order(), seg);
        let (ordered, _) = resolve_pages(&resolver, per_page, OrderCursor::new());
        summary.glyphs = ordered.len();

        let plan = LayoutPlanner::new(self.engine.layout)
            .with_pagination(self.engine.pagination)
            .plan(&ordered)?;

        let glyphs: Vec<GlyphRecord> = ordered
            .iter()
            .map(|g| GlyphRecord {
                id: g.id(),
                bbox: g.glyph().bbox(),
                area: g.glyph().area(),
                column_id: g.column_id(),
                order_index: g.order_index(),
            })
            .collect();
        let placed: Vec<PlacedGlyph> = plan
            .placements
            .iter()
            .zip(ordered)
            .map(|(placement, g)| PlacedGlyph {
                placement: *placement,
                mask: g.into_glyph().into_mask(),
            })
            .collect();

        let composer = PageComposer::new(&self.engine.layout).with_method(self.engine.resample);
        let pages: Vec<ComposedPage> = group_by_page(plan.page_count, placed)?
            .into_par_iter()
            .enumerate()
            .map(|(index, page)| {
                self.check_cancel(&completed)?;
                let composed = composer.compose_page(index, page)?;
                completed.fetch_add(1, Ordering::Relaxed);
                Ok(composed)
            })
            .collect::<Result<_>>()?;
        summary.dest_pages = pages.len();

        debug!(?summary, "relayout complete");
        Ok(Relayout {
            glyphs,
            placements: plan.placements,
            pages,
            summary,
        })
    }

    /// Drain `source`, relayout every page and hand the result to `writer`.
    pub fn run(
        &self,
        source: &mut dyn PageSource,
        writer: &mut dyn DocumentWriter,
    ) -> Result<RunSummary> {
        let mut pages = Vec::with_capacity(source.remaining_hint().unwrap_or(0));
        while let Some(page) = source.next_page()? {
            pages.push(page);
        }
        info!(
            pages = pages.len(),
            direction = %self.engine.layout.direction(),
            reading_order = %self.engine.layout.reading_order(),
            "starting relayout"
        );

        let relayout = self.process_pages(pages)?;
        for page in &relayout.pages {
            writer.write_page(page)?;
        }
        writer.finish()?;

        let s = relayout.summary;
        info!(
            source_pages = s.source_pages,
            glyphs = s.glyphs,
            merges = s.merges,
            dropped_noise = s.dropped_noise,
            dropped_oversize = s.dropped_oversize,
            dest_pages = s.dest_pages,
            "relayout finished"
        );
        Ok(s)
    }

    /// Relayout image files into a document at `output`.
    ///
    /// `output` is a file for PDF and TIFF, a directory for image sequences.
    pub fn convert<I, P>(&self, inputs: I, output: &Path) -> Result<RunSummary>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut source = ImageFileSource::new(inputs).with_threshold(self.engine.threshold);
        let mut writer = open_writer(&self.engine.output, output)?;
        self.run(&mut source, writer.as_mut())
    }
}

/// Writer for `settings` targeting `path`.
pub fn open_writer(settings: &OutputSettings, path: &Path) -> Result<Box<dyn DocumentWriter>> {
    let writer: Box<dyn DocumentWriter> = match settings.format {
        OutputFormat::Pdf => Box::new(PdfDocumentWriter::new(path)),
        OutputFormat::Tiff => Box::new(TiffDocumentWriter::new(path)),
        OutputFormat::Images => Box::new(ImageSequenceWriter::new(path, ImageFormat::Png)?),
        OutputFormat::Jpeg => Box::new(
            ImageSequenceWriter::new(path, ImageFormat::Jpeg)?.with_quality(settings.quality),
        ),
    };
    debug!(format = %settings.format, path = %path.display(), "opened writer");
    Ok(writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tateyoko_io::{MemoryDocumentWriter, MemoryPageSource};
    use tateyoko_test::PageBuilder;

    fn small_config() -> Config {
        let mut cfg = Config::default();
        cfg.layout.output.page_width = Some(400);
        cfg.layout.output.page_height = Some(400);
        cfg.layout.output.margin = 20;
        cfg.layout.output.scale_factor = 1.0;
        cfg
    }

    #[test]
    fn test_empty_input_gives_one_blank_page() {
        let pipeline = Pipeline::new(&small_config()).unwrap();
        let out = pipeline.process_pages(Vec::new()).unwrap();
        assert!(out.glyphs.is_empty());
        assert_eq!(out.pages.len(), 1);
        assert_eq!(out.pages[0].pix.get_pixel(200, 200), Some(255));
    }

    #[test]
    fn test_run_writes_every_page() {
        let page = PageBuilder::new(200, 200)
            .rect(150, 20, 20, 20)
            .rect(150, 60, 20, 20)
            .build();
        let pipeline = Pipeline::new(&small_config()).unwrap();
        let mut source = MemoryPageSource::new(vec![page.clone(), page]);
        let mut writer = MemoryDocumentWriter::default();
        let summary = pipeline.run(&mut source, &mut writer).unwrap();
        assert_eq!(summary.source_pages, 2);
        assert_eq!(summary.glyphs, 4);
        assert_eq!(writer.pages.len(), summary.dest_pages);
        assert!(writer.finished);
    }

    #[test]
    fn test_preset_cancel_stops_before_any_work() {
        let flag = Arc::new(AtomicBool::new(true));
        let pipeline = Pipeline::new(&small_config()).unwrap().with_cancel(flag);
        let page = PageBuilder::new(50, 50).rect(10, 10, 20, 20).build();
        match pipeline.process_pages(vec![page]) {
            Err(Error::Cancelled { completed_units }) => assert_eq!(completed_units, 0),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }

    #[test]
    fn test_open_writer_creates_sequence_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("pages");
        let settings = OutputSettings {
            format: OutputFormat::Images,
            quality: 90,
        };
        let mut writer = open_writer(&settings, &dir).unwrap();
        assert!(dir.is_dir());
        writer.finish().unwrap();
    }
}
