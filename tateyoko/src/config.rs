//! Configuration
//!
//! [`Config`] mirrors the YAML configuration file. Every section and
//! field has a default, and unknown keys are ignored, so partial files
//! and files carrying extra sections (such as `preprocessing`) load as
//! is. [`Config::validate`] turns it into an immutable [`EngineConfig`];
//! nothing downstream ever sees an unvalidated value.
//!
//! ```yaml
//! segmentation:
//!   merge_threshold: 3
//! layout:
//!   reading_order: right_to_left
//!   output:
//!     page_size: A5
//!     scale_factor: 1.2
//! output:
//!   format: pdf
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tateyoko_core::{
    Background, Direction, LayoutOptions, LayoutParameters, ReadingOrder, SegmentationOptions,
    SegmentationParams,
};
use tateyoko_layout::Pagination;
use tateyoko_transform::ScaleMethod;
use tracing::debug;

/// Page presets in pixels at 300 dpi
const PAGE_SIZES: [(&str, u32, u32); 4] = [
    ("A4", 2480, 3508),
    ("A5", 1748, 2480),
    ("Letter", 2550, 3300),
    ("B5", 2150, 3035),
];

/// Size of a named page preset at `dpi`.
///
/// Preset names are matched case-insensitively.
pub fn page_size(name: &str, dpi: u32) -> Result<(u32, u32)> {
    let (_, w, h) = PAGE_SIZES
        .iter()
        .find(|(n, _, _)| n.eq_ignore_ascii_case(name))
        .ok_or_else(|| {
            let known: Vec<&str> = PAGE_SIZES.iter().map(|(n, _, _)| *n).collect();
            Error::InvalidConfiguration(format!(
                "unknown page size {name:?}, expected one of {known:?}"
            ))
        })?;
    let scale = |v: u32| {
        u32::try_from(v as u64 * dpi as u64 / 300).map_err(|_| {
            Error::InvalidConfiguration(format!("page size {name} at {dpi} dpi is too large"))
        })
    };
    Ok((scale(*w)?, scale(*h)?))
}

/// Source page settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Gray levels below this become ink when binarizing input images
    pub threshold: u8,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

/// Glyph detection and merging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub min_char_width: u32,
    pub min_char_height: u32,
    pub min_area: u64,
    pub max_area: u64,
    pub merge_threshold: i32,
    pub column_tolerance: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        let d = SegmentationOptions::default();
        Self {
            min_char_width: d.min_char_width,
            min_char_height: d.min_char_height,
            min_area: d.min_area,
            max_area: d.max_area,
            merge_threshold: d.merge_threshold,
            column_tolerance: d.column_tolerance,
        }
    }
}

/// Destination page geometry and appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub page_size: String,
    /// Overrides the preset width
    pub page_width: Option<u32>,
    /// Overrides the preset height
    pub page_height: Option<u32>,
    pub dpi: u32,
    pub margin: i32,
    pub char_spacing: i32,
    pub line_spacing: i32,
    pub scale_factor: f64,
    pub background: String,
    /// `area_map` or `sampling`
    pub resample: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        let d = LayoutOptions::default();
        Self {
            page_size: "A4".to_string(),
            page_width: None,
            page_height: None,
            dpi: d.dpi,
            margin: d.margin,
            char_spacing: d.char_spacing,
            line_spacing: d.line_spacing,
            scale_factor: d.scale_factor,
            background: "white".to_string(),
            resample: ScaleMethod::default().as_str().to_string(),
        }
    }
}

/// Reading order and destination layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub direction: String,
    pub reading_order: String,
    /// `continuous` or `per_source_page`
    pub pagination: String,
    pub output: PageConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            direction: Direction::default().as_str().to_string(),
            reading_order: ReadingOrder::default().as_str().to_string(),
            pagination: Pagination::default().as_str().to_string(),
            output: PageConfig::default(),
        }
    }
}

/// Output document settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `pdf`, `images`, `jpeg` or `tiff`
    pub format: String,
    /// JPEG quality, 1 to 100
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "pdf".to_string(),
            quality: 95,
        }
    }
}

/// Complete configuration as read from YAML
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub segmentation: SegmentationConfig,
    pub layout: LayoutConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Read a YAML configuration file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        // An empty document is a config with every default
        if text.trim().is_empty() {
            return Ok(Config::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every value and build the engine's settings.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidConfiguration`] naming the first offending value.
    pub fn validate(&self) -> Result<EngineConfig> {
        let seg = &self.segmentation;
        let segmentation = SegmentationOptions {
            min_char_width: seg.min_char_width,
            min_char_height: seg.min_char_height,
            min_area: seg.min_area,
            max_area: seg.max_area,
            merge_threshold: seg.merge_threshold,
            column_tolerance: seg.column_tolerance,
        }
        .validate()?;

        let page = &self.layout.output;
        if page.dpi == 0 {
            return Err(Error::InvalidConfiguration("dpi must be > 0".to_string()));
        }
        let (preset_w, preset_h) = match (page.page_width, page.page_height) {
            (Some(w), Some(h)) => (w, h),
            _ => page_size(&page.page_size, page.dpi)?,
        };
        let layout = LayoutOptions {
            page_width: page.page_width.unwrap_or(preset_w),
            page_height: page.page_height.unwrap_or(preset_h),
            dpi: page.dpi,
            margin: page.margin,
            char_spacing: page.char_spacing,
            line_spacing: page.line_spacing,
            scale_factor: page.scale_factor,
            direction: self.layout.direction.parse()?,
            reading_order: self.layout.reading_order.parse()?,
            background: page.background.parse::<Background>()?,
        }
        .validate()?;

        let pagination = match self.layout.pagination.as_str() {
            "continuous" => Pagination::Continuous,
            "per_source_page" => Pagination::PerSourcePage,
            other => {
                return Err(Error::InvalidConfiguration(format!(
                    "unknown pagination: {other}"
                )));
            }
        };
        let resample = page
            .resample
            .parse::<ScaleMethod>()
            .map_err(|e| Error::InvalidConfiguration(e.to_string()))?;

        if !(1..=100).contains(&self.output.quality) {
            return Err(Error::InvalidConfiguration(format!(
                "quality must be in 1..=100, got {}",
                self.output.quality
            )));
        }
        let output = OutputSettings {
            format: self.output.format.parse()?,
            quality: self.output.quality as u8,
        };

        let engine = EngineConfig {
            segmentation,
            layout,
            pagination,
            resample,
            threshold: self.input.threshold,
            output,
        };
        debug!(?engine, "validated configuration");
        Ok(engine)
    }
}

/// Load configuration from `path`, falling back to defaults when no
/// path is given or the file does not exist.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) if p.exists() => Config::from_yaml(p),
        _ => Ok(Config::default()),
    }
}

/// Kind of document the pipeline writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// One multi-page PDF file
    #[default]
    Pdf,
    /// A directory of PNG files
    Images,
    /// A directory of JPEG files
    Jpeg,
    /// One multipage TIFF file
    Tiff,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Images => "images",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Tiff => "tiff",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "images" | "png" => Ok(OutputFormat::Images),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "tiff" | "tif" => Ok(OutputFormat::Tiff),
            other => Err(Error::InvalidConfiguration(format!(
                "unknown output format: {other}"
            ))),
        }
    }
}

/// Validated output settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSettings {
    pub format: OutputFormat,
    pub quality: u8,
}

/// Validated settings for a whole run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub segmentation: SegmentationParams,
    pub layout: LayoutParameters,
    pub pagination: Pagination,
    pub resample: ScaleMethod,
    /// Binarization threshold for image inputs
    pub threshold: u8,
    pub output: OutputSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            segmentation: SegmentationParams::default(),
            layout: LayoutParameters::default(),
            pagination: Pagination::default(),
            resample: ScaleMethod::default(),
            threshold: InputConfig::default().threshold,
            output: OutputSettings {
                format: OutputFormat::default(),
                quality: 95,
            },
        }
    }
}
