//! tateyoko-test - regression test helpers
//!
//! - [`RegParams`]: accumulates value / rect / pixel comparisons and
//!   reports every failure at [`RegParams::cleanup`]
//! - [`PageBuilder`] and [`grid_page`]: synthetic binary pages, since the
//!   engine's behavior is easiest to pin down on exactly known shapes
//!
//! # Usage
//!
//! ```ignore
//! use tateyoko_test::{PageBuilder, RegParams};
//!
//! let mut rp = RegParams::new("detect");
//! let page = PageBuilder::new(100, 100).rect(10, 10, 20, 30).build();
//! rp.compare_values(600.0, page.count_foreground() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: `display` writes composed pages to `tests/regout/`

mod error;
mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use fixtures::{GridLayout, PageBuilder, grid_page};
pub use params::{RegParams, RegTestMode};

/// Path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // tateyoko-test lives at crates/tateyoko-test
    format!("{}/../..", manifest_dir)
}

/// Directory for display-mode output
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
