//! Output configuration for split results

use serde::{Deserialize, Serialize};

/// Base name used when the original filename has nothing left after
/// removing its extension.
pub const DEFAULT_BASE_NAME: &str = "document";

/// Settings applied by the [`Packager`](crate::package::Packager)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitConfig {
    /// Base name for output files when the original name is empty
    pub fallback_base_name: String,
    /// Flate-compress content streams of each output document
    pub compress_output: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            fallback_base_name: DEFAULT_BASE_NAME.to_string(),
            compress_output: true,
        }
    }
}

impl SplitConfig {
    pub fn with_fallback_base_name(mut self, name: &str) -> Self {
        let name = name.trim();
        if !name.is_empty() {
            self.fallback_base_name = name.to_string();
        }
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress_output = compress;
        self
    }
}
