//! Result packaging
//!
//! Serializes each page group into its own PDF and names it after the
//! original file.

use crate::config::SplitConfig;
use crate::document::PageSource;
use crate::error::PdfSplitError;
use crate::split::PageGroup;
use serde::Serialize;

/// One output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub byte_length: usize,
    pub page_description: String,
    pub page_count: usize,
}

impl SplitResult {
    pub fn summary(&self) -> ResultSummary {
        ResultSummary {
            filename: self.filename.clone(),
            byte_length: self.byte_length,
            page_description: self.page_description.clone(),
            page_count: self.page_count,
        }
    }
}

/// [`SplitResult`] without its bytes, for handing to a UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSummary {
    pub filename: String,
    pub byte_length: usize,
    pub page_description: String,
    pub page_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Packager {
    config: SplitConfig,
}

impl Packager {
    pub fn with_config(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Output filename for `group`, using the configured fallback base name.
    pub fn filename_for(&self, group: &PageGroup, original_filename: &str) -> String {
        filename_with_fallback(
            original_filename,
            &group.label.suffix(),
            &self.config.fallback_base_name,
        )
    }

    /// Build one [`SplitResult`] per group, in group order.
    ///
    /// Fails as a whole if any group fails; no partial list is returned.
    pub fn package<S: PageSource + ?Sized>(
        &self,
        doc: &S,
        groups: &[PageGroup],
        original_filename: &str,
    ) -> Result<Vec<SplitResult>, PdfSplitError> {
        groups
            .iter()
            .map(|group| {
                let bytes = doc.render_pages(&group.indices, self.config.compress_output)?;
                let filename = self.filename_for(group, original_filename);
                tracing::debug!(%filename, size = bytes.len(), "Packaged split result");

                Ok(SplitResult {
                    filename,
                    byte_length: bytes.len(),
                    bytes,
                    page_description: group.label.description(),
                    page_count: group.indices.len(),
                })
            })
            .collect()
    }
}

/// Package with the default configuration.
pub fn package<S: PageSource + ?Sized>(
    doc: &S,
    groups: &[PageGroup],
    original_filename: &str,
) -> Result<Vec<SplitResult>, PdfSplitError> {
    Packager::default().package(doc, groups, original_filename)
}

/// `{base}_{suffix}.pdf`, where `base` is the original name minus one
/// trailing `.pdf` (any case).
pub fn generate_filename(original_filename: &str, suffix: &str) -> String {
    filename_with_fallback(
        original_filename,
        suffix,
        crate::config::DEFAULT_BASE_NAME,
    )
}

fn filename_with_fallback(original_filename: &str, suffix: &str, fallback: &str) -> String {
    let base = strip_pdf_extension(original_filename.trim());
    let base = if base.trim().is_empty() { fallback } else { base };
    format!("{}_{}.pdf", base, suffix)
}

fn strip_pdf_extension(name: &str) -> &str {
    let cut = name.len().saturating_sub(4);
    match name.get(cut..) {
        Some(ext) if ext.eq_ignore_ascii_case(".pdf") => &name[..cut],
        _ => name,
    }
}
