//! Client-side PDF splitting
//!
//! This crate splits a PDF into several standalone PDFs using lopdf, without
//! any I/O of its own.
//!
//! The pipeline:
//! - [`LoadedDocument::load`]: parse bytes, reject malformed or encrypted input
//! - [`SplitPlan::from_text`]: turn a mode tag and user text into a validated plan
//! - [`split`]: compute groups of 0-based page indices
//! - [`Packager::package`]: copy each group into a fresh document and name it
//!
//! [`split_pdf`] runs all four steps.

mod copy;
pub mod config;
pub mod document;
pub mod error;
pub mod package;
pub mod plan;
pub mod ranges;
pub mod split;

#[cfg(test)]
mod test_support;

pub use config::SplitConfig;
pub use document::{quick_validate, DocumentInfo, LoadedDocument, PageSource};
pub use error::{ErrorKind, PdfSplitError};
pub use package::{generate_filename, package, Packager, ResultSummary, SplitResult};
pub use plan::{SplitMode, SplitOptions, SplitPlan};
pub use ranges::{parse_page_list, parse_pages_per_file, parse_ranges, ClosedRange};
pub use split::{split, GroupLabel, PageGroup};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<usize, PdfSplitError> {
    Ok(LoadedDocument::load(bytes)?.page_count())
}

/// Load, split and package in one call with the default configuration.
pub fn split_pdf(
    bytes: &[u8],
    original_filename: &str,
    plan: &SplitPlan,
) -> Result<Vec<SplitResult>, PdfSplitError> {
    split_pdf_with_config(bytes, original_filename, plan, &SplitConfig::default())
}

pub fn split_pdf_with_config(
    bytes: &[u8],
    original_filename: &str,
    plan: &SplitPlan,
    config: &SplitConfig,
) -> Result<Vec<SplitResult>, PdfSplitError> {
    let doc = LoadedDocument::load(bytes)?;
    let groups = split(&doc, plan)?;
    Packager::with_config(config.clone()).package(&doc, &groups, original_filename)
}
