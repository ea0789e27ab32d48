use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PdfSplitError {
    #[error("Not a valid PDF: {0}")]
    Format(String),

    #[error("Unsupported PDF: {0}")]
    Unsupported(String),

    #[error("No usable pages or ranges in {0:?}")]
    EmptySpecification(String),

    #[error("None of the selected pages exist in a {page_count}-page document")]
    NoValidPages { page_count: usize },

    #[error("Unknown split mode: {0:?}")]
    InvalidMode(String),

    #[error("Malformed split plan: {0}")]
    InvalidPlan(String),

    #[error("Pages per file must be a whole number of at least 1, got {0:?}")]
    InvalidPagesPerFile(String),

    #[error("Page index {index} is out of bounds for a {page_count}-page document")]
    PageOutOfBounds { index: usize, page_count: usize },

    #[error("Failed to write PDF: {0}")]
    Output(String),
}

/// Stable, data-free discriminant of [`PdfSplitError`] for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Format,
    Unsupported,
    EmptySpecification,
    NoValidPages,
    InvalidMode,
    InvalidPlan,
    InvalidPagesPerFile,
    PageOutOfBounds,
    Output,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Format => "format",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::EmptySpecification => "empty_specification",
            ErrorKind::NoValidPages => "no_valid_pages",
            ErrorKind::InvalidMode => "invalid_mode",
            ErrorKind::InvalidPlan => "invalid_plan",
            ErrorKind::InvalidPagesPerFile => "invalid_pages_per_file",
            ErrorKind::PageOutOfBounds => "page_out_of_bounds",
            ErrorKind::Output => "output",
        }
    }
}

impl PdfSplitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PdfSplitError::Format(_) => ErrorKind::Format,
            PdfSplitError::Unsupported(_) => ErrorKind::Unsupported,
            PdfSplitError::EmptySpecification(_) => ErrorKind::EmptySpecification,
            PdfSplitError::NoValidPages { .. } => ErrorKind::NoValidPages,
            PdfSplitError::InvalidMode(_) => ErrorKind::InvalidMode,
            PdfSplitError::InvalidPlan(_) => ErrorKind::InvalidPlan,
            PdfSplitError::InvalidPagesPerFile(_) => ErrorKind::InvalidPagesPerFile,
            PdfSplitError::PageOutOfBounds { .. } => ErrorKind::PageOutOfBounds,
            PdfSplitError::Output(_) => ErrorKind::Output,
        }
    }

    /// Message suitable for showing to the person who picked the file.
    ///
    /// Unlike `Display`, this never includes parser output or internal
    /// identifiers.
    pub fn user_message(&self) -> String {
        match self {
            PdfSplitError::Format(_) => {
                "This file could not be read as a PDF. It may be damaged or not a PDF at all."
                    .to_string()
            }
            PdfSplitError::Unsupported(_) => {
                "This PDF is password-protected or uses a feature that is not supported. \
                 Please provide an unencrypted copy."
                    .to_string()
            }
            PdfSplitError::EmptySpecification(_) => {
                "No valid pages or ranges were entered. Use a format like 1-3, 5, 7-9.".to_string()
            }
            PdfSplitError::NoValidPages { page_count } => format!(
                "None of the selected pages exist. This document has pages 1 to {}.",
                page_count
            ),
            PdfSplitError::InvalidMode(_) | PdfSplitError::InvalidPlan(_) => {
                "Something went wrong choosing how to split this file. Please reload and try again."
                    .to_string()
            }
            PdfSplitError::InvalidPagesPerFile(_) => {
                "Pages per file must be a whole number of at least 1.".to_string()
            }
            PdfSplitError::PageOutOfBounds { .. } | PdfSplitError::Output(_) => {
                "Something went wrong while creating the split files. Please try again.".to_string()
            }
        }
    }
}
