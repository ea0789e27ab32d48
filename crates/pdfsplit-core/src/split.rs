//! PDF Split algorithm
//!
//! Turns a [`SplitPlan`] into groups of 0-based page indices. This is the
//! only place 1-based plan numbers become 0-based indices; labels carry the
//! 1-based numbers back out for filenames and descriptions.

use crate::document::PageSource;
use crate::error::PdfSplitError;
use crate::plan::SplitPlan;
use serde::Serialize;

/// What a group covers, in 1-based page numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GroupLabel {
    /// A fixed-size chunk
    Chunk { start: u32, end: u32 },
    /// A user range after clamping to the document
    Range { start: u32, end: u32 },
    /// Selected pages, ascending
    Extracted { pages: Vec<u32> },
}

impl GroupLabel {
    /// Filename fragment, e.g. `pages_1-3` or `extracted_pages_2-4`
    pub fn suffix(&self) -> String {
        match self {
            GroupLabel::Chunk { start, end } => format!("pages_{}-{}", start, end),
            GroupLabel::Range { start, end } => format!("range_{}-{}", start, end),
            GroupLabel::Extracted { pages } => format!("extracted_pages_{}", join(pages, "-")),
        }
    }

    /// Human-readable description, e.g. `Pages 1-3`
    pub fn description(&self) -> String {
        match self {
            GroupLabel::Chunk { start, end } | GroupLabel::Range { start, end } => {
                if start == end {
                    format!("Page {}", start)
                } else {
                    format!("Pages {}-{}", start, end)
                }
            }
            GroupLabel::Extracted { pages } if pages.len() == 1 => format!("Page {}", pages[0]),
            GroupLabel::Extracted { pages } => format!("Pages {}", join(pages, ", ")),
        }
    }
}

fn join(pages: &[u32], separator: &str) -> String {
    pages
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

/// One output document's worth of pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageGroup {
    /// 0-based page indices, in output order
    pub indices: Vec<usize>,
    pub label: GroupLabel,
}

/// Compute the page groups for `plan` against `doc`.
///
/// Ranges that fall outside the document are skipped with a warning; only
/// an extraction with no page inside the document is an error.
pub fn split<S: PageSource + ?Sized>(
    doc: &S,
    plan: &SplitPlan,
) -> Result<Vec<PageGroup>, PdfSplitError> {
    let page_count = doc.page_count();

    let groups = match plan {
        SplitPlan::ByCount { pages_per_file } => split_by_count(page_count, *pages_per_file),
        SplitPlan::ByRanges { ranges } => ranges
            .iter()
            .filter_map(|range| clamp_range(page_count, range.start, range.end))
            .collect(),
        SplitPlan::ExtractPages { pages } => {
            let pages: Vec<u32> = pages
                .iter()
                .copied()
                .filter(|&p| p >= 1 && p as usize <= page_count)
                .collect();
            if pages.is_empty() {
                return Err(PdfSplitError::NoValidPages { page_count });
            }
            vec![PageGroup {
                indices: pages.iter().map(|&p| p as usize - 1).collect(),
                label: GroupLabel::Extracted { pages },
            }]
        }
    };

    tracing::debug!(
        mode = %plan.mode(),
        page_count,
        groups = groups.len(),
        "Computed split groups"
    );
    Ok(groups)
}

fn split_by_count(page_count: usize, pages_per_file: u32) -> Vec<PageGroup> {
    let chunk = (pages_per_file as usize).max(1);

    (0..page_count)
        .step_by(chunk)
        .map(|first| {
            let last = (first + chunk).min(page_count) - 1;
            PageGroup {
                indices: (first..=last).collect(),
                label: GroupLabel::Chunk {
                    start: first as u32 + 1,
                    end: last as u32 + 1,
                },
            }
        })
        .collect()
}

fn clamp_range(page_count: usize, start: u32, end: u32) -> Option<PageGroup> {
    let start = start.max(1) as usize;
    let end = (end as usize).min(page_count);

    if end == 0 || start > end {
        tracing::warn!(
            start,
            end,
            page_count,
            "Skipping range outside the document"
        );
        return None;
    }

    let (first, last) = (start - 1, end - 1);
    Some(PageGroup {
        indices: (first..=last).collect(),
        label: GroupLabel::Range {
            start: start as u32,
            end: end as u32,
        },
    })
}
