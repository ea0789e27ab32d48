//! Split plans
//!
//! A [`SplitPlan`] is the validated form of the user's split choice. Plans
//! built through the parser are valid by construction; plans arriving as
//! JSON must pass [`SplitPlan::validated`] before reaching the engine.

use crate::error::PdfSplitError;
use crate::ranges::{parse_page_list, parse_pages_per_file, parse_ranges, ClosedRange};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Mode tag as sent by the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Fixed number of pages per output file
    Pages,
    /// One output file per range
    Range,
    /// One output file with the selected pages
    Extract,
}

impl SplitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            SplitMode::Pages => "pages",
            SplitMode::Range => "range",
            SplitMode::Extract => "extract",
        }
    }
}

impl FromStr for SplitMode {
    type Err = PdfSplitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pages" => Ok(SplitMode::Pages),
            "range" => Ok(SplitMode::Range),
            "extract" => Ok(SplitMode::Extract),
            other => Err(PdfSplitError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for SplitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode")]
pub enum SplitPlan {
    #[serde(rename = "pages")]
    ByCount {
        #[serde(rename = "pagesPerFile")]
        pages_per_file: u32,
    },
    #[serde(rename = "range")]
    ByRanges { ranges: Vec<ClosedRange> },
    #[serde(rename = "extract")]
    ExtractPages { pages: BTreeSet<u32> },
}

impl SplitPlan {
    pub fn by_count(pages_per_file: u32) -> Result<Self, PdfSplitError> {
        SplitPlan::ByCount { pages_per_file }.validated()
    }

    pub fn by_ranges(ranges: Vec<ClosedRange>) -> Result<Self, PdfSplitError> {
        SplitPlan::ByRanges { ranges }.validated()
    }

    pub fn extract_pages<I: IntoIterator<Item = u32>>(pages: I) -> Result<Self, PdfSplitError> {
        SplitPlan::ExtractPages {
            pages: pages.into_iter().collect(),
        }
        .validated()
    }

    /// Build a plan from a mode tag and the raw text of the matching option field.
    pub fn from_text(mode: &str, text: &str) -> Result<Self, PdfSplitError> {
        match mode.parse::<SplitMode>()? {
            SplitMode::Pages => Ok(SplitPlan::ByCount {
                pages_per_file: parse_pages_per_file(text)?,
            }),
            SplitMode::Range => Ok(SplitPlan::ByRanges {
                ranges: parse_ranges(text)?,
            }),
            SplitMode::Extract => Ok(SplitPlan::ExtractPages {
                pages: parse_page_list(text)?,
            }),
        }
    }

    /// Parse a JSON plan (`{"mode": "range", "ranges": [...]}`) and validate it.
    ///
    /// JSON that does not describe a plan at all is [`PdfSplitError::InvalidPlan`];
    /// a well-formed plan with nothing usable in it is `EmptySpecification`.
    pub fn from_json(json: &str) -> Result<Self, PdfSplitError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| PdfSplitError::InvalidPlan(e.to_string()))?;

        // Check the tag first so an unknown mode is reported as such
        value
            .get("mode")
            .and_then(|m| m.as_str())
            .unwrap_or_default()
            .parse::<SplitMode>()?;

        let plan: SplitPlan = serde_json::from_value(value)
            .map_err(|e| PdfSplitError::InvalidPlan(e.to_string()))?;
        plan.validated()
    }

    /// Apply the same rules as the text parser: inverted ranges and page 0
    /// are dropped, and nothing usable left is an error.
    pub fn validated(self) -> Result<Self, PdfSplitError> {
        match self {
            SplitPlan::ByCount { pages_per_file } if pages_per_file == 0 => Err(
                PdfSplitError::InvalidPagesPerFile(pages_per_file.to_string()),
            ),
            SplitPlan::ByCount { .. } => Ok(self),
            SplitPlan::ByRanges { ranges } => {
                let total = ranges.len();
                let ranges: Vec<ClosedRange> =
                    ranges.into_iter().filter(ClosedRange::is_valid).collect();
                if ranges.len() < total {
                    tracing::warn!(
                        dropped = total - ranges.len(),
                        "Dropping inverted or zero-based ranges from plan"
                    );
                }
                if ranges.is_empty() {
                    return Err(PdfSplitError::EmptySpecification(
                        "no valid ranges".to_string(),
                    ));
                }
                Ok(SplitPlan::ByRanges { ranges })
            }
            SplitPlan::ExtractPages { mut pages } => {
                pages.remove(&0);
                if pages.is_empty() {
                    return Err(PdfSplitError::EmptySpecification(
                        "no valid pages".to_string(),
                    ));
                }
                Ok(SplitPlan::ExtractPages { pages })
            }
        }
    }

    pub fn mode(&self) -> SplitMode {
        match self {
            SplitPlan::ByCount { .. } => SplitMode::Pages,
            SplitPlan::ByRanges { .. } => SplitMode::Range,
            SplitPlan::ExtractPages { .. } => SplitMode::Extract,
        }
    }
}

/// Options object as collected by the UI: a mode tag plus the raw text of
/// each option field. Only the field matching the mode is read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitOptions {
    pub mode: String,
    #[serde(default)]
    pub pages_per_file: Option<String>,
    #[serde(default)]
    pub ranges: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
}

impl SplitOptions {
    pub fn into_plan(self) -> Result<SplitPlan, PdfSplitError> {
        let mode = self.mode.parse::<SplitMode>()?;
        let text = match mode {
            SplitMode::Pages => self.pages_per_file,
            SplitMode::Range => self.ranges,
            SplitMode::Extract => self.pages,
        }
        .unwrap_or_default();

        SplitPlan::from_text(mode.as_str(), &text)
    }
}
