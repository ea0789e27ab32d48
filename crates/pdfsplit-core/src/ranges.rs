//! Page range text parsing
//!
//! Turns user input like "1-3, 5, 8-10" into validated 1-based ranges or
//! page sets. Segments that cannot be used are dropped with a warning; only
//! an input with nothing usable left is an error.

use crate::error::PdfSplitError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Page-list ranges never expand past this page number.
pub const MAX_PAGE_NUMBER: u32 = 1_000_000;

/// Inclusive, 1-based page interval with `1 <= start <= end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosedRange {
    pub start: u32,
    pub end: u32,
}

impl ClosedRange {
    /// Returns `None` for page 0 or an inverted range.
    pub fn new(start: u32, end: u32) -> Option<Self> {
        (start >= 1 && start <= end).then_some(Self { start, end })
    }

    pub fn single(page: u32) -> Option<Self> {
        Self::new(page, page)
    }

    pub fn is_valid(&self) -> bool {
        self.start >= 1 && self.start <= self.end
    }

    pub fn page_count(&self) -> u32 {
        self.end - self.start + 1
    }
}

/// Parse ranges in input order. Overlaps are kept; `3-1` is dropped, not swapped.
pub fn parse_ranges(text: &str) -> Result<Vec<ClosedRange>, PdfSplitError> {
    let ranges: Vec<ClosedRange> = segments(text).filter_map(parse_segment).collect();

    if ranges.is_empty() {
        return Err(PdfSplitError::EmptySpecification(text.to_string()));
    }
    Ok(ranges)
}

/// Parse a page list into a sorted, deduplicated set of page numbers.
pub fn parse_page_list(text: &str) -> Result<BTreeSet<u32>, PdfSplitError> {
    let mut pages = BTreeSet::new();

    for range in segments(text).filter_map(parse_segment) {
        if range.start > MAX_PAGE_NUMBER {
            tracing::warn!(
                start = range.start,
                limit = MAX_PAGE_NUMBER,
                "Dropping pages beyond the page number limit"
            );
            continue;
        }
        pages.extend(range.start..=range.end.min(MAX_PAGE_NUMBER));
    }

    if pages.is_empty() {
        return Err(PdfSplitError::EmptySpecification(text.to_string()));
    }
    Ok(pages)
}

/// Parse the chunk size for fixed-count splitting.
pub fn parse_pages_per_file(text: &str) -> Result<u32, PdfSplitError> {
    match text.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(PdfSplitError::InvalidPagesPerFile(text.trim().to_string())),
    }
}

fn segments(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_segment(segment: &str) -> Option<ClosedRange> {
    let parsed = match segment.split_once('-') {
        Some((start, end)) => match (parse_page(start), parse_page(end)) {
            (Some(start), Some(end)) => ClosedRange::new(start, end),
            _ => None,
        },
        None => parse_page(segment).and_then(ClosedRange::single),
    };

    if parsed.is_none() {
        tracing::warn!(segment, "Dropping unusable page range segment");
    }
    parsed
}

fn parse_page(s: &str) -> Option<u32> {
    s.trim().parse::<u32>().ok().filter(|&n| n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn r(start: u32, end: u32) -> ClosedRange {
        ClosedRange { start, end }
    }

    #[test]
    fn test_parse_ranges_mixed() {
        assert_eq!(
            parse_ranges("1-3, 5, 7-9").unwrap(),
            vec![r(1, 3), r(5, 5), r(7, 9)]
        );
    }

    #[test]
    fn test_parse_ranges_drops_invalid_segments() {
        assert_eq!(parse_ranges("3-1, abc, 4").unwrap(), vec![r(4, 4)]);
    }

    #[test]
    fn test_parse_ranges_keeps_order_and_overlap() {
        assert_eq!(
            parse_ranges("5-8, 1-2, 6-7").unwrap(),
            vec![r(5, 8), r(1, 2), r(6, 7)]
        );
    }

    #[test]
    fn test_parse_ranges_drops_zero_and_negative() {
        assert_eq!(parse_ranges("0, -3, 0-2, 2--1, 6").unwrap(), vec![r(6, 6)]);
    }

    #[test]
    fn test_parse_ranges_tolerates_whitespace_and_empty_segments() {
        assert_eq!(
            parse_ranges(" 2 - 4 ,, 10 ,").unwrap(),
            vec![r(2, 4), r(10, 10)]
        );
    }

    #[test]
    fn test_parse_ranges_rejects_three_part_segment() {
        assert_eq!(parse_ranges("1-2-3, 9").unwrap(), vec![r(9, 9)]);
    }

    #[test]
    fn test_parse_ranges_all_invalid_is_empty_specification() {
        let err = parse_ranges("abc, 5-2, 0").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptySpecification);
        assert_eq!(parse_ranges("").unwrap_err().kind(), ErrorKind::EmptySpecification);
    }

    #[test]
    fn test_parse_page_list_sorts_and_dedups() {
        let pages = parse_page_list("3, 1, 1, 5").unwrap();
        assert_eq!(pages.into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_parse_page_list_expands_ranges() {
        let pages = parse_page_list("8-10, 2, 9").unwrap();
        assert_eq!(pages.into_iter().collect::<Vec<_>>(), vec![2, 8, 9, 10]);
    }

    #[test]
    fn test_parse_page_list_caps_huge_ranges() {
        let pages = parse_page_list("999999-4000000000").unwrap();
        assert_eq!(pages.len(), 2);
        assert!(parse_page_list("2000000").is_err());
    }

    #[test]
    fn test_parse_page_list_empty_is_error() {
        let err = parse_page_list(" , x").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptySpecification);
    }

    #[test]
    fn test_parse_pages_per_file() {
        assert_eq!(parse_pages_per_file(" 4 ").unwrap(), 4);
        assert_eq!(
            parse_pages_per_file("0").unwrap_err().kind(),
            ErrorKind::InvalidPagesPerFile
        );
        assert!(parse_pages_per_file("-2").is_err());
        assert!(parse_pages_per_file("two").is_err());
    }

    #[test]
    fn test_closed_range_constructor() {
        assert_eq!(ClosedRange::new(2, 5), Some(r(2, 5)));
        assert_eq!(ClosedRange::new(5, 2), None);
        assert_eq!(ClosedRange::new(0, 2), None);
        assert_eq!(r(3, 6).page_count(), 4);
    }
}
