//! Range specifier matching.
//!
//! A specifier is either a single address (`"D4"`) or two addresses joined by
//! a colon. Each side is parsed with [`parse_cell`], so an axis a side leaves
//! out becomes an open bound: `"A:A"` is column A on every row, `"3:5"` is
//! rows 3 to 5 in every column and `"F2:F"` is column F from row 2 down.

use crate::error::Result;
use crate::range::{parse_cell, PartialCoord};

/// Parsed bounds of a `start:end` specifier. `None` on any side means that
/// side is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeBounds {
    pub start: PartialCoord,
    pub end: PartialCoord,
}

impl RangeBounds {
    /// Parse a specifier that contains a colon. Only the first two segments
    /// are read; anything after a second colon is ignored.
    ///
    /// Returns `Ok(None)` when the specifier has no colon at all.
    pub fn parse(specifier: &str) -> Result<Option<Self>> {
        if !specifier.contains(':') {
            return Ok(None);
        }
        let mut sides = specifier.split(':');
        let start = parse_cell(sides.next().unwrap_or_default())?;
        let end = parse_cell(sides.next().unwrap_or_default())?;

        Ok(Some(RangeBounds { start, end }))
    }

    /// Check whether a (possibly partial) cell falls inside these bounds.
    /// A bounded axis never contains a cell that leaves that axis out.
    pub fn contains(&self, cell: PartialCoord) -> bool {
        within(self.start.col, self.end.col, cell.col)
            && within(self.start.row, self.end.row, cell.row)
    }
}

fn within(low: Option<u32>, high: Option<u32>, value: Option<u32>) -> bool {
    let above = match low {
        None => true,
        Some(low) => value.is_some_and(|v| low <= v),
    };
    let below = match high {
        None => true,
        Some(high) => value.is_some_and(|v| high >= v),
    };
    above && below
}

/// Check if `cell` is covered by `specifier`, ignoring ASCII case.
///
/// Textually equal strings match before anything is parsed, so a malformed
/// specifier still matches a cell spelled the same way.
pub fn range_matches(specifier: &str, cell: &str) -> Result<bool> {
    if specifier.eq_ignore_ascii_case(cell) {
        return Ok(true);
    }

    match RangeBounds::parse(specifier)? {
        Some(bounds) => Ok(bounds.contains(parse_cell(cell)?)),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AddressError;

    fn matches(specifier: &str, cell: &str) -> bool {
        range_matches(specifier, cell).unwrap()
    }

    #[test]
    fn test_single_cell() {
        assert!(matches("A3", "A3"));
        assert!(!matches("B3", "A3"));
        assert!(matches("a3", "A3"));
        assert!(matches("A3", "a3"));
    }

    #[test]
    fn test_column_and_row_bands() {
        assert!(matches("A:A", "A3"));
        assert!(!matches("A:A", "B3"));
        assert!(matches("3:3", "A3"));
        assert!(!matches("3:3", "A4"));
        assert!(matches("B:D", "C4"));
        assert!(!matches("B:D", "E4"));
        assert!(matches("3:5", "C4"));
        assert!(!matches("3:5", "C6"));
    }

    #[test]
    fn test_rectangles() {
        assert!(matches("B5:D7", "D7"));
        assert!(matches("B5:D7", "B5"));
        assert!(!matches("B5:C7", "D7"));
        assert!(!matches("B5:D7", "C4"));
        assert!(matches("b5:d7", "c6"));
    }

    #[test]
    fn test_open_ended_column_from_row() {
        assert!(matches("F2:F", "F2"));
        assert!(matches("F2:F", "F900"));
        assert!(!matches("F2:F", "F1"));
        assert!(!matches("F2:F", "G2"));
    }

    #[test]
    fn test_single_specifier_only_matches_itself() {
        assert!(!matches("A", "A3"));
        assert!(!matches("3", "A3"));
    }

    #[test]
    fn test_partial_cell_against_bounded_axis() {
        assert!(matches("3:3", "3"));
        assert!(!matches("A:A", "3"));
        assert!(matches("A:A", "A"));
    }

    #[test]
    fn test_extra_segments_are_ignored() {
        assert!(matches("B5:D7:Z99", "C6"));
        assert!(!matches("B5:D7:Z99", "Z99"));
    }

    #[test]
    fn test_parse_failures_propagate() {
        assert_eq!(
            range_matches("A0:B2", "A1"),
            Err(AddressError::InvalidRow("0".to_string()))
        );
        assert!(range_matches("A1:B2", "A0").is_err());
    }

    // Documented quirk: equality is checked before parsing, so a malformed
    // specifier matches an identical cell string instead of failing.
    #[test]
    fn test_equal_text_short_circuits_parsing() {
        assert_eq!(range_matches("A0:B2", "a0:b2"), Ok(true));
        assert_eq!(range_matches("&@", "&@"), Ok(true));
    }

    #[test]
    fn test_range_bounds_parse() {
        assert_eq!(RangeBounds::parse("D4"), Ok(None));
        let bounds = RangeBounds::parse("B:3").unwrap().unwrap();
        assert_eq!(bounds.start, PartialCoord::new(Some(1), None));
        assert_eq!(bounds.end, PartialCoord::new(None, Some(2)));
        assert!(bounds.contains(PartialCoord::new(Some(5), Some(0))));
        assert!(!bounds.contains(PartialCoord::new(Some(0), Some(0))));
    }
}
