use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::{AddressError, Result};

static COLUMN_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+").expect("column pattern is valid"));
static ROW_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+$").expect("row pattern is valid"));

/// Convert column index (0-indexed) to label (A, B, ..., Z, AA, AB, ...)
pub fn col_to_label(col: u32) -> String {
    let mut label = String::new();
    let mut n = col as u64 + 1; // 1-indexed for calculation

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert column label (A, B, ..., Z, AA, AB, ...) to index (0-indexed).
///
/// Case-insensitive. Anything outside A-Z, an empty label, or a label past
/// `u32::MAX` is an error.
pub fn col_from_label(label: &str) -> Result<u32> {
    if label.is_empty() {
        return Err(AddressError::InvalidColumn(label.to_string()));
    }

    let mut col: u64 = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(AddressError::InvalidColumn(label.to_string()));
        }
        let digit = (c.to_ascii_uppercase() as u64) - ('A' as u64) + 1;
        col = col
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .filter(|v| *v <= u32::MAX as u64 + 1)
            .ok_or_else(|| AddressError::InvalidColumn(label.to_string()))?;
    }

    Ok((col - 1) as u32) // Convert to 0-indexed
}

/// Parse a 1-based decimal row into a 0-based offset
fn row_from_digits(digits: &str) -> Result<u32> {
    match digits.parse::<u32>() {
        Ok(0) | Err(_) => Err(AddressError::InvalidRow(digits.to_string())),
        Ok(row) => Ok(row - 1),
    }
}

/// A coordinate where either axis may be left unspecified.
///
/// `"C"` names column C on every row, `"3"` names row 3 in every column.
#[derive(Debug, Clone, Copy, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct PartialCoord {
    pub col: Option<u32>,
    pub row: Option<u32>,
}

impl PartialCoord {
    pub const fn new(col: Option<u32>, row: Option<u32>) -> Self {
        PartialCoord { col, row }
    }

    /// Both axes present
    pub fn to_cell(self) -> Option<CellCoord> {
        Some(CellCoord::new(self.row?, self.col?))
    }
}

impl From<CellCoord> for PartialCoord {
    fn from(coord: CellCoord) -> Self {
        PartialCoord::new(Some(coord.col), Some(coord.row))
    }
}

/// Permissive single-address parse: a leading run of letters is the column,
/// a trailing run of digits is the row. Everything else is ignored, so an
/// address may carry either part, both, or neither.
pub fn parse_cell(address: &str) -> Result<PartialCoord> {
    let col = COLUMN_PART
        .find(address)
        .map(|m| col_from_label(m.as_str()))
        .transpose()?;
    let row = ROW_PART
        .find(address)
        .map(|m| row_from_digits(m.as_str()))
        .transpose()?;

    Ok(PartialCoord { col, row })
}

/// Cell coordinate (0-indexed internally)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellCoord {
    pub row: u32,
    pub col: u32,
}

impl CellCoord {
    pub const fn new(row: u32, col: u32) -> Self {
        CellCoord { row, col }
    }

    /// Create from A1 notation (e.g., "A1" -> (0, 0), "B2" -> (1, 1)).
    /// Unlike [`parse_cell`], both parts are required and nothing else may
    /// appear in the string.
    pub fn from_a1(notation: &str) -> Result<Self> {
        let trimmed = notation.trim();
        let invalid = || AddressError::InvalidAddress(notation.to_string());
        let split = trimmed
            .find(|c: char| !c.is_ascii_alphabetic())
            .ok_or_else(invalid)?;
        let (col_str, row_str) = trimmed.split_at(split);

        if col_str.is_empty() || row_str.is_empty() || !row_str.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        Ok(CellCoord {
            row: row_from_digits(row_str)?,
            col: col_from_label(col_str)?,
        })
    }

    /// Convert to A1 notation (e.g., (0, 0) -> "A1")
    pub fn to_a1(&self) -> String {
        format!("{}{}", col_to_label(self.col), self.row as u64 + 1)
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

/// A rectangular block of cells (e.g., A1:B10)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub start: CellCoord,
    pub end: CellCoord,
}

impl CellRange {
    pub fn new(start: CellCoord, end: CellCoord) -> Self {
        // Normalize so start is top-left and end is bottom-right
        CellRange {
            start: CellCoord::new(start.row.min(end.row), start.col.min(end.col)),
            end: CellCoord::new(start.row.max(end.row), start.col.max(end.col)),
        }
    }

    /// A single-cell rectangle
    pub fn single(coord: CellCoord) -> Self {
        CellRange::new(coord, coord)
    }

    /// Build from a top-left origin and a size; both dimensions must be at
    /// least one cell.
    pub fn from_origin(start: CellCoord, width: u32, height: u32) -> Result<Self> {
        let end_col = width.checked_sub(1).and_then(|w| start.col.checked_add(w));
        let end_row = height.checked_sub(1).and_then(|h| start.row.checked_add(h));
        match (end_row, end_col) {
            (Some(row), Some(col)) => Ok(CellRange::new(start, CellCoord::new(row, col))),
            _ => Err(AddressError::InvalidRange(format!(
                "{}+{}x{}",
                start, width, height
            ))),
        }
    }

    /// Create from A1 or A1:B1 notation
    pub fn from_a1(notation: &str) -> Result<Self> {
        let parts: Vec<&str> = notation.split(':').collect();
        match parts.as_slice() {
            [single] => Ok(CellRange::single(CellCoord::from_a1(single)?)),
            [start, end] => Ok(CellRange::new(
                CellCoord::from_a1(start)?,
                CellCoord::from_a1(end)?,
            )),
            _ => Err(AddressError::InvalidRange(notation.to_string())),
        }
    }

    /// Convert to A1:B1 notation
    pub fn to_a1(&self) -> String {
        if self.start == self.end {
            self.start.to_a1()
        } else {
            format!("{}:{}", self.start.to_a1(), self.end.to_a1())
        }
    }

    /// Check if a coordinate is within this range
    pub fn contains(&self, coord: CellCoord) -> bool {
        coord.row >= self.start.row
            && coord.row <= self.end.row
            && coord.col >= self.start.col
            && coord.col <= self.end.col
    }

    /// Number of columns
    pub fn width(&self) -> u32 {
        self.end.col - self.start.col + 1
    }

    /// Number of rows
    pub fn height(&self) -> u32 {
        self.end.row - self.start.row + 1
    }

    pub fn cell_count(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Iterate over all coordinates in the range (row by row)
    pub fn iter(&self) -> CellRangeIter {
        CellRangeIter {
            range: *self,
            current_row: self.start.row as u64,
            current_col: self.start.col,
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1())
    }
}

impl IntoIterator for CellRange {
    type Item = CellCoord;
    type IntoIter = CellRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over coordinates in a range
pub struct CellRangeIter {
    range: CellRange,
    // u64 so the last row of a range ending at u32::MAX terminates
    current_row: u64,
    current_col: u32,
}

impl Iterator for CellRangeIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end.row as u64 {
            return None;
        }

        let coord = CellCoord::new(self.current_row as u32, self.current_col);

        if self.current_col >= self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        } else {
            self.current_col += 1;
        }

        Some(coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_col_to_label() {
        assert_eq!(col_to_label(0), "A");
        assert_eq!(col_to_label(1), "B");
        assert_eq!(col_to_label(25), "Z");
        assert_eq!(col_to_label(26), "AA");
        assert_eq!(col_to_label(27), "AB");
        assert_eq!(col_to_label(51), "AZ");
        assert_eq!(col_to_label(52), "BA");
        assert_eq!(col_to_label(701), "ZZ");
        assert_eq!(col_to_label(702), "AAA");
        assert_eq!(col_to_label(703), "AAB");
    }

    #[test]
    fn test_col_from_label() {
        assert_eq!(col_from_label("A"), Ok(0));
        assert_eq!(col_from_label("Z"), Ok(25));
        assert_eq!(col_from_label("AA"), Ok(26));
        assert_eq!(col_from_label("AB"), Ok(27));
        assert_eq!(col_from_label("ZZ"), Ok(701));
        assert_eq!(col_from_label("AAA"), Ok(702));
        assert_eq!(col_from_label("qr"), Ok(459));
    }

    #[test]
    fn test_col_from_label_rejects_non_letters() {
        assert_eq!(
            col_from_label("&@"),
            Err(AddressError::InvalidColumn("&@".to_string()))
        );
        assert!(col_from_label("A1").is_err());
        assert!(col_from_label("").is_err());
        assert!(col_from_label("Ä").is_err());
    }

    #[test]
    fn test_col_label_bounds() {
        let last = col_to_label(u32::MAX);
        assert_eq!(col_from_label(&last), Ok(u32::MAX));
        assert!(col_from_label(&"Z".repeat(40)).is_err());
    }

    #[test]
    fn test_col_round_trip_first_ten_thousand() {
        for n in 0..=10_000 {
            assert_eq!(col_from_label(&col_to_label(n)), Ok(n), "column {n}");
        }
    }

    proptest! {
        #[test]
        fn col_labels_are_bijective(n in any::<u32>()) {
            let label = col_to_label(n);
            prop_assert!(label.bytes().all(|b| b.is_ascii_uppercase()));
            prop_assert_eq!(col_from_label(&label), Ok(n));
            prop_assert_eq!(col_from_label(&label.to_lowercase()), Ok(n));
        }
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("A2"), Ok(PartialCoord::new(Some(0), Some(1))));
        assert_eq!(parse_cell("3"), Ok(PartialCoord::new(None, Some(2))));
        assert_eq!(parse_cell("C"), Ok(PartialCoord::new(Some(2), None)));
        assert_eq!(parse_cell("D4"), Ok(PartialCoord::new(Some(3), Some(3))));
        assert_eq!(parse_cell("ZA9"), Ok(PartialCoord::new(Some(676), Some(8))));
        assert_eq!(parse_cell("BB"), Ok(PartialCoord::new(Some(53), None)));
        assert_eq!(parse_cell("d4"), Ok(PartialCoord::new(Some(3), Some(3))));
    }

    #[test]
    fn test_parse_cell_is_permissive() {
        assert_eq!(parse_cell(""), Ok(PartialCoord::default()));
        assert_eq!(parse_cell("$B$7"), Ok(PartialCoord::new(None, Some(6))));
        assert_eq!(parse_cell("B-x"), Ok(PartialCoord::new(Some(1), None)));
        assert_eq!(parse_cell("C7 "), Ok(PartialCoord::new(Some(2), None)));
    }

    #[test]
    fn test_parse_cell_rejects_row_zero() {
        assert_eq!(
            parse_cell("A0"),
            Err(AddressError::InvalidRow("0".to_string()))
        );
        assert!(parse_cell("A99999999999").is_err());
    }

    #[test]
    fn test_coord_a1() {
        let coord = CellCoord::from_a1("A1").unwrap();
        assert_eq!(coord, CellCoord::new(0, 0));

        let coord = CellCoord::from_a1("b2").unwrap();
        assert_eq!(coord, CellCoord::new(1, 1));

        let coord = CellCoord::from_a1("AA100").unwrap();
        assert_eq!(coord, CellCoord::new(99, 26));
        assert_eq!(coord.to_a1(), "AA100");

        assert!(CellCoord::from_a1("A").is_err());
        assert!(CellCoord::from_a1("12").is_err());
        assert!(CellCoord::from_a1("A1B").is_err());
        assert!(CellCoord::from_a1("A0").is_err());
    }

    #[test]
    fn test_range_from_origin() {
        let range = CellRange::from_origin(CellCoord::new(1, 1), 3, 2).unwrap();
        assert_eq!(range.to_a1(), "B2:D3");
        assert_eq!(range.width(), 3);
        assert_eq!(range.height(), 2);
        assert_eq!(range.cell_count(), 6);

        assert!(CellRange::from_origin(CellCoord::new(0, 0), 0, 1).is_err());
        assert!(CellRange::from_origin(CellCoord::new(0, u32::MAX), 2, 1).is_err());
    }

    #[test]
    fn test_range_from_a1_normalizes() {
        let range = CellRange::from_a1("D3:B2").unwrap();
        assert_eq!(range.to_a1(), "B2:D3");
        assert!(CellRange::from_a1("A1:B2:C3").is_err());
        assert!(CellRange::from_a1("A:A").is_err());
    }

    #[test]
    fn test_range_iteration() {
        let range = CellRange::from_a1("A1:B2").unwrap();
        let coords: Vec<_> = range.iter().collect();

        assert_eq!(coords.len(), 4);
        assert_eq!(coords[0], CellCoord::new(0, 0));
        assert_eq!(coords[1], CellCoord::new(0, 1));
        assert_eq!(coords[2], CellCoord::new(1, 0));
        assert_eq!(coords[3], CellCoord::new(1, 1));
    }

    #[test]
    fn test_range_iteration_at_edge() {
        let corner = CellCoord::new(u32::MAX, u32::MAX);
        let coords: Vec<_> = CellRange::single(corner).into_iter().collect();
        assert_eq!(coords, vec![corner]);
    }
}
