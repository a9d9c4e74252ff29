use std::collections::HashMap;

use sheethook_core::{col_to_label, CellCoord, CellValue};
use sheethook_dispatch::{CellStore, StoreError};

/// Widest header row read (column XFD)
const MAX_HEADER_COLUMNS: u32 = 16_384;

/// Header text to column letters, read from a header row.
///
/// Lets triggers be registered against "the Action column" instead of a
/// hard-coded letter that breaks when columns move.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, String>,
    order: Vec<String>,
}

impl HeaderMap {
    /// Read `header_row` (0-based) left to right, stopping at the first empty
    /// cell. A repeated header maps to its rightmost column.
    pub fn read(store: &dyn CellStore, sheet: &str, header_row: u32) -> Result<Self, StoreError> {
        let mut values = Vec::new();
        for col in 0..MAX_HEADER_COLUMNS {
            let value = store.read(sheet, &CellCoord::new(header_row, col).to_a1())?;
            if value.is_empty() {
                break;
            }
            values.push(value);
        }
        Ok(Self::from_values(values))
    }

    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = CellValue>,
    {
        let mut map = Self::default();
        for (col, value) in values.into_iter().enumerate() {
            let header = value.as_text();
            if !map.columns.contains_key(&header) {
                map.order.push(header.clone());
            }
            map.columns.insert(header, col_to_label(col as u32));
        }
        map
    }

    /// Column letters for a header
    pub fn column(&self, header: &str) -> Option<&str> {
        self.columns.get(header).map(String::as_str)
    }

    /// A1 address of a header's column on a 1-based row, e.g. `"F7"`
    pub fn cell(&self, header: &str, row: u32) -> Option<String> {
        Some(format!("{}{}", self.column(header)?, row))
    }

    /// The header's column from a 1-based row downwards, e.g. `"F2:F"`
    pub fn column_band(&self, header: &str, first_row: u32) -> Option<String> {
        let column = self.column(header)?;
        Some(format!("{}{}:{}", column, first_row, column))
    }

    /// Headers in first-seen order
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
