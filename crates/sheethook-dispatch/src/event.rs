use std::collections::HashMap;

use sheethook_core::{AddressError, CellCoord, CellRange, CellValue};

use crate::error::StoreError;
use crate::host::CellStore;

/// An edit reported by the host: the rectangle that changed on one sheet.
///
/// `old_value`/`value` are only meaningful for single-cell edits; callbacks
/// read the current value of each cell through the store.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEvent {
    pub sheet: String,
    pub range: CellRange,
    pub old_value: Option<CellValue>,
    pub value: Option<CellValue>,
}

impl EditEvent {
    pub fn new(sheet: impl Into<String>, range: CellRange) -> Self {
        Self {
            sheet: sheet.into(),
            range,
            old_value: None,
            value: None,
        }
    }

    /// Build from strict A1 notation, e.g. `"B2:D3"`
    pub fn from_a1(sheet: impl Into<String>, range: &str) -> Result<Self, AddressError> {
        Ok(Self::new(sheet, CellRange::from_a1(range)?))
    }

    pub fn with_values(mut self, old_value: Option<CellValue>, value: Option<CellValue>) -> Self {
        self.old_value = old_value;
        self.value = value;
        self
    }
}

/// One cell of an edit, materialised before matching
#[derive(Debug, Clone, PartialEq)]
pub struct EditedCell {
    pub coord: CellCoord,
    pub address: String,
    pub value: CellValue,
}

/// State shared by every invocation one trigger gets for one event.
///
/// `cells` holds all cells the trigger matched, so a callback can act on the
/// whole batch; `shared` is scratch space for callbacks to coordinate.
#[derive(Debug, Default)]
pub struct EventParams {
    pub cells: Vec<EditedCell>,
    pub shared: HashMap<String, CellValue>,
}

impl EventParams {
    pub fn new(cells: Vec<EditedCell>) -> Self {
        Self {
            cells,
            shared: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.shared.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.shared.insert(key.into(), value.into());
    }

    /// Add `by` to a numeric counter, starting from zero
    pub fn bump(&mut self, key: &str, by: f64) -> f64 {
        let entry = self.shared.entry(key.to_string()).or_default();
        let total = entry.as_number().unwrap_or(0.0) + by;
        *entry = CellValue::Number(total);
        total
    }

    /// Whether `address` is the first matched cell of the batch
    pub fn is_first(&self, address: &str) -> bool {
        self.cells.first().is_some_and(|c| c.address == address)
    }

    /// Whether `address` is the last matched cell of the batch
    pub fn is_last(&self, address: &str) -> bool {
        self.cells.last().is_some_and(|c| c.address == address)
    }
}

/// Read/write access to one cell (and its sheet) during a callback
pub struct CellHandle<'a> {
    store: &'a mut dyn CellStore,
    sheet: &'a str,
    address: &'a str,
}

impl<'a> CellHandle<'a> {
    pub fn new(store: &'a mut dyn CellStore, sheet: &'a str, address: &'a str) -> Self {
        Self {
            store,
            sheet,
            address,
        }
    }

    pub fn sheet(&self) -> &str {
        self.sheet
    }

    pub fn address(&self) -> &str {
        self.address
    }

    /// Current value of this cell
    pub fn get(&self) -> Result<CellValue, StoreError> {
        self.store.read(self.sheet, self.address)
    }

    pub fn set(&mut self, value: impl Into<CellValue>) -> Result<(), StoreError> {
        self.store.write(self.sheet, self.address, value.into())
    }

    /// Read another cell on the same sheet
    pub fn read_at(&self, address: &str) -> Result<CellValue, StoreError> {
        self.store.read(self.sheet, address)
    }

    /// Write another cell on the same sheet
    pub fn write_at(&mut self, address: &str, value: impl Into<CellValue>) -> Result<(), StoreError> {
        self.store.write(self.sheet, address, value.into())
    }
}

/// Everything a trigger callback receives for one matched cell
pub struct TriggerCall<'a> {
    pub value: &'a CellValue,
    pub address: &'a str,
    pub coord: CellCoord,
    pub cell: CellHandle<'a>,
    pub params: &'a mut EventParams,
    pub event: &'a EditEvent,
}
