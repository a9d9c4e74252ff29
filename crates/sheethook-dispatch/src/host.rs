//! Collaborator traits implemented by whatever owns the actual cells.

use sheethook_core::{CellValue, DataValidationRule};

use crate::error::StoreError;

/// Cell values addressed by sheet name and A1 string
pub trait CellStore {
    fn read(&self, sheet: &str, address: &str) -> Result<CellValue, StoreError>;

    fn write(&mut self, sheet: &str, address: &str, value: CellValue) -> Result<(), StoreError>;
}

/// Where a named range points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRegion {
    pub sheet: String,
    pub range: String,
}

/// Name-to-range lookup. Names are resolved before a trigger is registered,
/// so the dispatcher itself never sees them.
pub trait NamedRanges {
    fn resolve_named_range(&self, name: &str) -> Option<NamedRegion>;

    /// Define `name` over `range`. With no sheet, the host picks one (usually
    /// the active sheet) and reports it in the returned region.
    fn define_named_range(
        &mut self,
        name: &str,
        sheet: Option<&str>,
        range: &str,
    ) -> Result<NamedRegion, StoreError>;
}

/// Everything a trigger setup function may touch
pub trait SheetHost: CellStore + NamedRanges {
    /// Install a data validation rule (dropdown list, checkbox)
    fn set_validation(&mut self, rule: DataValidationRule) -> Result<(), StoreError>;
}
