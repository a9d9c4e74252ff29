use std::collections::HashMap;

use sheethook_core::{
    parse_cell, CellCoord, CellRange, CellValue, DataValidationRule, RangeBounds, ValidationResult,
};
use sheethook_dispatch::{CellStore, EditEvent, NamedRanges, NamedRegion, SheetHost, StoreError};

/// A single sheet with sparse storage for cell values
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    /// Sheet name (displayed in tab)
    pub name: String,
    /// Only non-empty cells are stored
    cells: HashMap<CellCoord, CellValue>,
}

impl MemorySheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Get the value of a cell (returns Empty for non-existent cells)
    pub fn get(&self, coord: CellCoord) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(&coord).unwrap_or(&EMPTY)
    }

    /// Set a cell, removing it when the value is empty
    pub fn set(&mut self, coord: CellCoord, value: CellValue) {
        if value.is_empty() {
            self.cells.remove(&coord);
        } else {
            self.cells.insert(coord, value);
        }
    }

    /// Get the number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Workbook kept in memory: sheets, named ranges and validation rules
#[derive(Debug, Clone)]
pub struct MemoryWorkbook {
    sheets: Vec<MemorySheet>,
    active_sheet_index: usize,
    /// Keyed by lowercased name
    names: HashMap<String, NamedRegion>,
    validations: Vec<DataValidationRule>,
}

impl Default for MemoryWorkbook {
    fn default() -> Self {
        Self::new("Sheet1")
    }
}

impl MemoryWorkbook {
    /// Create a new workbook with one (active) sheet
    pub fn new(sheet: impl Into<String>) -> Self {
        Self {
            sheets: vec![MemorySheet::new(sheet)],
            active_sheet_index: 0,
            names: HashMap::new(),
            validations: Vec::new(),
        }
    }

    /// Add a new sheet with the given name
    pub fn add_sheet(&mut self, name: impl Into<String>) -> Result<usize, StoreError> {
        let name = name.into();

        if name.trim().is_empty() {
            return Err(StoreError::InvalidSheetName("Name cannot be empty".to_string()));
        }

        if self.sheets.iter().any(|s| s.name == name) {
            return Err(StoreError::SheetNameExists(name));
        }

        let index = self.sheets.len();
        self.sheets.push(MemorySheet::new(name));
        Ok(index)
    }

    /// Get a reference to the active sheet
    pub fn active_sheet(&self) -> &MemorySheet {
        &self.sheets[self.active_sheet_index]
    }

    /// Set the active sheet by name
    pub fn set_active_sheet(&mut self, name: &str) -> Result<(), StoreError> {
        let index = self
            .sheets
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))?;
        self.active_sheet_index = index;
        Ok(())
    }

    /// Get a sheet by name
    pub fn get_sheet_by_name(&self, name: &str) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    fn sheet(&self, name: &str) -> Result<&MemorySheet, StoreError> {
        self.get_sheet_by_name(name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }

    fn sheet_mut(&mut self, name: &str) -> Result<&mut MemorySheet, StoreError> {
        self.sheets
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| StoreError::SheetNotFound(name.to_string()))
    }

    /// Installed validation rules, in installation order
    pub fn validations(&self) -> &[DataValidationRule] {
        &self.validations
    }

    /// Check `value` against every rule covering `address`. A rule with a
    /// Stop alert rejects the value; other failures are only logged.
    fn check_validation(
        &self,
        sheet: &str,
        address: &str,
        value: &CellValue,
    ) -> Result<(), StoreError> {
        let active = self.active_sheet().name.as_str();
        for rule in &self.validations {
            let rule_sheet = rule.sheet.as_deref().unwrap_or(active);
            if rule_sheet != sheet {
                continue;
            }
            match rule.applies_to(sheet, address) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!("Skipping validation on {}: {}", rule.range, e);
                    continue;
                }
            }

            let result = rule.validate(value);
            if result.rejects() {
                let reason = rule.error_alert.message.clone().unwrap_or_else(|| {
                    match rule.dropdown_items() {
                        Some(items) => format!("Input must be one of {:?}", items),
                        None => "Input must be TRUE or FALSE".to_string(),
                    }
                });
                return Err(StoreError::Rejected {
                    address: address.to_string(),
                    reason,
                });
            }
            if let ValidationResult::Invalid(_) = result {
                tracing::warn!(
                    "{}!{} = {} fails validation on {}",
                    sheet,
                    address,
                    value,
                    rule.range
                );
            }
        }
        Ok(())
    }

    /// Apply a user edit and describe it as an [`EditEvent`].
    ///
    /// `values` fill `range` row by row; a single value fills every cell.
    /// The edit is all-or-nothing: if any value is rejected nothing is written.
    pub fn apply_edit(
        &mut self,
        sheet: &str,
        range: &str,
        values: Vec<CellValue>,
    ) -> Result<EditEvent, StoreError> {
        let range = CellRange::from_a1(range)?;
        let count = range.cell_count();
        let fill = values.len() == 1;
        if !fill && values.len() as u64 != count {
            return Err(StoreError::Rejected {
                address: range.to_a1(),
                reason: format!("expected {} values, got {}", count, values.len()),
            });
        }

        let writes: Vec<(CellCoord, CellValue)> = range
            .iter()
            .enumerate()
            .map(|(i, coord)| {
                let value = if fill { values[0].clone() } else { values[i].clone() };
                (coord, value)
            })
            .collect();

        for (coord, value) in &writes {
            self.check_validation(sheet, &coord.to_a1(), value)?;
        }

        let target = self.sheet_mut(sheet)?;
        let old_value = range
            .is_single_cell()
            .then(|| target.get(range.start).clone());
        for (coord, value) in writes {
            target.set(coord, value);
        }
        let new_value = range
            .is_single_cell()
            .then(|| target.get(range.start).clone());

        Ok(EditEvent::new(sheet, range).with_values(old_value, new_value))
    }
}

impl CellStore for MemoryWorkbook {
    fn read(&self, sheet: &str, address: &str) -> Result<CellValue, StoreError> {
        let coord = CellCoord::from_a1(address)?;
        Ok(self.sheet(sheet)?.get(coord).clone())
    }

    fn write(&mut self, sheet: &str, address: &str, value: CellValue) -> Result<(), StoreError> {
        let coord = CellCoord::from_a1(address)?;
        self.sheet_mut(sheet)?.set(coord, value);
        Ok(())
    }
}

impl NamedRanges for MemoryWorkbook {
    fn resolve_named_range(&self, name: &str) -> Option<NamedRegion> {
        self.names.get(&name.to_lowercase()).cloned()
    }

    fn define_named_range(
        &mut self,
        name: &str,
        sheet: Option<&str>,
        range: &str,
    ) -> Result<NamedRegion, StoreError> {
        if name.trim().is_empty() || name.contains(|c: char| c.is_whitespace() || c == '!') {
            return Err(StoreError::NamedRange(format!("invalid name {:?}", name)));
        }

        let sheet = match sheet {
            Some(sheet) => self.sheet(sheet)?.name.clone(),
            None => self.active_sheet().name.clone(),
        };
        // Either side of a band may be open, so only check that it parses
        if RangeBounds::parse(range)?.is_none() {
            parse_cell(range)?;
        }

        let region = NamedRegion {
            sheet,
            range: range.to_uppercase(),
        };
        self.names.insert(name.to_lowercase(), region.clone());
        Ok(region)
    }
}

impl SheetHost for MemoryWorkbook {
    fn set_validation(&mut self, rule: DataValidationRule) -> Result<(), StoreError> {
        if let Some(sheet) = rule.sheet.as_deref() {
            self.sheet(sheet)?;
        }
        self.validations
            .retain(|r| !(r.sheet == rule.sheet && r.range.eq_ignore_ascii_case(&rule.range)));
        self.validations.push(rule);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write() {
        let mut book = MemoryWorkbook::new("Sheet1");
        book.write("Sheet1", "b2", CellValue::from("x")).unwrap();
        assert_eq!(book.read("Sheet1", "B2").unwrap(), CellValue::from("x"));
        assert_eq!(book.read("Sheet1", "C9").unwrap(), CellValue::Empty);

        book.write("Sheet1", "B2", CellValue::Empty).unwrap();
        assert_eq!(book.active_sheet().cell_count(), 0);

        assert!(matches!(
            book.read("Nope", "A1"),
            Err(StoreError::SheetNotFound(_))
        ));
        assert!(matches!(book.read("Sheet1", "A:A"), Err(StoreError::Address(_))));
    }

    #[test]
    fn test_sheets() {
        let mut book = MemoryWorkbook::default();
        assert_eq!(book.add_sheet("Offers").unwrap(), 1);
        assert!(matches!(book.add_sheet("Offers"), Err(StoreError::SheetNameExists(_))));
        assert!(book.add_sheet("  ").is_err());

        book.set_active_sheet("Offers").unwrap();
        assert_eq!(book.active_sheet().name, "Offers");
        assert!(book.set_active_sheet("Missing").is_err());
    }

    #[test]
    fn test_apply_edit_single_cell() {
        let mut book = MemoryWorkbook::default();
        book.write("Sheet1", "A1", CellValue::from("old")).unwrap();

        let event = book
            .apply_edit("Sheet1", "A1", vec![CellValue::from("new")])
            .unwrap();
        assert_eq!(event.old_value, Some(CellValue::from("old")));
        assert_eq!(event.value, Some(CellValue::from("new")));
        assert_eq!(event.range.to_a1(), "A1");
    }

    #[test]
    fn test_apply_edit_block() {
        let mut book = MemoryWorkbook::default();
        let event = book
            .apply_edit(
                "Sheet1",
                "A1:B2",
                vec![
                    CellValue::Number(1.0),
                    CellValue::Number(2.0),
                    CellValue::Number(3.0),
                    CellValue::Number(4.0),
                ],
            )
            .unwrap();
        assert_eq!(event.value, None);
        assert_eq!(book.read("Sheet1", "B1").unwrap(), CellValue::Number(2.0));
        assert_eq!(book.read("Sheet1", "A2").unwrap(), CellValue::Number(3.0));

        book.apply_edit("Sheet1", "C1:C3", vec![true.into()]).unwrap();
        assert_eq!(book.read("Sheet1", "C3").unwrap(), CellValue::Boolean(true));

        assert!(book
            .apply_edit("Sheet1", "A1:B2", vec![CellValue::Empty, CellValue::Empty])
            .is_err());
    }

    #[test]
    fn test_validation_rejects_whole_edit() {
        let mut book = MemoryWorkbook::default();
        book.set_validation(DataValidationRule::list(None, "A2:A", ["Yes", "No"]))
            .unwrap();

        book.apply_edit("Sheet1", "A1", vec!["Header".into()]).unwrap();
        book.apply_edit("Sheet1", "A2", vec!["Yes".into()]).unwrap();

        let err = book
            .apply_edit("Sheet1", "A3:A4", vec!["No".into(), "Perhaps".into()])
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected { ref address, .. } if address == "A4"));
        assert_eq!(book.read("Sheet1", "A3").unwrap(), CellValue::Empty);
    }

    #[test]
    fn test_set_validation_replaces_same_range() {
        let mut book = MemoryWorkbook::default();
        book.set_validation(DataValidationRule::checkbox(None, "b2:b")).unwrap();
        book.set_validation(DataValidationRule::checkbox(None, "B2:B")).unwrap();
        assert_eq!(book.validations().len(), 1);
        assert!(book
            .set_validation(DataValidationRule::checkbox(Some("Nope".into()), "A1"))
            .is_err());
    }

    #[test]
    fn test_named_ranges() {
        let mut book = MemoryWorkbook::default();
        book.add_sheet("Offers").unwrap();

        let region = book.define_named_range("Action", Some("Offers"), "f2:f").unwrap();
        assert_eq!(region.range, "F2:F");
        assert_eq!(book.resolve_named_range("ACTION"), Some(region));

        let region = book.define_named_range("Total", None, "C10").unwrap();
        assert_eq!(region.sheet, "Sheet1");

        assert!(book.define_named_range("bad name", None, "A1").is_err());
        assert!(book.define_named_range("Zero", None, "A0").is_err());
        assert!(book.define_named_range("Lost", Some("Nope"), "A1").is_err());
    }
}
