pub mod cell;
pub mod error;
pub mod matcher;
pub mod range;
pub mod validation;

pub use cell::CellValue;
pub use error::AddressError;
pub use matcher::{range_matches, RangeBounds};
pub use range::{col_from_label, col_to_label, parse_cell, CellCoord, CellRange, PartialCoord};
pub use validation::{
    AlertStyle, DataValidationRule, ValidationAlert, ValidationCriteria, ValidationResult,
};
