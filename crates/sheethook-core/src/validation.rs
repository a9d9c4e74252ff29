use crate::error::Result;
use crate::matcher::range_matches;
use crate::CellValue;
use serde::{Deserialize, Serialize};

/// Validation criteria types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ValidationCriteria {
    /// Dropdown list of allowed values
    List { items: Vec<String> },

    /// Two-state checkbox holding TRUE or FALSE
    Checkbox,
}

/// Alert style when validation fails
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AlertStyle {
    /// Prevents invalid entry (default)
    #[default]
    Stop,
    /// Shows warning but allows entry
    Warning,
}

/// Error alert configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ValidationAlert {
    pub style: AlertStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationAlert),
}

impl ValidationResult {
    /// Whether the host should refuse the write
    pub fn rejects(&self) -> bool {
        matches!(
            self,
            ValidationResult::Invalid(ValidationAlert {
                style: AlertStyle::Stop,
                ..
            })
        )
    }
}

fn default_true() -> bool {
    true
}

/// A data validation rule installed over a range specifier.
///
/// `sheet: None` leaves the choice of sheet to the host (usually the active
/// one).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataValidationRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub range: String,
    pub criteria: ValidationCriteria,
    #[serde(default = "default_true")]
    pub allow_blank: bool,
    #[serde(default)]
    pub error_alert: ValidationAlert,
}

impl DataValidationRule {
    pub fn new(sheet: Option<String>, range: impl Into<String>, criteria: ValidationCriteria) -> Self {
        Self {
            sheet,
            range: range.into(),
            criteria,
            allow_blank: true,
            error_alert: ValidationAlert::default(),
        }
    }

    /// Dropdown rule over a fixed list of values
    pub fn list<I, S>(sheet: Option<String>, range: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(Into::into).collect();
        Self::new(sheet, range, ValidationCriteria::List { items })
    }

    pub fn checkbox(sheet: Option<String>, range: impl Into<String>) -> Self {
        Self::new(sheet, range, ValidationCriteria::Checkbox)
    }

    /// Check whether this rule covers `address` on `sheet`
    pub fn applies_to(&self, sheet: &str, address: &str) -> Result<bool> {
        if self.sheet.as_deref().is_some_and(|s| s != sheet) {
            return Ok(false);
        }
        range_matches(&self.range, address)
    }

    /// Validate a cell value against this rule
    pub fn validate(&self, value: &CellValue) -> ValidationResult {
        if value.is_empty() {
            return if self.allow_blank {
                ValidationResult::Valid
            } else {
                ValidationResult::Invalid(self.error_alert.clone())
            };
        }

        let is_valid = match &self.criteria {
            ValidationCriteria::List { items } => {
                let text = value.as_text();
                items.iter().any(|item| item == &text)
            }
            ValidationCriteria::Checkbox => matches!(value, CellValue::Boolean(_)),
        };

        if is_valid {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(self.error_alert.clone())
        }
    }

    /// Get dropdown items for List validation
    pub fn dropdown_items(&self) -> Option<&[String]> {
        match &self.criteria {
            ValidationCriteria::List { items } => Some(items),
            ValidationCriteria::Checkbox => None,
        }
    }
}
