use thiserror::Error;

/// Errors raised while parsing A1 addresses and range specifiers.
///
/// All variants are "invalid address" failures; the variant only says which
/// part of the text was at fault.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The address does not have the expected A1 shape
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Column letters contain something outside A-Z, or overflow
    #[error("Invalid column string: {0}")]
    InvalidColumn(String),

    /// Row number is zero or too large
    #[error("Invalid row: {0}")]
    InvalidRow(String),

    /// Rectangle with zero width/height or a malformed side
    #[error("Invalid range: {0}")]
    InvalidRange(String),
}

impl AddressError {
    /// The text that failed to parse
    pub fn input(&self) -> &str {
        match self {
            AddressError::InvalidAddress(s)
            | AddressError::InvalidColumn(s)
            | AddressError::InvalidRow(s)
            | AddressError::InvalidRange(s) => s,
        }
    }
}

pub type Result<T> = std::result::Result<T, AddressError>;
