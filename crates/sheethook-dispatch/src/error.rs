use sheethook_core::AddressError;
use thiserror::Error;

/// Errors raised by a host collaborator (cell store, named ranges, validation)
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    #[error("Invalid sheet name: {0}")]
    InvalidSheetName(String),

    #[error("Sheet name already exists: {0}")]
    SheetNameExists(String),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("Value rejected at {address}: {reason}")]
    Rejected { address: String, reason: String },

    #[error("Named range error: {0}")]
    NamedRange(String),
}

/// Errors raised while turning trigger options into a registration
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Named range {0} does not exist, and no range was provided to create it")]
    UnknownNamedRange(String),

    #[error("Unable to create named range {name}: {source}")]
    CreateNamedRange {
        name: String,
        #[source]
        source: StoreError,
    },
}

/// A trigger callback that returned an error or panicked during dispatch
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Callback for {address} from trigger #{trigger} ({range}) failed: {message}")]
pub struct CallbackFailure {
    /// Registration index of the trigger
    pub trigger: usize,
    pub range: String,
    pub address: String,
    pub message: String,
}

/// A trigger setup function that returned an error or panicked
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Setup for trigger #{trigger} ({range}) failed: {message}")]
pub struct SetupFailure {
    pub trigger: usize,
    pub range: String,
    pub message: String,
}

/// A trigger whose range specifier could not be parsed while matching
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Trigger #{trigger} has an unusable range {range}: {error}")]
pub struct RangeFailure {
    pub trigger: usize,
    pub range: String,
    #[source]
    pub error: AddressError,
}
