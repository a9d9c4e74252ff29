pub mod dispatcher;
pub mod error;
pub mod event;
pub mod host;
pub mod target;
pub mod trigger;

pub use dispatcher::{DispatchReport, Dispatcher, DispatcherOptions, SetupReport};
pub use error::{CallbackFailure, RangeFailure, RegistrationError, SetupFailure, StoreError};
pub use event::{CellHandle, EditEvent, EditedCell, EventParams, TriggerCall};
pub use host::{CellStore, NamedRanges, NamedRegion, SheetHost};
pub use target::TriggerTarget;
pub use trigger::{
    handler, setup_fn, CellTrigger, CheckboxTrigger, DropdownTrigger, Handler, Registration,
    SetupFn, TriggerBase,
};
