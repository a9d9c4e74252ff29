use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use sheethook_core::{range_matches, CellValue};

use crate::error::{CallbackFailure, RangeFailure, RegistrationError, SetupFailure};
use crate::event::{CellHandle, EditEvent, EditedCell, EventParams, TriggerCall};
use crate::host::{CellStore, NamedRanges, SheetHost};
use crate::target::TriggerTarget;
use crate::trigger::{
    CellTrigger, CheckboxTrigger, DropdownTrigger, Handler, Registration, SetupFn,
};

/// Dispatcher behaviour switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatcherOptions {
    /// Log every callback invocation and unmatched edit at `info`
    pub debug: bool,
    /// Turn panicking callbacks and setups into reported failures
    pub catch_panics: bool,
}

impl Default for DispatcherOptions {
    fn default() -> Self {
        Self {
            debug: false,
            catch_panics: true,
        }
    }
}

struct Trigger {
    range: String,
    sheet: Option<String>,
    callback: Handler,
    setup: Option<SetupFn>,
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("range", &self.range)
            .field("sheet", &self.sheet)
            .field("has_setup", &self.setup.is_some())
            .finish()
    }
}

/// Outcome of one [`Dispatcher::dispatch`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchReport {
    /// At least one trigger matched at least one cell
    pub triggered: bool,
    /// Triggers that matched at least one cell
    pub matched_triggers: usize,
    /// Callback invocations, failed ones included
    pub invocations: usize,
    pub failures: Vec<CallbackFailure>,
    pub invalid_ranges: Vec<RangeFailure>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.invalid_ranges.is_empty()
    }
}

/// Outcome of one [`Dispatcher::run_setup`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetupReport {
    /// Setup functions that were called, failed ones included
    pub ran: usize,
    pub failures: Vec<SetupFailure>,
}

/// Ordered, append-only list of triggers and the edit fan-out over them
#[derive(Debug, Default)]
pub struct Dispatcher {
    triggers: Vec<Trigger>,
    options: DispatcherOptions,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DispatcherOptions) -> Self {
        Self {
            triggers: Vec::new(),
            options,
        }
    }

    pub fn options(&self) -> DispatcherOptions {
        self.options
    }

    /// Append a trigger. The range is not validated here; a bad specifier
    /// only shows up as a reported failure when edits are matched.
    pub fn register(
        &mut self,
        range: impl Into<String>,
        sheet: Option<String>,
        callback: Handler,
        setup: Option<SetupFn>,
    ) {
        let range = range.into();
        tracing::trace!("Registered trigger #{} on {}", self.triggers.len(), range);
        self.triggers.push(Trigger {
            range,
            sheet,
            callback,
            setup,
        });
    }

    pub fn add_registration(&mut self, registration: Registration) {
        let Registration {
            target,
            callback,
            setup,
        } = registration;
        self.register(target.range, target.sheet, callback, setup);
    }

    pub fn add_cell_trigger(&mut self, trigger: CellTrigger) {
        self.add_registration(trigger.into_registration());
    }

    pub fn add_dropdown(&mut self, dropdown: DropdownTrigger) {
        self.add_registration(dropdown.into_registration());
    }

    pub fn add_checkbox(&mut self, checkbox: CheckboxTrigger) {
        self.add_registration(checkbox.into_registration());
    }

    /// Register a plain trigger on a named range, creating the name from
    /// `fallback` when the host does not know it yet
    pub fn add_named_trigger<F>(
        &mut self,
        names: &mut dyn NamedRanges,
        name: &str,
        fallback: Option<TriggerTarget>,
        callback: F,
    ) -> Result<(), RegistrationError>
    where
        F: FnMut(&mut TriggerCall<'_>) -> anyhow::Result<()> + 'static,
    {
        let target = TriggerTarget::named(names, name, fallback)?;
        self.add_cell_trigger(CellTrigger::new(target, callback));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Range specifiers in registration order
    pub fn ranges(&self) -> impl Iterator<Item = &str> {
        self.triggers.iter().map(|t| t.range.as_str())
    }

    /// Run every trigger's setup in registration order. A failing setup is
    /// logged and reported; later setups still run.
    pub fn run_setup(&mut self, host: &mut dyn SheetHost) -> SetupReport {
        let mut report = SetupReport::default();
        let catch_panics = self.options.catch_panics;

        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            let Some(setup) = trigger.setup.as_mut() else {
                continue;
            };
            report.ran += 1;

            if let Err(e) = guarded(catch_panics, || setup(&mut *host)) {
                let failure = SetupFailure {
                    trigger: index,
                    range: trigger.range.clone(),
                    message: format!("{:#}", e),
                };
                tracing::error!("{}", failure);
                report.failures.push(failure);
            }
        }

        report
    }

    /// Fan an edit out to every matching trigger, once per matched cell.
    pub fn dispatch(&mut self, event: &EditEvent, store: &mut dyn CellStore) -> DispatchReport {
        let debug = self.options.debug;
        let catch_panics = self.options.catch_panics;
        let mut report = DispatchReport::default();

        let edited = collect_cells(event, &*store);
        note(
            debug,
            format_args!(
                "Edit on {}!{} ({} cells), old value {:?}, value {:?}",
                event.sheet,
                event.range,
                edited.len(),
                event.old_value,
                event.value
            ),
        );

        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            if trigger.sheet.as_deref().is_some_and(|s| s != event.sheet) {
                continue;
            }

            let matched = match matching_cells(&trigger.range, &edited) {
                Ok(matched) => matched,
                Err(error) => {
                    let failure = RangeFailure {
                        trigger: index,
                        range: trigger.range.clone(),
                        error,
                    };
                    tracing::warn!("{}", failure);
                    report.invalid_ranges.push(failure);
                    continue;
                }
            };
            if matched.is_empty() {
                continue;
            }

            report.triggered = true;
            report.matched_triggers += 1;

            let mut params = EventParams::new(matched.clone());
            for cell in &matched {
                note(
                    debug,
                    format_args!(
                        "Callback for {} from {} ({})",
                        cell.address, trigger.range, cell.value
                    ),
                );

                let mut call = TriggerCall {
                    value: &cell.value,
                    address: &cell.address,
                    coord: cell.coord,
                    cell: CellHandle::new(&mut *store, &event.sheet, &cell.address),
                    params: &mut params,
                    event,
                };
                let callback = &mut trigger.callback;
                report.invocations += 1;

                if let Err(e) = guarded(catch_panics, || callback(&mut call)) {
                    let failure = CallbackFailure {
                        trigger: index,
                        range: trigger.range.clone(),
                        address: cell.address.clone(),
                        message: format!("{:#}", e),
                    };
                    tracing::error!("{}", failure);
                    report.failures.push(failure);
                }
            }
        }

        if !report.triggered {
            let ranges: Vec<&str> = self.ranges().collect();
            note(debug, format_args!("No rule matched from {:?}", ranges));
        }

        report
    }
}

/// Every cell of the edited rectangle with its current value
fn collect_cells(event: &EditEvent, store: &dyn CellStore) -> Vec<EditedCell> {
    event
        .range
        .iter()
        .map(|coord| {
            let address = coord.to_a1();
            let value = store.read(&event.sheet, &address).unwrap_or_else(|e| {
                tracing::warn!("Could not read {}!{}: {}", event.sheet, address, e);
                CellValue::Empty
            });
            EditedCell {
                coord,
                address,
                value,
            }
        })
        .collect()
}

fn matching_cells(
    range: &str,
    cells: &[EditedCell],
) -> Result<Vec<EditedCell>, sheethook_core::AddressError> {
    let mut matched = Vec::new();
    for cell in cells {
        if range_matches(range, &cell.address)? {
            matched.push(cell.clone());
        }
    }
    Ok(matched)
}

fn note(debug: bool, message: fmt::Arguments<'_>) {
    if debug {
        tracing::info!("{}", message);
    } else {
        tracing::debug!("{}", message);
    }
}

/// Run `f`, turning a panic into an error when `catch_panics` is set
fn guarded<F>(catch_panics: bool, f: F) -> anyhow::Result<()>
where
    F: FnOnce() -> anyhow::Result<()>,
{
    if !catch_panics {
        return f();
    }
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(anyhow::anyhow!("panicked: {}", panic_message(&*payload))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
