pub mod config;
pub mod headers;
pub mod memory;

use sheethook_core::CellValue;
use sheethook_dispatch::{DispatchReport, Dispatcher, EditEvent, SetupReport, StoreError};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
pub use crate::headers::HeaderMap;
pub use crate::memory::{MemorySheet, MemoryWorkbook};

/// Install the global `tracing` subscriber described by `config`
pub fn init_tracing(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.log_filter)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
}

/// A workbook and the dispatcher wired to its edits
#[derive(Debug)]
pub struct Host {
    pub workbook: MemoryWorkbook,
    pub dispatcher: Dispatcher,
    setup_done: bool,
}

impl Host {
    pub fn new(config: &Config) -> Self {
        Self {
            workbook: MemoryWorkbook::new(config.active_sheet.clone()),
            dispatcher: Dispatcher::with_options(config.dispatcher_options()),
            setup_done: false,
        }
    }

    /// Run trigger setup once. Later calls do nothing and return `None`
    /// until [`Host::reset_setup`] is called.
    pub fn setup(&mut self) -> Option<SetupReport> {
        if self.setup_done {
            tracing::info!("Trigger setup already ran");
            return None;
        }
        let report = self.dispatcher.run_setup(&mut self.workbook);
        self.setup_done = true;
        tracing::info!(
            "Ran setup for {} of {} triggers ({} failed)",
            report.ran,
            self.dispatcher.len(),
            report.failures.len()
        );
        Some(report)
    }

    /// Allow [`Host::setup`] to run again, e.g. after registering more triggers
    pub fn reset_setup(&mut self) {
        self.setup_done = false;
    }

    /// Apply a user edit to the workbook, then dispatch it
    pub fn edit(
        &mut self,
        sheet: &str,
        range: &str,
        values: Vec<CellValue>,
    ) -> Result<DispatchReport, StoreError> {
        let event = self.workbook.apply_edit(sheet, range, values)?;
        Ok(self.on_edit(&event))
    }

    /// Dispatch an edit that has already been applied
    pub fn on_edit(&mut self, event: &EditEvent) -> DispatchReport {
        self.dispatcher.dispatch(event, &mut self.workbook)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheethook_dispatch::{handler, setup_fn, CellStore};

    #[test]
    fn test_setup_runs_once() {
        let mut host = Host::new(&Config::default());
        host.dispatcher.register(
            "A1",
            None,
            handler(|_call| Ok(())),
            Some(setup_fn(|host| {
                let runs = host.read("Sheet1", "Z1")?.as_number().unwrap_or(0.0);
                host.write("Sheet1", "Z1", CellValue::Number(runs + 1.0))?;
                Ok(())
            })),
        );

        assert_eq!(host.setup().map(|r| r.ran), Some(1));
        assert!(host.setup().is_none());
        host.reset_setup();
        host.setup();

        assert_eq!(host.workbook.read("Sheet1", "Z1").unwrap(), CellValue::Number(2.0));
    }

    #[test]
    fn test_edit_dispatches() {
        let mut host = Host::new(&Config::default());
        host.dispatcher.register(
            "B:B",
            None,
            handler(|call| {
                let doubled = call.value.as_number().unwrap_or(0.0) * 2.0;
                call.cell.write_at(&format!("C{}", call.coord.row + 1), doubled)?;
                Ok(())
            }),
            None,
        );

        let report = host
            .edit("Sheet1", "B1:B2", vec![CellValue::Number(2.0), CellValue::Number(5.0)])
            .unwrap();
        assert_eq!(report.invocations, 2);
        assert_eq!(host.workbook.read("Sheet1", "C2").unwrap(), CellValue::Number(10.0));

        assert!(host.edit("Nope", "B1", vec![CellValue::Number(1.0)]).is_err());
    }
}
