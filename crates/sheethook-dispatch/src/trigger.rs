//! Trigger configurations.
//!
//! Three kinds share one base: a plain cell trigger, a dropdown that routes a
//! fixed set of values to sub-callbacks, and a checkbox that routes TRUE and
//! FALSE. Dropdowns and checkboxes are built entirely out of a plain
//! registration; they add no matching logic of their own.

use sheethook_core::DataValidationRule;

use crate::event::TriggerCall;
use crate::host::SheetHost;
use crate::target::TriggerTarget;

/// A trigger callback, invoked once per matched cell
pub type Handler = Box<dyn FnMut(&mut TriggerCall<'_>) -> anyhow::Result<()>>;

/// Prepares the host for a trigger (validation rules, initial values)
pub type SetupFn = Box<dyn FnMut(&mut dyn SheetHost) -> anyhow::Result<()>>;

/// Box a closure as a [`Handler`]
pub fn handler<F>(f: F) -> Handler
where
    F: FnMut(&mut TriggerCall<'_>) -> anyhow::Result<()> + 'static,
{
    Box::new(f)
}

/// Box a closure as a [`SetupFn`]
pub fn setup_fn<F>(f: F) -> SetupFn
where
    F: FnMut(&mut dyn SheetHost) -> anyhow::Result<()> + 'static,
{
    Box::new(f)
}

/// Options every trigger kind carries
pub struct TriggerBase {
    pub target: TriggerTarget,
    pub setup: Option<SetupFn>,
}

impl TriggerBase {
    pub fn new(target: TriggerTarget) -> Self {
        Self {
            target,
            setup: None,
        }
    }
}

/// What the dispatcher stores for one registration
pub struct Registration {
    pub target: TriggerTarget,
    pub callback: Handler,
    pub setup: Option<SetupFn>,
}

/// A trigger that hands every matched cell to one callback
pub struct CellTrigger {
    pub base: TriggerBase,
    pub callback: Handler,
}

impl CellTrigger {
    pub fn new<F>(target: TriggerTarget, callback: F) -> Self
    where
        F: FnMut(&mut TriggerCall<'_>) -> anyhow::Result<()> + 'static,
    {
        Self {
            base: TriggerBase::new(target),
            callback: handler(callback),
        }
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnMut(&mut dyn SheetHost) -> anyhow::Result<()> + 'static,
    {
        self.base.setup = Some(setup_fn(setup));
        self
    }

    pub fn into_registration(self) -> Registration {
        Registration {
            target: self.base.target,
            callback: self.callback,
            setup: self.base.setup,
        }
    }
}

/// A dropdown over a fixed list of values.
///
/// Selecting a value that has a callback runs it; other values (including
/// ones outside `values`) are ignored.
pub struct DropdownTrigger {
    pub base: TriggerBase,
    pub values: Vec<String>,
    pub callbacks: Vec<(String, Handler)>,
}

impl DropdownTrigger {
    pub fn new<I, S>(target: TriggerTarget, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base: TriggerBase::new(target),
            values: values.into_iter().map(Into::into).collect(),
            callbacks: Vec::new(),
        }
    }

    /// Run `callback` when `value` is selected
    pub fn on<F>(mut self, value: impl Into<String>, callback: F) -> Self
    where
        F: FnMut(&mut TriggerCall<'_>) -> anyhow::Result<()> + 'static,
    {
        self.callbacks.push((value.into(), handler(callback)));
        self
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnMut(&mut dyn SheetHost) -> anyhow::Result<()> + 'static,
    {
        self.base.setup = Some(setup_fn(setup));
        self
    }

    pub fn into_registration(self) -> Registration {
        let DropdownTrigger {
            base,
            values,
            mut callbacks,
        } = self;

        let callback = handler(move |call| {
            let selected = call.value.as_text();
            match callbacks.iter_mut().find(|(value, _)| *value == selected) {
                Some((_, callback)) => {
                    tracing::debug!("Dropdown callback: {}", selected);
                    callback(call)
                }
                None => Ok(()),
            }
        });

        let rule = DataValidationRule::list(
            base.target.sheet.clone(),
            base.target.range.clone(),
            values,
        );
        Registration {
            target: base.target,
            callback,
            setup: Some(with_validation(base.setup, rule)),
        }
    }
}

/// A TRUE/FALSE checkbox; either side may be left without a callback
pub struct CheckboxTrigger {
    pub base: TriggerBase,
    pub on_true: Option<Handler>,
    pub on_false: Option<Handler>,
}

impl CheckboxTrigger {
    pub fn new(target: TriggerTarget) -> Self {
        Self {
            base: TriggerBase::new(target),
            on_true: None,
            on_false: None,
        }
    }

    pub fn on_true<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut TriggerCall<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_true = Some(handler(callback));
        self
    }

    pub fn on_false<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut TriggerCall<'_>) -> anyhow::Result<()> + 'static,
    {
        self.on_false = Some(handler(callback));
        self
    }

    pub fn with_setup<F>(mut self, setup: F) -> Self
    where
        F: FnMut(&mut dyn SheetHost) -> anyhow::Result<()> + 'static,
    {
        self.base.setup = Some(setup_fn(setup));
        self
    }

    pub fn into_registration(self) -> Registration {
        let CheckboxTrigger {
            base,
            mut on_true,
            mut on_false,
        } = self;

        let callback = handler(move |call| {
            let side = if call.value.is_truthy() {
                on_true.as_mut()
            } else {
                on_false.as_mut()
            };
            match side {
                Some(callback) => callback(call),
                None => Ok(()),
            }
        });

        let rule =
            DataValidationRule::checkbox(base.target.sheet.clone(), base.target.range.clone());
        Registration {
            target: base.target,
            callback,
            setup: Some(with_validation(base.setup, rule)),
        }
    }
}

/// Run the user's setup first, then install `rule`
fn with_validation(mut setup: Option<SetupFn>, rule: DataValidationRule) -> SetupFn {
    setup_fn(move |host| {
        if let Some(setup) = setup.as_mut() {
            setup(&mut *host)?;
        }
        host.set_validation(rule.clone())?;
        Ok(())
    })
}
