use std::env;

use sheethook_dispatch::DispatcherOptions;

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing` env-filter directive
    pub log_filter: String,
    /// Log every callback invocation at info level
    pub debug: bool,
    /// Report panicking callbacks instead of unwinding through dispatch
    pub catch_panics: bool,
    /// Name of the sheet a fresh workbook starts with
    pub active_sheet: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            debug: false,
            catch_panics: true,
            active_sheet: "Sheet1".to_string(),
        }
    }
}

impl Config {
    /// Load `.env` if present, then read the environment
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let log_filter = lookup("SHEETHOOK_LOG").unwrap_or(defaults.log_filter);
        let debug = flag(&lookup, "SHEETHOOK_DEBUG", defaults.debug)?;
        let catch_panics = flag(&lookup, "SHEETHOOK_CATCH_PANICS", defaults.catch_panics)?;
        let active_sheet = lookup("SHEETHOOK_ACTIVE_SHEET").unwrap_or(defaults.active_sheet);

        if active_sheet.trim().is_empty() {
            anyhow::bail!("SHEETHOOK_ACTIVE_SHEET cannot be empty");
        }

        Ok(Self {
            log_filter,
            debug,
            catch_panics,
            active_sheet,
        })
    }

    pub fn dispatcher_options(&self) -> DispatcherOptions {
        DispatcherOptions {
            debug: self.debug,
            catch_panics: self.catch_panics,
        }
    }
}

fn flag(lookup: impl Fn(&str) -> Option<String>, key: &str, default: bool) -> anyhow::Result<bool> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be a boolean, got {:?}", key, other),
    }
}
