#![forbid(unsafe_code)]

//! Console configuration.
//!
//! Read once when a [`DevConsole`](crate::DevConsole) is built. Values can
//! come from code (builder setters) or from the environment:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `FTUI_CONSOLE_HISTORY_LINES` | `history_lines` | 8 |
//! | `FTUI_CONSOLE_PROMPT_FLASH` | `prompt_flash` | true |
//! | `FTUI_CONSOLE_SLIDE_STEP` | `slide_step` | 2 |
//! | `FTUI_CONSOLE_FLASH_PERIOD` | `flash_period_ticks` | 16 |
//!
//! Unparseable variables keep the default and are reported as
//! [`ConsoleConfigError`] diagnostics rather than failing.

use std::env;
use std::fmt;

use crate::animator::DEFAULT_SLIDE_STEP;

const ENV_HISTORY_LINES: &str = "FTUI_CONSOLE_HISTORY_LINES";
const ENV_PROMPT_FLASH: &str = "FTUI_CONSOLE_PROMPT_FLASH";
const ENV_SLIDE_STEP: &str = "FTUI_CONSOLE_SLIDE_STEP";
const ENV_FLASH_PERIOD: &str = "FTUI_CONSOLE_FLASH_PERIOD";

/// Console settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Number of commands the history remembers.
    pub history_lines: usize,
    /// Whether the caret blinks.
    pub prompt_flash: bool,
    /// Rows the console slides per tick.
    pub slide_step: i32,
    /// Flash ticks between caret visibility flips.
    pub flash_period_ticks: u32,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            history_lines: 8,
            prompt_flash: true,
            slide_step: DEFAULT_SLIDE_STEP,
            flash_period_ticks: 16,
        }
    }
}

/// Result of reading the config from the environment.
#[derive(Debug, Clone)]
pub struct ConsoleConfigParse {
    pub config: ConsoleConfig,
    pub errors: Vec<ConsoleConfigError>,
}

/// A rejected config value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConsoleConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConsoleConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={} ({})", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConsoleConfigError {}

impl ConsoleConfig {
    /// Set the history size (builder).
    #[must_use]
    pub fn with_history_lines(mut self, lines: usize) -> Self {
        self.history_lines = lines;
        self
    }

    /// Enable or disable the caret blink (builder).
    #[must_use]
    pub fn with_prompt_flash(mut self, enabled: bool) -> Self {
        self.prompt_flash = enabled;
        self
    }

    /// Set the rows moved per slide tick (builder).
    #[must_use]
    pub fn with_slide_step(mut self, step: i32) -> Self {
        self.slide_step = step;
        self
    }

    /// Set the caret blink period in flash ticks (builder).
    #[must_use]
    pub fn with_flash_period_ticks(mut self, ticks: u32) -> Self {
        self.flash_period_ticks = ticks;
        self
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConsoleConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    /// Check value constraints, returning every violation.
    pub fn validate(&self) -> Result<(), Vec<ConsoleConfigError>> {
        let mut errors = Vec::new();
        if self.history_lines == 0 {
            errors.push(ConsoleConfigError::new(
                "history_lines",
                "0",
                "must be >= 1",
            ));
        }
        if self.slide_step < 1 {
            errors.push(ConsoleConfigError::new(
                "slide_step",
                self.slide_step.to_string(),
                "must be >= 1",
            ));
        }
        if self.flash_period_ticks == 0 {
            errors.push(ConsoleConfigError::new(
                "flash_period_ticks",
                "0",
                "must be >= 1",
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Raise every out-of-range value to its minimum of 1.
    #[must_use]
    pub fn clamped(mut self) -> Self {
        self.history_lines = self.history_lines.max(1);
        self.slide_step = self.slide_step.max(1);
        self.flash_period_ticks = self.flash_period_ticks.max(1);
        self
    }
}

/// Parse config through an arbitrary variable lookup.
pub fn from_env_with<F>(mut get: F) -> ConsoleConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = ConsoleConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_HISTORY_LINES) {
        match parse_usize(&value) {
            Some(parsed) if parsed > 0 => config.history_lines = parsed,
            _ => errors.push(ConsoleConfigError::new(
                "history_lines",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_PROMPT_FLASH) {
        match parse_bool(&value) {
            Some(parsed) => config.prompt_flash = parsed,
            None => errors.push(ConsoleConfigError::new(
                "prompt_flash",
                value,
                "expected bool (1/0/true/false)",
            )),
        }
    }

    if let Some(value) = get(ENV_SLIDE_STEP) {
        match value.trim().parse::<i32>() {
            Ok(parsed) if parsed > 0 => config.slide_step = parsed,
            _ => errors.push(ConsoleConfigError::new(
                "slide_step",
                value,
                "expected positive integer",
            )),
        }
    }

    if let Some(value) = get(ENV_FLASH_PERIOD) {
        match value.trim().parse::<u32>() {
            Ok(parsed) if parsed > 0 => config.flash_period_ticks = parsed,
            _ => errors.push(ConsoleConfigError::new(
                "flash_period_ticks",
                value,
                "expected positive integer",
            )),
        }
    }

    ConsoleConfigParse { config, errors }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[inline]
fn parse_usize(value: &str) -> Option<usize> {
    value.trim().parse::<usize>().ok()
}
