//! Progress and error output
//!
//! Both the single-file optimizer and the batch runner write their
//! human-readable output through a [`Reporter`] handed to them by the caller.
//! [`ConsoleReporter`] prints to stdout; [`CaptureReporter`] keeps the lines
//! in memory so tests can assert on them.

use crate::constants::{ERROR_PREFIX, VERBOSE_PREFIX, WARNING_PREFIX};
use std::fmt;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Verbose,
    Info,
    Warn,
    Error,
}

pub trait Reporter: Send + Sync {
    fn report(&self, level: Level, message: fmt::Arguments<'_>);

    /// Whether a progress bar should be drawn for batch runs.
    fn shows_progress(&self) -> bool {
        false
    }
}

/// Prints every message to stdout. Errors are never suppressed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    fn enabled(&self, level: Level) -> bool {
        match level {
            Level::Verbose => self.is_verbose(),
            Level::Info | Level::Warn => !self.quiet,
            Level::Error => true,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        match level {
            Level::Verbose => println!("{} {}", VERBOSE_PREFIX, message),
            Level::Info => println!("{}", message),
            Level::Warn => println!("{} {}", WARNING_PREFIX, message),
            Level::Error => println!("{} {}", ERROR_PREFIX, message),
        }
    }

    fn shows_progress(&self) -> bool {
        !self.quiet
    }
}

/// Collects messages instead of printing them.
#[derive(Debug, Default)]
pub struct CaptureReporter {
    lines: Mutex<Vec<(Level, String)>>,
}

impl CaptureReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Level, String)> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, message)| message.contains(needle))
    }
}

impl Reporter for CaptureReporter {
    fn report(&self, level: Level, message: fmt::Arguments<'_>) {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((level, message.to_string()));
    }
}

#[macro_export]
macro_rules! info {
    ($reporter:expr, $($arg:tt)*) => {
        $crate::reporter::Reporter::report(
            &*$reporter,
            $crate::reporter::Level::Info,
            format_args!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! verbose {
    ($reporter:expr, $($arg:tt)*) => {
        $crate::reporter::Reporter::report(
            &*$reporter,
            $crate::reporter::Level::Verbose,
            format_args!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! warn {
    ($reporter:expr, $($arg:tt)*) => {
        $crate::reporter::Reporter::report(
            &*$reporter,
            $crate::reporter::Level::Warn,
            format_args!($($arg)*),
        )
    };
}

#[macro_export]
macro_rules! error {
    ($reporter:expr, $($arg:tt)*) => {
        $crate::reporter::Reporter::report(
            &*$reporter,
            $crate::reporter::Level::Error,
            format_args!($($arg)*),
        )
    };
}
