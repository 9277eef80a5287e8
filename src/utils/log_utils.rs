//! Logging utilities for the storage helper and the demo driver

/// Log levels for controlling verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Normal execution, no verbose flag
    Normal = 0,
    /// Info level, one verbose flag (-v)
    Info = 1,
    /// Debug level, two verbose flags (-vv); request details and raw backend errors
    Debug = 2,
}

impl LogLevel {
    fn prefix(self) -> &'static str {
        match self {
            LogLevel::Normal => "",
            LogLevel::Info => "info: ",
            LogLevel::Debug => "dbg: ",
        }
    }
}

/// Logger for application messages
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    verbosity: u8,
}

impl Logger {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity }
    }

    /// Log a message if the current verbosity level is at least the specified level
    pub fn log(&self, msg: &str, level: LogLevel) {
        log(msg, self.verbosity, level);
    }

    /// Always displayed
    pub fn normal(&self, msg: &str) {
        self.log(msg, LogLevel::Normal);
    }

    pub fn info(&self, msg: &str) {
        self.log(msg, LogLevel::Info);
    }

    pub fn debug(&self, msg: &str) {
        self.log(msg, LogLevel::Debug);
    }

    /// Warnings go to stderr regardless of verbosity
    pub fn warn(&self, msg: &str) {
        warn(msg);
    }

    pub fn verbosity(&self) -> u8 {
        self.verbosity
    }

    /// True when messages at `level` would be printed
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.verbosity >= level as u8
    }
}

// Module-level functions for callers that only carry a verbosity number

/// Log a message if the verbosity level is at least the specified level
///
/// # Arguments
///
/// * `msg` - The message to log
/// * `verbosity` - The current verbosity level (0 = normal, 1 = info, 2+ = debug)
/// * `level` - The minimum level required for this message to be logged
pub fn log(msg: &str, verbosity: u8, level: LogLevel) {
    if verbosity >= level as u8 {
        println!("{}{}", level.prefix(), msg);
    }
}

/// Log at info level (verbose >= 1)
pub fn info(msg: &str, verbosity: u8) {
    log(msg, verbosity, LogLevel::Info)
}

/// Log at debug level (verbose >= 2)
pub fn debug(msg: &str, verbosity: u8) {
    log(msg, verbosity, LogLevel::Debug)
}

pub fn warn(msg: &str) {
    eprintln!("warn: {}", msg);
}
