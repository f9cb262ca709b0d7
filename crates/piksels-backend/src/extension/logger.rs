//! Logger extension.
//!
//! Backends log through the [`LoggerExt`] they were built with, using the
//! [`log!`](crate::log) family of macros. The default logger, [`LogFacade`],
//! forwards entries to the `log` crate so that backend logs end up next to
//! everything else.

use std::fmt;

/// Something able to consume log entries.
pub trait Logger: Send + Sync {
    fn log(&self, entry: LogEntry);
}

impl<F> Logger for F
where
    F: Fn(LogEntry) + Send + Sync,
{
    fn log(&self, entry: LogEntry) {
        self(entry)
    }
}

/// A logger along with its level filter.
pub struct LoggerExt<L> {
    /// Only entries with a level less than or equal to this one are logged.
    level_filter: LogLevel,
    logger: L,
}

impl<L> fmt::Debug for LoggerExt<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerExt")
            .field("level_filter", &self.level_filter)
            .finish_non_exhaustive()
    }
}

impl<L> LoggerExt<L>
where
    L: Logger,
{
    pub fn new(level_filter: LogLevel, logger: L) -> Self {
        Self {
            level_filter,
            logger,
        }
    }

    pub fn set_level_filter(&mut self, level_filter: LogLevel) {
        self.level_filter = level_filter;
    }

    #[must_use]
    pub fn level_filter(&self) -> LogLevel {
        self.level_filter
    }

    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level <= self.level_filter
    }

    /// Logs the entry if its level passes the filter.
    pub fn log(&self, entry: LogEntry) {
        if self.enabled(entry.level) {
            self.logger.log(entry);
        }
    }
}

impl<L> Logger for LoggerExt<L>
where
    L: Logger,
{
    fn log(&self, entry: LogEntry) {
        LoggerExt::log(self, entry);
    }
}

/// Backends that can log. Used by the [`log!`](crate::log) macros.
pub trait BackendLogger {
    fn log(&self, entry: LogEntry);
}

/// Ordered from least to most verbose.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
    pub module: &'static str,
    pub msg: String,
}

/// Forwards entries to whatever logger is installed for the `log` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFacade;

impl Logger for LogFacade {
    fn log(&self, entry: LogEntry) {
        let level = log::Level::from(entry.level);

        if level > log::max_level() {
            return;
        }

        log::logger().log(
            &log::Record::builder()
                .level(level)
                .target(entry.module)
                .module_path_static(Some(entry.module))
                .file_static(Some(entry.file))
                .line(Some(entry.line))
                .args(format_args!("{}", entry.msg))
                .build(),
        );
    }
}

#[macro_export]
macro_rules! log {
    ($backend:expr, $lvl:ident, $($msg:tt)*) => {{
        use $crate::extension::logger::BackendLogger as _;

        $backend.log($crate::extension::logger::LogEntry {
            level: $crate::extension::logger::LogLevel::$lvl,
            file: file!(),
            line: line!(),
            column: column!(),
            module: module_path!(),
            msg: format!($($msg)*),
        })
    }};
}

#[macro_export]
macro_rules! trace {
    ($backend:expr, $($msg:tt)*) => {
        $crate::log!($backend, Trace, $($msg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($backend:expr, $($msg:tt)*) => {
        $crate::log!($backend, Debug, $($msg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($backend:expr, $($msg:tt)*) => {
        $crate::log!($backend, Info, $($msg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($backend:expr, $($msg:tt)*) => {
        $crate::log!($backend, Warn, $($msg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($backend:expr, $($msg:tt)*) => {
        $crate::log!($backend, Error, $($msg)*)
    };
}
