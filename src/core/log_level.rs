//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record, ordered most severe first.
///
/// A threshold admits every level that compares less than or equal to it:
/// `Debug` admits everything, `Fatal` admits only `Fatal`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Fatal = 0,
    Error = 1,
    #[serde(alias = "warn")]
    Warning = 2,
    Info = 3,
    #[default]
    Debug = 4,
}

impl LogLevel {
    pub const COUNT: usize = 5;

    /// All levels, most severe first
    pub const ALL: [LogLevel; LogLevel::COUNT] = [
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warning,
        LogLevel::Info,
        LogLevel::Debug,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Three-letter tag that opens every rendered record
    pub fn code(&self) -> &'static str {
        match self {
            LogLevel::Fatal => "FTL",
            LogLevel::Error => "ERR",
            LogLevel::Warning => "WRN",
            LogLevel::Info => "INF",
            LogLevel::Debug => "DBG",
        }
    }

    /// Whether a record at `self` passes the given threshold
    #[inline]
    pub fn is_admitted_by(self, threshold: LogLevel) -> bool {
        self <= threshold
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "FATAL" | "FTL" => Ok(LogLevel::Fatal),
            "ERROR" | "ERR" => Ok(LogLevel::Error),
            "WARN" | "WARNING" | "WRN" => Ok(LogLevel::Warning),
            "INFO" | "INF" => Ok(LogLevel::Info),
            "DEBUG" | "DBG" => Ok(LogLevel::Debug),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}
