//! Logger configuration loaded from JSON
//!
//! ```json
//! {
//!   "threshold": "info",
//!   "prefix": "billing",
//!   "console": { "levels": ["fatal", "error", "warning", "info"] },
//!   "telegram": {
//!     "connection": "<bot-token>|socks5://10.0.0.1:1080",
//!     "chat_ids": ["123456"],
//!     "levels": ["fatal", "error"]
//!   }
//! }
//! ```

use crate::core::{LogLevel, Logger, LoggerBuilder, LoggerError, Result};
use crate::sinks::ConsoleSink;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(default)]
    pub threshold: LogLevel,

    /// Missing: the executable name. Empty string: no prefix at all.
    #[serde(default)]
    pub prefix: Option<String>,

    #[serde(default)]
    pub console: Option<ConsoleConfig>,

    #[cfg(feature = "telegram")]
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    #[serde(default = "all_levels")]
    pub levels: Vec<LogLevel>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            levels: all_levels(),
        }
    }
}

#[cfg(feature = "telegram")]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    pub connection: String,
    pub chat_ids: Vec<String>,
    #[serde(default = "alert_levels")]
    pub levels: Vec<LogLevel>,
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
}

fn all_levels() -> Vec<LogLevel> {
    LogLevel::ALL.to_vec()
}

#[cfg(feature = "telegram")]
fn alert_levels() -> Vec<LogLevel> {
    vec![LogLevel::Fatal, LogLevel::Error]
}

#[cfg(feature = "telegram")]
fn default_flush_interval_ms() -> u64 {
    crate::sinks::DEFAULT_FLUSH_INTERVAL.as_millis() as u64
}

impl LoggerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Construct the configured sinks and a logger subscribed to them.
    ///
    /// # Errors
    ///
    /// Any sink configuration error (empty connection string, empty chat
    /// list, bad proxy scheme) is returned before a logger exists.
    pub fn build(&self) -> Result<Logger> {
        let mut builder = Logger::builder().threshold(self.threshold);
        builder = match self.prefix.as_deref() {
            None => builder,
            Some("") => builder.no_prefix(),
            Some(prefix) => builder.prefix(prefix),
        };

        if let Some(console) = &self.console {
            if console.levels.is_empty() {
                return Err(LoggerError::config("console", "No levels subscribed"));
            }
            builder = builder
                .sink(Arc::new(ConsoleSink::new()))
                .subscribe(crate::sinks::CONSOLE_SINK_ID, &console.levels);
        }

        builder = self.attach_telegram(builder)?;

        builder.build()
    }

    #[cfg(feature = "telegram")]
    fn attach_telegram(&self, builder: LoggerBuilder) -> Result<LoggerBuilder> {
        let Some(telegram) = &self.telegram else {
            return Ok(builder);
        };

        let sink = crate::sinks::TelegramSink::with_flush_interval(
            &telegram.connection,
            telegram.chat_ids.clone(),
            std::time::Duration::from_millis(telegram.flush_interval_ms.max(1)),
        )?;
        Ok(builder
            .sink(Arc::new(sink))
            .subscribe(crate::sinks::TELEGRAM_SINK_ID, &telegram.levels))
    }

    #[cfg(not(feature = "telegram"))]
    fn attach_telegram(&self, builder: LoggerBuilder) -> Result<LoggerBuilder> {
        Ok(builder)
    }
}
