//! # Rust Log Dispatcher
//!
//! A level-gated log dispatcher: records are rendered with timestamp, host
//! and caller metadata and fanned out to the sinks subscribed to their level.
//!
//! ## Features
//!
//! - **Per-level subscriptions**: every sink picks the levels it receives
//! - **Serialized delivery**: records never interleave at a sink
//! - **Batching Telegram sink**: buffered, timer-driven delivery with retry
//! - **Explicit instances**: no global logger, share one through `Arc`

pub mod config;
pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::config::LoggerConfig;
    pub use crate::core::{
        FlushMetrics, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, Sink,
    };
    pub use crate::sinks::ConsoleSink;
    #[cfg(feature = "telegram")]
    pub use crate::sinks::TelegramSink;
}

pub use config::LoggerConfig;
pub use core::{
    FlushMetrics, LogLevel, LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
    ProviderRegistry, Result, Sink, FATAL_EXIT_CODE,
};
pub use sinks::ConsoleSink;
#[cfg(feature = "telegram")]
pub use sinks::TelegramSink;
