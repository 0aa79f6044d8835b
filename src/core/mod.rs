//! Core dispatcher types and traits

pub mod error;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod registry;
pub mod sink;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder, FATAL_EXIT_CODE};
pub use metrics::{FlushMetrics, LoggerMetrics};
pub use registry::ProviderRegistry;
pub use sink::Sink;
