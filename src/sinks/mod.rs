//! Sink implementations

pub mod console;

#[cfg(feature = "telegram")]
pub mod telegram;
#[cfg(feature = "telegram")]
pub mod transport;

pub use console::{ConsoleSink, CONSOLE_SINK_ID};

#[cfg(feature = "telegram")]
pub use telegram::{TelegramSink, DEFAULT_FLUSH_INTERVAL, TELEGRAM_SINK_ID};
#[cfg(feature = "telegram")]
pub use transport::{ChatMessage, ChatTransport, Endpoint, HttpTransport, ProxyKind, ProxySettings};

pub use crate::core::Sink;
