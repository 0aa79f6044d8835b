//! Error types for the log dispatcher

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// HTTP client error (transport, timeout, TLS)
    #[cfg(feature = "telegram")]
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Subscription to a sink id that was never registered
    #[error("Unknown sink id '{id}': register the sink before subscribing it")]
    UnknownSink { id: String },

    /// Remote delivery rejected for one recipient
    #[error("Failed to deliver batch to '{recipient}': {message}")]
    DeliveryError { recipient: String, message: String },

    /// Failure reported by a custom sink
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create an unknown sink error
    pub fn unknown_sink(id: impl Into<String>) -> Self {
        LoggerError::UnknownSink { id: id.into() }
    }

    /// Create a delivery error for a single recipient
    pub fn delivery(recipient: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::DeliveryError {
            recipient: recipient.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Whether this error stems from configuration rather than runtime I/O
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggerError::InvalidConfiguration { .. } | LoggerError::UnknownSink { .. }
        )
    }
}
