//! Sink trait for log output destinations

use super::error::Result;

/// An output destination that accepts rendered records as raw bytes.
///
/// Sinks are shared (`Arc<dyn Sink>`) between the registry and possibly
/// several loggers, so every method takes `&self`; implementations keep
/// their own interior locking.
pub trait Sink: Send + Sync {
    /// Stable identifier used for registration and subscription
    fn id(&self) -> &str;

    /// Accept one rendered record, returning the number of bytes taken
    fn write(&self, data: &[u8]) -> Result<usize>;

    /// Push out anything the sink holds back
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
