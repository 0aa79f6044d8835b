//! Batching Telegram sink
//!
//! Writes never touch the network: each one is framed with a UTC timestamp
//! header and appended to an in-memory buffer. A background flusher wakes
//! once per interval and posts the whole buffer to every configured chat.
//!
//! # Delivery guarantees
//!
//! The buffer is cleared only after every chat accepted the text. If any
//! chat fails, the cycle stops and the buffer is kept as is, so the next
//! cycle resends everything (plus whatever was written in between). Chats
//! that already succeeded in the failed cycle therefore see the same text
//! again: delivery is at-least-once per chat, not exactly-once.
//!
//! Nothing is ever dropped either. A permanent failure (the bot was blocked
//! by a chat, or the batch outgrew the API's message length limit) makes
//! every later cycle fail the same way while the buffer keeps growing
//! without bound.

use super::transport::{ChatMessage, ChatTransport, Endpoint, HttpTransport};
use crate::core::{timestamp, FlushMetrics, LoggerError, Result, Sink};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub const TELEGRAM_SINK_ID: &str = "telegram";

/// Interval between flush cycles
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

const FRAME_PREFIX: &[u8] = b"=== ";
const FRAME_SUFFIX: &[u8] = b" ===\n";

/// Sink that batches records and ships them to Telegram chats
///
/// # Example
///
/// ```no_run
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let sink = TelegramSink::new("<bot-token>", vec!["123456".to_string()])
///     .expect("valid telegram configuration");
///
/// let logger = Logger::new();
/// logger.register_sink(Arc::new(sink));
/// logger.subscribe("telegram", &[LogLevel::Fatal, LogLevel::Error]);
/// logger.error("payment backend unreachable");
/// ```
pub struct TelegramSink {
    id: String,
    batch: Arc<Batch>,
    flusher: Mutex<Option<Flusher>>,
}

/// State shared between writers and the flusher thread
struct Batch {
    buffer: Mutex<Vec<u8>>,
    chat_ids: Vec<String>,
    transport: Box<dyn ChatTransport>,
    metrics: FlushMetrics,
}

struct Flusher {
    stop: Sender<()>,
    handle: thread::JoinHandle<()>,
}

impl TelegramSink {
    /// Create a sink from a connection string (see [`Endpoint::parse`]) and
    /// start its flusher.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the connection string or the chat
    /// list is empty, or when the connection string is malformed.
    pub fn new(connection: &str, chat_ids: Vec<String>) -> Result<Self> {
        Self::with_flush_interval(connection, chat_ids, DEFAULT_FLUSH_INTERVAL)
    }

    /// Same as [`TelegramSink::new`] with a custom interval between cycles
    pub fn with_flush_interval(
        connection: &str,
        chat_ids: Vec<String>,
        flush_interval: Duration,
    ) -> Result<Self> {
        if connection.is_empty() {
            return Err(LoggerError::config(
                "TelegramSink",
                "Empty telegram connection string",
            ));
        }
        validate_chat_ids(&chat_ids)?;

        let endpoint = Endpoint::parse(connection)?;
        let transport = HttpTransport::new(&endpoint)?;
        Self::with_transport(transport, chat_ids, flush_interval)
    }

    /// Create a sink over any transport with a custom flush interval.
    pub fn with_transport(
        transport: impl ChatTransport + 'static,
        chat_ids: Vec<String>,
        flush_interval: Duration,
    ) -> Result<Self> {
        validate_chat_ids(&chat_ids)?;

        let batch = Arc::new(Batch {
            buffer: Mutex::new(Vec::new()),
            chat_ids,
            transport: Box::new(transport),
            metrics: FlushMetrics::new(),
        });
        let flusher = Flusher::start(Arc::clone(&batch), flush_interval)?;

        Ok(Self {
            id: TELEGRAM_SINK_ID.to_string(),
            batch,
            flusher: Mutex::new(Some(flusher)),
        })
    }

    /// Register under a different id, e.g. to run two bots side by side
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn chat_ids(&self) -> &[String] {
        &self.batch.chat_ids
    }

    /// Text waiting for the next successful cycle
    pub fn pending(&self) -> String {
        String::from_utf8_lossy(&self.batch.buffer.lock()).into_owned()
    }

    pub fn metrics(&self) -> &FlushMetrics {
        &self.batch.metrics
    }

    /// Run one flush cycle now. Returns the number of bytes delivered, 0 when
    /// the buffer was empty.
    pub fn send(&self) -> Result<usize> {
        self.batch.flush()
    }

    /// Stop the flusher and make one last delivery attempt.
    ///
    /// Returns `false` if the flusher thread panicked or the final attempt
    /// failed; the undelivered text stays in [`TelegramSink::pending`].
    pub fn shutdown(&self) -> bool {
        let Some(flusher) = self.flusher.lock().take() else {
            return true;
        };

        let _ = flusher.stop.send(());
        if let Err(e) = flusher.handle.join() {
            eprintln!("[LOGGER ERROR] Telegram flusher panicked during shutdown: {:?}", e);
            return false;
        }

        match self.batch.flush() {
            Ok(_) => true,
            Err(e) => {
                eprintln!("[LOGGER ERROR] Final telegram flush failed: {}", e);
                false
            }
        }
    }
}

fn validate_chat_ids(chat_ids: &[String]) -> Result<()> {
    if chat_ids.is_empty() {
        return Err(LoggerError::config("TelegramSink", "Empty telegram chat ids"));
    }
    Ok(())
}

impl Batch {
    fn append(&self, data: &[u8]) {
        let stamp = timestamp::utc_now();

        let mut buffer = self.buffer.lock();
        buffer.extend_from_slice(FRAME_PREFIX);
        buffer.extend_from_slice(stamp.as_bytes());
        buffer.extend_from_slice(FRAME_SUFFIX);
        buffer.extend_from_slice(data);
    }

    /// Deliver the buffer to every chat in order, clearing it only if all of
    /// them succeed. The lock is held across the requests, so writers wait
    /// for at most one cycle bounded by the request timeout.
    fn flush(&self) -> Result<usize> {
        let mut buffer = self.buffer.lock();
        if buffer.is_empty() {
            return Ok(0);
        }

        let text = String::from_utf8_lossy(&buffer).into_owned();
        for chat_id in &self.chat_ids {
            let message = ChatMessage {
                chat_id: chat_id.as_str(),
                text: &text,
            };
            if let Err(e) = self.transport.send(&message) {
                self.metrics.record_failure();
                return Err(e);
            }
        }

        let delivered = buffer.len();
        buffer.clear();
        self.metrics.record_success(delivered);
        Ok(delivered)
    }
}

impl Flusher {
    fn start(batch: Arc<Batch>, interval: Duration) -> Result<Self> {
        let (stop, stop_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name("telegram-flusher".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if let Err(e) = batch.flush() {
                            let failures = batch.metrics.failed_flushes();
                            // Report the first failure and every 60th after it.
                            if failures == 1 || failures % 60 == 0 {
                                eprintln!(
                                    "[LOGGER WARNING] Telegram flush failed ({} failures so far), \
                                     keeping {} buffered bytes for retry: {}",
                                    failures,
                                    batch.buffer.lock().len(),
                                    e
                                );
                            }
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        Ok(Self { stop, handle })
    }
}

impl Sink for TelegramSink {
    fn id(&self) -> &str {
        &self.id
    }

    fn write(&self, data: &[u8]) -> Result<usize> {
        if data.is_empty() {
            return Ok(0);
        }
        self.batch.append(data);
        Ok(data.len())
    }

    fn flush(&self) -> Result<()> {
        self.batch.flush().map(|_| ())
    }
}

impl Drop for TelegramSink {
    fn drop(&mut self) {
        self.shutdown();
    }
}
