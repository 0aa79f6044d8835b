//! Main logger implementation

use super::{
    error::Result,
    log_level::LogLevel,
    log_record::{self, JoinedValues, LogRecord},
    metrics::LoggerMetrics,
    registry::ProviderRegistry,
    sink::Sink,
};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::panic::Location;
use std::sync::Arc;

/// Exit code used when a fatal record or a bad subscription stops the process
pub const FATAL_EXIT_CODE: i32 = 1;

/// Level-gated dispatcher that renders records and fans them out to the
/// sinks subscribed to each level.
///
/// Every admitted record is composed and delivered while holding one lock,
/// so two concurrent calls never interleave their bytes at a sink. The
/// flip side is that a slow sink stalls every other caller until its
/// `write` returns.
///
/// # Example
///
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::new();
/// logger.register_sink(Arc::new(ConsoleSink::new()));
/// logger.subscribe("console", &[LogLevel::Error, LogLevel::Warning]);
/// logger.set_threshold(LogLevel::Warning);
///
/// logger.error("disk full");
/// logger.info("suppressed: above the threshold");
/// ```
pub struct Logger {
    threshold: RwLock<LogLevel>,
    state: Mutex<DispatchState>,
    metrics: Arc<LoggerMetrics>,
}

struct DispatchState {
    registry: ProviderRegistry,
    prefix: Option<String>,
    /// Scratch buffer reused for every record
    buf: Vec<u8>,
}

impl Logger {
    /// Create a logger that admits every level, with the executable name
    /// as prefix and no sinks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(LogLevel::default(), log_record::executable_name())
    }

    fn with_parts(threshold: LogLevel, prefix: Option<String>) -> Self {
        Self {
            threshold: RwLock::new(threshold),
            state: Mutex::new(DispatchState {
                registry: ProviderRegistry::new(),
                prefix,
                buf: Vec::with_capacity(256),
            }),
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn set_threshold(&self, level: LogLevel) {
        *self.threshold.write() = level;
    }

    pub fn threshold(&self) -> LogLevel {
        *self.threshold.read()
    }

    /// Whether a record at `level` would currently be dispatched
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level.is_admitted_by(*self.threshold.read())
    }

    /// Replace the prefix printed after the host name; `None` prints the
    /// host name alone.
    pub fn set_prefix(&self, prefix: Option<String>) {
        self.state.lock().prefix = prefix;
    }

    pub fn prefix(&self) -> Option<String> {
        self.state.lock().prefix.clone()
    }

    pub fn hostname(&self) -> &'static str {
        log_record::hostname()
    }

    /// Register a sink under its id. Registering an id twice keeps the first
    /// sink and returns `false`.
    pub fn register_sink(&self, sink: Arc<dyn Sink>) -> bool {
        self.state.lock().registry.register(sink)
    }

    /// Subscribe a registered sink to the given levels, reporting an unknown
    /// id as [`LoggerError::UnknownSink`](super::LoggerError::UnknownSink).
    pub fn try_subscribe(&self, id: &str, levels: &[LogLevel]) -> Result<()> {
        self.state.lock().registry.subscribe(id, levels)
    }

    /// Subscribe a registered sink to the given levels.
    ///
    /// An unknown id is a wiring mistake in the program, so the process is
    /// terminated. Use [`Logger::try_subscribe`] to handle it instead.
    pub fn subscribe(&self, id: &str, levels: &[LogLevel]) {
        if let Err(e) = self.try_subscribe(id, levels) {
            eprintln!("[LOGGER CRITICAL] {}", e);
            std::process::exit(FATAL_EXIT_CODE);
        }
    }

    /// Number of registered sinks
    pub fn sink_count(&self) -> usize {
        self.state.lock().registry.len()
    }

    /// Ids of the sinks subscribed to `level`, in delivery order
    pub fn subscribers(&self, level: LogLevel) -> Vec<String> {
        self.state
            .lock()
            .registry
            .subscribers(level)
            .iter()
            .map(|sink| sink.id().to_string())
            .collect()
    }

    /// Dispatch preformatted arguments; the macros land here.
    #[track_caller]
    pub fn log_fmt(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        if !self.is_enabled(level) {
            return;
        }
        self.dispatch(level, Location::caller(), args);
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        self.log_fmt(level, format_args!("{}", message));
    }

    /// Dispatch several values joined by single spaces
    #[track_caller]
    pub fn log_values(&self, level: LogLevel, values: &[&dyn fmt::Display]) {
        self.log_fmt(level, format_args!("{}", JoinedValues(values)));
    }

    fn dispatch(
        &self,
        level: LogLevel,
        location: &'static Location<'static>,
        args: fmt::Arguments<'_>,
    ) {
        let mut guard = self.state.lock();
        let state = &mut *guard;

        state.buf.clear();
        LogRecord::new(level, location, state.prefix.as_deref(), args)
            .render_into(&mut state.buf);

        Self::deliver(
            state.registry.subscribers(level),
            &state.buf,
            &self.metrics,
        );
    }

    /// Write one rendered record to every sink, isolating failures so that
    /// one broken sink does not starve the others.
    fn deliver(sinks: &[Arc<dyn Sink>], record: &[u8], metrics: &LoggerMetrics) {
        let mut has_error = false;

        for sink in sinks {
            let write_result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.write(record)));

            match write_result {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", sink.id(), e);
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Sink '{}' panicked: {}. \
                         Other sinks continue to function.",
                        sink.id(),
                        panic_msg
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_failed();
        } else if !sinks.is_empty() {
            metrics.record_delivered();
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    /// Deliver a FATAL record to its subscribers, flush them and exit.
    ///
    /// Delivery is synchronous, so every FATAL subscriber has received the
    /// record before the process goes away.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.fatal_fmt(format_args!("{}", message))
    }

    #[track_caller]
    pub fn fatal_fmt(&self, args: fmt::Arguments<'_>) -> ! {
        self.log_fmt(LogLevel::Fatal, args);
        self.flush_level(LogLevel::Fatal);
        std::process::exit(FATAL_EXIT_CODE);
    }

    /// Best-effort flush of the sinks behind one level
    fn flush_level(&self, level: LogLevel) {
        let sinks = self.state.lock().registry.subscribers(level).to_vec();
        let _ = Self::flush_sinks(&sinks);
    }

    /// Flush every registered sink.
    ///
    /// Every sink is flushed even when an earlier one fails; each failure is
    /// reported on stderr and the first one is returned. Sink flushes may do
    /// network I/O, so they run after the dispatch lock is released and
    /// emits from other threads keep flowing meanwhile.
    pub fn flush(&self) -> Result<()> {
        let sinks: Vec<Arc<dyn Sink>> = self.state.lock().registry.sinks().cloned().collect();
        Self::flush_sinks(&sinks)
    }

    fn flush_sinks(sinks: &[Arc<dyn Sink>]) -> Result<()> {
        let mut first_error = None;
        for sink in sinks {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Sink '{}' flush failed: {}", sink.id(), e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Logger")
            .field("threshold", &self.threshold())
            .field("prefix", &state.prefix)
            .field("registry", &state.registry)
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Each failing sink is already reported by flush().
        let _ = self.flush();

        let failed = self.metrics.failed_count();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} failed records (failure rate: {:.2}%)",
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Unlike [`Logger::subscribe`], an unknown id is returned from
/// [`LoggerBuilder::build`] as an error.
///
/// # Example
/// ```
/// use rust_log_dispatcher::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .threshold(LogLevel::Info)
///     .prefix("billing")
///     .sink(Arc::new(ConsoleSink::new()))
///     .subscribe("console", &[LogLevel::Error, LogLevel::Warning, LogLevel::Info])
///     .build()
///     .expect("console sink is registered");
/// ```
pub struct LoggerBuilder {
    threshold: LogLevel,
    prefix: Option<String>,
    sinks: Vec<Arc<dyn Sink>>,
    subscriptions: Vec<(String, Vec<LogLevel>)>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            threshold: LogLevel::default(),
            prefix: log_record::executable_name(),
            sinks: Vec::new(),
            subscriptions: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.threshold = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Print the host name without any prefix
    #[must_use = "builder methods return a new value"]
    pub fn no_prefix(mut self) -> Self {
        self.prefix = None;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn subscribe(mut self, id: impl Into<String>, levels: &[LogLevel]) -> Self {
        self.subscriptions.push((id.into(), levels.to_vec()));
        self
    }

    pub fn build(self) -> Result<Logger> {
        let logger = Logger::with_parts(self.threshold, self.prefix);

        for sink in self.sinks {
            logger.register_sink(sink);
        }
        for (id, levels) in &self.subscriptions {
            logger.try_subscribe(id, levels)?;
        }

        Ok(logger)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
