//! Basic dispatcher usage
//!
//! Demonstrates per-level subscriptions, the threshold and the three emit
//! forms. Set `TELEGRAM_CONNECTION` and `TELEGRAM_CHAT_ID` to also ship
//! ERROR and FATAL records to a chat.
//!
//! Run with: cargo run --example basic_usage

use rust_log_dispatcher::prelude::*;
use rust_log_dispatcher::{info, warn};
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .threshold(LogLevel::Info)
        .prefix("demo")
        .sink(Arc::new(ConsoleSink::new()))
        .subscribe(
            "console",
            &[LogLevel::Fatal, LogLevel::Error, LogLevel::Warning, LogLevel::Info],
        )
        .build()?;

    attach_telegram(&logger)?;

    println!("1. Emit forms:");
    logger.info("Application started");
    info!(logger, "Listening on port {}", 8080);
    logger.log_values(LogLevel::Warning, &[&"retry", &3, &"of", &5]);

    println!("\n2. Threshold:");
    logger.debug("Suppressed: DEBUG is above the INFO threshold");
    logger.set_threshold(LogLevel::Warning);
    logger.info("Suppressed too");
    warn!(logger, "Only WARNING and more severe now");
    logger.error("Database connection failed");

    println!("\n3. Multi-line messages stay on one console line:");
    logger.error("first line\nsecond line");

    println!("\nSubscribers of ERROR: {:?}", logger.subscribers(LogLevel::Error));
    println!("Delivered records: {}", logger.metrics().delivered_count());

    logger.flush()?;
    println!("\n=== Example completed ===");
    Ok(())
}

#[cfg(feature = "telegram")]
fn attach_telegram(logger: &Logger) -> Result<()> {
    let (Ok(connection), Ok(chat_id)) = (
        std::env::var("TELEGRAM_CONNECTION"),
        std::env::var("TELEGRAM_CHAT_ID"),
    ) else {
        return Ok(());
    };

    let sink = TelegramSink::new(&connection, vec![chat_id])?;
    logger.register_sink(Arc::new(sink));
    logger.try_subscribe("telegram", &[LogLevel::Fatal, LogLevel::Error])
}

#[cfg(not(feature = "telegram"))]
fn attach_telegram(_logger: &Logger) -> Result<()> {
    Ok(())
}
