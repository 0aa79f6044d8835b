//! Console sink implementation

use crate::core::{Result, Sink};
use std::io::Write;

pub const CONSOLE_SINK_ID: &str = "console";

/// Writes each record to stdout as a single line.
///
/// Embedded carriage returns and line feeds are replaced by spaces so a
/// multi-line message cannot forge extra records; the terminating newline
/// of the record is kept.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for ConsoleSink {
    fn id(&self) -> &str {
        CONSOLE_SINK_ID
    }

    fn write(&self, data: &[u8]) -> Result<usize> {
        let line = single_line(data);
        std::io::stdout().lock().write_all(&line)?;
        Ok(data.len())
    }

    fn flush(&self) -> Result<()> {
        std::io::stdout().flush()?;
        Ok(())
    }
}

/// Replace every `\r` and `\n` except the final byte with a space.
///
/// Both are single-byte in UTF-8 and never occur inside a multi-byte
/// sequence, so a byte-wise pass keeps the text valid.
fn single_line(data: &[u8]) -> Vec<u8> {
    let mut line = data.to_vec();
    if let Some((_, body)) = line.split_last_mut() {
        for byte in body.iter_mut() {
            if *byte == b'\r' || *byte == b'\n' {
                *byte = b' ';
            }
        }
    }
    line
}
