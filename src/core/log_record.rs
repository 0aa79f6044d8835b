//! Log record composition
//!
//! A record lives only for the duration of one emit call: it is rendered
//! into the logger's scratch buffer, handed to every subscribed sink and
//! then dropped.

use super::log_level::LogLevel;
use super::timestamp;
use std::fmt;
use std::io::Write;
use std::panic::Location;
use std::path::Path;
use std::sync::OnceLock;

static HOSTNAME: OnceLock<String> = OnceLock::new();

/// Host name of this process, resolved on first use and cached
pub fn hostname() -> &'static str {
    HOSTNAME.get_or_init(|| gethostname::gethostname().to_string_lossy().into_owned())
}

/// Base name of the running executable, used as the default prefix
pub fn executable_name() -> Option<String> {
    let arg0 = std::env::args_os().next()?;
    Path::new(&arg0)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

/// Strip directories from a source path reported by `Location`
fn short_file(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub level: LogLevel,
    pub timestamp: String,
    pub hostname: &'a str,
    pub prefix: Option<&'a str>,
    pub file: &'a str,
    pub line: u32,
    pub message: fmt::Arguments<'a>,
}

impl<'a> LogRecord<'a> {
    pub fn new(
        level: LogLevel,
        location: &'a Location<'a>,
        prefix: Option<&'a str>,
        message: fmt::Arguments<'a>,
    ) -> Self {
        Self {
            level,
            timestamp: timestamp::local_now(),
            hostname: hostname(),
            prefix,
            file: short_file(location.file()),
            line: location.line(),
            message,
        }
    }

    /// Render `<LVL>: <timestamp> <host>[-<prefix>] <file>:<line>: <message>\n`
    pub fn render_into(&self, buf: &mut Vec<u8>) {
        // Writing into a Vec cannot fail.
        let _ = write!(
            buf,
            "{}: {} {}",
            self.level.code(),
            self.timestamp,
            self.hostname
        );
        if let Some(prefix) = self.prefix {
            let _ = write!(buf, "-{}", prefix);
        }
        let _ = writeln!(buf, " {}:{}: {}", self.file, self.line, self.message);
    }
}

/// Renders a slice of values separated by single spaces
pub struct JoinedValues<'a>(pub &'a [&'a dyn fmt::Display]);

impl fmt::Display for JoinedValues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_file() {
        assert_eq!(short_file("src/core/logger.rs"), "logger.rs");
        assert_eq!(short_file("C:\\work\\src\\main.rs"), "main.rs");
        assert_eq!(short_file("main.rs"), "main.rs");
    }

    fn render(
        level: LogLevel,
        location: &'static Location<'static>,
        prefix: Option<&str>,
        message: fmt::Arguments<'_>,
    ) -> String {
        let mut record = LogRecord::new(level, location, prefix, message);
        record.timestamp = "2017-05-31 22:29:11.7489315 +03:00".to_string();
        record.hostname = "box";

        let mut buf = Vec::new();
        record.render_into(&mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_render_layout() {
        let location = Location::caller();
        let line = render(
            LogLevel::Error,
            location,
            Some("worker"),
            format_args!("disk {} full", "/var"),
        );

        let expected = format!(
            "ERR: 2017-05-31 22:29:11.7489315 +03:00 box-worker log_record.rs:{}: disk /var full\n",
            location.line()
        );
        assert_eq!(line, expected);
    }

    #[test]
    fn test_render_without_prefix() {
        let line = render(LogLevel::Debug, Location::caller(), None, format_args!("x"));

        assert!(line.starts_with("DBG: 2017-05-31 22:29:11.7489315 +03:00 box log_record.rs:"));
        assert!(line.ends_with(": x\n"));
    }

    #[test]
    fn test_joined_values() {
        let n = 42;
        let values: [&dyn fmt::Display; 3] = [&"answer", &n, &'!'];
        assert_eq!(JoinedValues(&values).to_string(), "answer 42 !");
        assert_eq!(JoinedValues(&[]).to_string(), "");
    }

    #[test]
    fn test_hostname_is_cached() {
        assert!(std::ptr::eq(hostname(), hostname()));
    }
}
