//! Progress logging.
//!
//! Pipeline code logs through the helpers below; entries are emitted as
//! `tracing` events on the `dcexport` target, so the binary decides where they
//! go (stderr, filtered by `RUST_LOG`).

use serde::{Deserialize, Serialize};

/// Log level for progress output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn debug(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Debug, message: message.into(), indent: 0 }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Message with indentation and level marker applied.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Success => "✓ ",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Error => "❌ ",
            LogLevel::Debug | LogLevel::Info => "",
        };
        format!("{}{}{}", "   ".repeat(self.indent as usize), prefix, self.message)
    }
}

/// Emit an entry.
pub fn log(entry: LogEntry) {
    let line = entry.render();
    match entry.level {
        LogLevel::Debug => tracing::debug!(target: "dcexport", "{}", line),
        LogLevel::Info | LogLevel::Success => tracing::info!(target: "dcexport", "{}", line),
        LogLevel::Warning => tracing::warn!(target: "dcexport", "{}", line),
        LogLevel::Error => tracing::error!(target: "dcexport", "{}", line),
    }
}

/// Convenient logging functions
pub fn log_debug(msg: impl Into<String>) {
    log(LogEntry::debug(msg));
}

pub fn log_info(msg: impl Into<String>) {
    log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_indent_and_prefix() {
        assert_eq!(LogEntry::info("hello").render(), "hello");
        assert_eq!(LogEntry::success("done").with_indent(1).render(), "   ✓ done");
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let json = serde_json::to_value(LogEntry::warning("careful").with_indent(2)).unwrap();
        assert_eq!(json["level"], "warning");
        assert_eq!(json["indent"], 2);
    }
}
