//! Structured JSON logger
//!
//! One line per event: `event`, then `severity`, then `ts` (RFC 3339 UTC),
//! then caller fields sorted by key. Synchronous and unbuffered. INFO and
//! WARN go to stdout, ERROR and FATAL to stderr.

use std::fmt;
use std::io::{self, Write};

use chrono::{SecondsFormat, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info = 0,
    Warn = 1,
    Error = 2,
    /// The store cannot be trusted and must not open
    Fatal = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn to_stderr(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct Logger;

impl Logger {
    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let line = Self::format_line(severity, event, fields);
        if severity.to_stderr() {
            Self::emit(&line, &mut io::stderr());
        } else {
            Self::emit(&line, &mut io::stdout());
        }
    }

    fn emit<W: Write>(line: &str, writer: &mut W) {
        // Logging never fails the caller
        let _ = writer.write_all(line.as_bytes());
        let _ = writer.flush();
    }

    fn format_line(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut output = String::with_capacity(128 + fields.len() * 32);

        output.push_str("{\"event\":\"");
        escape_json_string(&mut output, event);
        output.push_str("\",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push_str("\",\"ts\":\"");
        output.push_str(&ts);
        output.push('"');

        let mut sorted: Vec<&(&str, &str)> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted {
            output.push_str(",\"");
            escape_json_string(&mut output, key);
            output.push_str("\":\"");
            escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push_str("}\n");
        output
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }
}

fn escape_json_string(output: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if c.is_control() => output.push_str(&format!("\\u{:04x}", c as u32)),
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> serde_json::Value {
        serde_json::from_str(line).unwrap()
    }

    #[test]
    fn test_line_is_json_with_timestamp() {
        let line = Logger::format_line(Severity::Info, "DOCUMENT_CREATED", &[("collection", "users")]);
        let parsed = parse(&line);
        assert_eq!(parsed["event"], "DOCUMENT_CREATED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["collection"], "users");
        assert!(chrono::DateTime::parse_from_rfc3339(parsed["ts"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_fields_sorted_and_event_first() {
        let line = Logger::format_line(Severity::Warn, "X", &[("zebra", "1"), ("apple", "2")]);
        let event = line.find("\"event\"").unwrap();
        let severity = line.find("\"severity\"").unwrap();
        let apple = line.find("apple").unwrap();
        let zebra = line.find("zebra").unwrap();
        assert!(event < severity);
        assert!(severity < apple);
        assert!(apple < zebra);
    }

    #[test]
    fn test_escapes_and_single_line() {
        let line = Logger::format_line(Severity::Error, "X", &[("reason", "bad \"json\"\nat 1")]);
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.ends_with('\n'));
        assert_eq!(parse(&line)["reason"], "bad \"json\"\nat 1");
    }

    #[test]
    fn test_severity_routing() {
        assert!(!Severity::Info.to_stderr());
        assert!(!Severity::Warn.to_stderr());
        assert!(Severity::Error.to_stderr());
        assert!(Severity::Fatal.to_stderr());
    }
}
