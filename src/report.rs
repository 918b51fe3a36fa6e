//! Turning a batch result into a message for the user, and delivering it

use std::fmt;

use tracing::{error, info, warn};

use crate::dispatch::BatchResult;
use crate::error::Error;

/// Line separator of the platform the batch runs on
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Title of the notice sent when a batch did not fully print
pub const BATCH_FAILURE_TITLE: &str = "Could not print a document";

/// Title of the notice sent when the run itself failed
pub const APPLICATION_ERROR_TITLE: &str = "Application error";

/// Formats the outcome of a batch
pub struct BatchReporter;

impl BatchReporter {
    /// `None` when every ticket printed. Otherwise the distinct failure
    /// messages, one per line, or the fault's message when nothing else was
    /// recorded.
    pub fn report(result: &BatchResult) -> Option<String> {
        if !result.failures.is_empty() {
            return Some(result.failures.join(LINE_SEPARATOR));
        }
        result.fault.as_ref().map(Error::to_string)
    }
}

/// How a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Plain,
    Information,
    Question,
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Plain => "plain",
            Severity::Information => "information",
            Severity::Question => "question",
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        f.write_str(name)
    }
}

/// Capability that shows a notice to the user
pub trait Notifier {
    fn notify(&self, title: &str, message: &str, severity: Severity);
}

/// Writes notices to stderr as `[severity] title: message`
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn format(title: &str, message: &str, severity: Severity) -> String {
        format!("[{severity}] {title}: {message}")
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str, severity: Severity) {
        match severity {
            Severity::Error => error!(title, message, "notification"),
            Severity::Warning => warn!(title, message, "notification"),
            _ => info!(title, message, %severity, "notification"),
        }
        eprintln!("{}", Self::format(title, message, severity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(failures: &[&str], fault: Option<Error>) -> BatchResult {
        BatchResult {
            printed: Vec::new(),
            failures: failures.iter().map(|f| f.to_string()).collect(),
            fault,
        }
    }

    #[test]
    fn test_success_reports_nothing() {
        let ok = BatchResult {
            printed: vec!["HP1".to_string()],
            ..BatchResult::default()
        };
        assert_eq!(BatchReporter::report(&ok), None);
    }

    #[test]
    fn test_failures_joined_with_line_separator() {
        let report = BatchReporter::report(&result(
            &["\"X\" Printer not found", "\"Y\" Printer not found"],
            None,
        ));
        assert_eq!(
            report,
            Some(format!(
                "\"X\" Printer not found{LINE_SEPARATOR}\"Y\" Printer not found"
            ))
        );
    }

    #[test]
    fn test_fault_message_is_the_fallback() {
        let report = BatchReporter::report(&result(&[], Some(Error::Layout("bad width".into()))));
        assert_eq!(report, Some("Layout error: bad width".to_string()));
    }

    #[test]
    fn test_recorded_failures_take_precedence_over_fault() {
        let report = BatchReporter::report(&result(
            &["\"X\" Printer not found"],
            Some(Error::General("boom".into())),
        ));
        assert_eq!(report, Some("\"X\" Printer not found".to_string()));
    }

    #[test]
    fn test_severity_names() {
        let names: Vec<String> = [
            Severity::Plain,
            Severity::Information,
            Severity::Question,
            Severity::Error,
            Severity::Warning,
        ]
        .iter()
        .map(Severity::to_string)
        .collect();
        assert_eq!(names, vec!["plain", "information", "question", "error", "warning"]);
    }

    #[test]
    fn test_console_format() {
        assert_eq!(
            ConsoleNotifier::format(BATCH_FAILURE_TITLE, "\"X\" Printer not found", Severity::Warning),
            "[warning] Could not print a document: \"X\" Printer not found"
        );
    }
}
