//! Error log attached to every store
//!
//! Messages are deduplicated by exact text and kept in the order they were
//! first recorded. Once a fatal error is seen the log stays fatal.

use std::collections::HashMap;

use serde::Serialize;

use super::error::Severity;

/// Rendered when nothing has been recorded
pub const NO_ERRORS: &str = "No errors reported";

/// One recorded error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
    positions: HashMap<String, usize>,
    fatal: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message; returns false if the same text was already present
    ///
    /// A repeat keeps its original position but is raised to the higher
    /// severity of the two.
    pub fn record(&mut self, message: impl Into<String>, severity: Severity) -> bool {
        let message = message.into();
        if severity == Severity::Fatal {
            self.fatal = true;
        }

        if let Some(&pos) = self.positions.get(&message) {
            let existing = &mut self.records[pos];
            existing.severity = existing.severity.max(severity);
            return false;
        }

        self.positions.insert(message.clone(), self.records.len());
        self.records.push(Diagnostic { message, severity });
        true
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    /// Renders at most `cap` errors followed by a count of the rest
    pub fn render(&self, source: &str, cap: usize) -> String {
        if self.records.is_empty() {
            return NO_ERRORS.to_string();
        }

        let mut lines = vec![format!("Encountered errors in '{}':", source)];
        lines.extend(
            self.records
                .iter()
                .take(cap)
                .map(|d| format!(" [{}] {}", d.severity.label(), d.message)),
        );

        let hidden = self.records.len().saturating_sub(cap);
        if hidden > 0 {
            lines.push(format!(" {} more error(s) reported", hidden));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_log_renders_sentinel() {
        let log = Diagnostics::new();
        assert!(log.is_empty());
        assert_eq!(log.render("cfg.ini", 5), NO_ERRORS);
    }

    #[test]
    fn identical_messages_are_recorded_once() {
        let mut log = Diagnostics::new();
        assert!(log.record("bad line", Severity::Normal));
        assert!(!log.record("bad line", Severity::Normal));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn fatal_flag_is_sticky() {
        let mut log = Diagnostics::new();
        log.record("first", Severity::Normal);
        assert!(!log.has_fatal());
        log.record("write failed", Severity::Fatal);
        log.record("later", Severity::Normal);
        assert!(log.has_fatal());
    }

    #[test]
    fn repeat_raises_severity() {
        let mut log = Diagnostics::new();
        log.record("oops", Severity::Normal);
        log.record("oops", Severity::Fatal);
        let only = log.iter().next().unwrap();
        assert_eq!(only.severity, Severity::Fatal);
    }

    #[test]
    fn render_caps_and_summarizes() {
        let mut log = Diagnostics::new();
        for i in 0..7 {
            log.record(format!("error {}", i), Severity::Normal);
        }
        log.record("disk full", Severity::Fatal);

        let text = log.render("cfg.ini", 5);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Encountered errors in 'cfg.ini':");
        assert_eq!(lines[1], " [ERROR] error 0");
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[6], " 3 more error(s) reported");
        assert!(!text.contains("disk full"));
    }

    #[test]
    fn render_without_overflow_has_no_summary() {
        let mut log = Diagnostics::new();
        log.record("write failed", Severity::Fatal);
        assert_eq!(
            log.render("cfg.ini", 5),
            "Encountered errors in 'cfg.ini':\n [FATAL] write failed"
        );
    }
}
