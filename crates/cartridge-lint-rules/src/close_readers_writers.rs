//! Rule to require readers and writers to be closed.
//!
//! The check counts: a file binding N readers or writers must call
//! `.close()` on those names N times. Which call closes which binding is not
//! tracked.

use crate::queries;
use cartridge_lint_core::patterns::{CLOSED_VARIABLE, READER_WRITER_BINDING};
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};
use std::collections::HashMap;

/// Rule code for close-readers-writers.
pub const CODE: &str = "CL004";

/// Rule name for close-readers-writers.
pub const NAME: &str = "close-readers-writers";

/// Requires every `new *Reader(` / `new *Writer(` binding to be closed.
#[derive(Debug, Clone)]
pub struct CloseReadersWriters {
    /// Severity level.
    pub severity: Severity,
}

impl Default for CloseReadersWriters {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseReadersWriters {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for CloseReadersWriters {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "All readers and writers should be explicitly closed"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::server_scripts()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let opened: Vec<(&str, usize)> = READER_WRITER_BINDING
            .captures_iter(ctx.content)
            .filter_map(|caps| caps.get(1).map(|m| (m.as_str(), m.start())))
            .collect();
        if opened.is_empty() {
            return Ok(Vec::new());
        }

        let names: Vec<&str> = opened.iter().map(|(name, _)| *name).collect();
        let mut closes: HashMap<&str, usize> = HashMap::new();
        for caps in CLOSED_VARIABLE.build(&names)?.captures_iter(ctx.content) {
            if let Some(name) = caps.get(1) {
                *closes.entry(name.as_str()).or_default() += 1;
            }
        }
        let closed: usize = closes.values().sum();
        if closed == opened.len() {
            return Ok(Vec::new());
        }

        let mut unclosed = Vec::new();
        for (name, offset) in &opened {
            match closes.get_mut(name) {
                Some(n) if *n > 0 => *n -= 1,
                _ => unclosed.push((*name, *offset)),
            }
        }
        let offset = unclosed.first().map_or(opened[0].1, |(_, o)| *o);
        let listed = unclosed.iter().map(|(n, _)| *n).collect::<Vec<_>>().join(", ");
        Ok(vec![Violation::new(
            format!(
                "{} opened, {closed} closed, not closed: {listed}",
                opened.len()
            ),
            offset,
        )?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_code, texts};

    fn check(code: &str) -> Vec<Violation> {
        check_code(
            &CloseReadersWriters::new(),
            "cartridges/int_custom/cartridge/scripts/a.js",
            code,
        )
    }

    #[test]
    fn test_detects_unclosed_reader() {
        let violations = check("var r = new FileReader(path);\nvar line = r.readLine();\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].text().ends_with("not closed: r"));
        assert_eq!(violations[0].offset(), 4);
    }

    #[test]
    fn test_names_only_the_unclosed_bindings() {
        let violations = check(
            r"var reader = new dw.io.FileReader(file);
var writer = new CSVStreamWriter(out);
reader.close();",
        );
        assert_eq!(texts(&violations), vec!["2 opened, 1 closed, not closed: writer"]);
    }

    #[test]
    fn test_allows_closed_bindings() {
        let violations = check(
            r"var r = new FileReader(path);
var w = new FileWriter(out);
w.close();
r.close();",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_ignores_files_without_bindings() {
        assert!(check("stream.close();").is_empty());
    }

    #[test]
    fn test_allows_closed_underscored_binding() {
        let violations = check(
            r"var file_reader = new FileReader(p);
var line = file_reader.readLine();
file_reader.close();",
        );
        assert!(violations.is_empty());
    }
}
