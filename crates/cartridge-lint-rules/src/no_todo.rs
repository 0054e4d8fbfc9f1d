//! Rule to forbid `TODO` markers in delivered cartridges.

use cartridge_lint_core::patterns::TODO;
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for no-todo.
pub const CODE: &str = "CL002";

/// Rule name for no-todo.
pub const NAME: &str = "no-todo";

/// Forbids `TODO` text in cartridge files.
#[derive(Debug, Clone)]
pub struct NoTodo {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoTodo {
    fn default() -> Self {
        Self::new()
    }
}

impl NoTodo {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for NoTodo {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "The code should not contain any TODOs"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        FileQuery::cartridges().exclude(["static"])
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        TODO.find_iter(ctx.content)
            .map(|m| Violation::new(m.as_str(), m.start()))
            .collect()
    }
}
