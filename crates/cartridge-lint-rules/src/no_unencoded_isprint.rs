//! Rule to forbid `<isprint>` with encoding turned off.

use crate::queries;
use cartridge_lint_core::markup::isprint_tags;
use cartridge_lint_core::patterns::ENCODING_OFF;
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for no-unencoded-isprint.
pub const CODE: &str = "CL012";

/// Rule name for no-unencoded-isprint.
pub const NAME: &str = "no-unencoded-isprint";

/// Forbids `<isprint ... encoding="off">`.
#[derive(Debug, Clone)]
pub struct NoUnencodedIsprint {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoUnencodedIsprint {
    fn default() -> Self {
        Self::new()
    }
}

impl NoUnencodedIsprint {
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

impl Rule for NoUnencodedIsprint {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Templates should not print values with encoding turned off"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::templates()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        Ok(isprint_tags(ctx.content)?
            .into_iter()
            .filter(|v| ENCODING_OFF.is_match(v.text()))
            .collect())
    }
}
