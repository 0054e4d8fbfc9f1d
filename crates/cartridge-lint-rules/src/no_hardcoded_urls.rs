//! Rule to forbid hardcoded URLs in client-side scripts.
//!
//! URLs belong in site preferences or are built with `URLUtils` on the
//! server. Lines where the URL sits in a comment are allowed.

use crate::queries;
use cartridge_lint_core::patterns::{COMMENTED_URL, HARDCODED_URL};
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for no-hardcoded-urls.
pub const CODE: &str = "CL008";

/// Rule name for no-hardcoded-urls.
pub const NAME: &str = "no-hardcoded-urls";

/// Forbids `http(s)://` outside comments in browser scripts.
#[derive(Debug, Clone)]
pub struct NoHardcodedUrls {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoHardcodedUrls {
    fn default() -> Self {
        Self::new()
    }
}

impl NoHardcodedUrls {
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

impl Rule for NoHardcodedUrls {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Client-side JS should not contain hardcoded URLs"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::client_scripts()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        HARDCODED_URL
            .find_iter(ctx.content)
            .filter(|m| !COMMENTED_URL.is_match(m.as_str()))
            .map(|m| Violation::new(m.as_str(), m.start()))
            .collect()
    }
}
