//! Rule to forbid SiteGenesis controllers calling each other.

use crate::queries;
use cartridge_lint_core::patterns::CONTROLLER_CALL;
use cartridge_lint_core::{
    AuditError, FileContext, FileQuery, Generation, Rule, Severity, Violation,
};

/// Rule code for no-controller-calls.
pub const CODE: &str = "CL018";

/// Rule name for no-controller-calls.
pub const NAME: &str = "no-controller-calls";

/// Reports `app.getController('X')` in SiteGenesis controllers.
#[derive(Debug, Clone)]
pub struct NoControllerCalls {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoControllerCalls {
    fn default() -> Self {
        Self::new()
    }
}

impl NoControllerCalls {
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

impl Rule for NoControllerCalls {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Controllers should not call other controllers"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::controllers(Generation::Controllers)
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        CONTROLLER_CALL
            .find_iter(ctx.content)
            .map(|m| Violation::new(m.as_str(), m.start()))
            .collect()
    }
}
