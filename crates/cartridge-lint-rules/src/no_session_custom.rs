//! Rule to forbid custom session attributes.
//!
//! # Detected Patterns
//!
//! - `session.custom.x`, `session.getCustom()`
//! - `request.getSession().custom`
//! - the same through a variable holding `request.getSession()`

use crate::queries;
use cartridge_lint_core::patterns::{SESSION_ALIAS, SESSION_CUSTOM};
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for no-session-custom.
pub const CODE: &str = "CL003";

/// Rule name for no-session-custom.
pub const NAME: &str = "no-session-custom";

/// Forbids `session.custom` and its aliases.
#[derive(Debug, Clone)]
pub struct NoSessionCustom {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoSessionCustom {
    fn default() -> Self {
        Self::new()
    }
}

impl NoSessionCustom {
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

impl Rule for NoSessionCustom {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Session.custom shouldn't be used"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::server_scripts()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let mut aliases: Vec<&str> = Vec::new();
        for caps in SESSION_ALIAS.captures_iter(ctx.content) {
            if let Some(alias) = caps.get(1).map(|m| m.as_str()) {
                if !aliases.contains(&alias) {
                    aliases.push(alias);
                }
            }
        }

        SESSION_CUSTOM
            .build(&aliases)?
            .find_iter(ctx.content)
            .map(|m| Violation::new(m.as_str(), m.start()))
            .collect()
    }
}
