//! Rule to forbid `!important` in stylesheets.

use crate::queries;
use cartridge_lint_core::patterns::IMPORTANT;
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for no-important.
pub const CODE: &str = "CL010";

/// Rule name for no-important.
pub const NAME: &str = "no-important";

/// Forbids `!important`.
#[derive(Debug, Clone)]
pub struct NoImportant {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoImportant {
    fn default() -> Self {
        Self::new()
    }
}

impl NoImportant {
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

impl Rule for NoImportant {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "!important should be avoided"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::styles()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        IMPORTANT
            .find_iter(ctx.content)
            .map(|m| Violation::new(m.as_str(), m.start()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_code, texts};

    #[test]
    fn test_detects_important() {
        let violations = check_code(
            &NoImportant::new(),
            "cartridges/app_custom_sfra/cartridge/client/default/scss/a.scss",
            ".a {\n    color: red !important;\n    margin: 0;\n}",
        );
        assert_eq!(texts(&violations), vec!["    color: red !important;"]);
        assert_eq!(violations[0].offset(), 5);
    }
}
