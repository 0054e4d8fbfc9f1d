//! Rule to forbid inline `style=` attributes in templates.

use crate::queries;
use cartridge_lint_core::markup::inline_style_tags;
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for no-inline-styles.
pub const CODE: &str = "CL013";

/// Rule name for no-inline-styles.
pub const NAME: &str = "no-inline-styles";

/// Forbids tags carrying a `style=` attribute.
#[derive(Debug, Clone)]
pub struct NoInlineStyles {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoInlineStyles {
    fn default() -> Self {
        Self::new()
    }
}

impl NoInlineStyles {
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

impl Rule for NoInlineStyles {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Inline styles should be moved to stylesheets"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::templates()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        inline_style_tags(ctx.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_code, texts};

    #[test]
    fn test_detects_style_attribute() {
        let code = "<div class=\"a\">\n<span style=\"color: red\">${x}</span>\n<isscript>var s = '<b style=\"x\">';</isscript>\n</div>";
        let violations = check_code(
            &NoInlineStyles::new(),
            "cartridges/app_custom_sfra/cartridge/templates/default/a.isml",
            code,
        );
        assert_eq!(texts(&violations), vec!["<span style=\"color: red\">"]);
    }
}
