//! Rule to forbid replacing base SFRA routes.
//!
//! # Detected Patterns
//!
//! ```ignore
//! server.replace('Show', function (req, res, next) { ... });
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! server.append('Show', function (req, res, next) { ... });
//! ```

use crate::queries;
use cartridge_lint_core::patterns::REPLACED_ROUTE;
use cartridge_lint_core::{
    AuditError, FileContext, FileQuery, Generation, Rule, Severity, Violation,
};

/// Rule code for no-replaced-endpoints.
pub const CODE: &str = "CL017";

/// Rule name for no-replaced-endpoints.
pub const NAME: &str = "no-replaced-endpoints";

/// Reports `server.replace(` route registrations.
#[derive(Debug, Clone)]
pub struct NoReplacedEndpoints {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoReplacedEndpoints {
    fn default() -> Self {
        Self::new()
    }
}

impl NoReplacedEndpoints {
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

impl Rule for NoReplacedEndpoints {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Controllers should prepend or append endpoints, not replace them"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::controllers(Generation::Sfra)
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let mut violations = Vec::new();
        for caps in REPLACED_ROUTE.captures_iter(ctx.content) {
            if let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) {
                violations.push(Violation::new(name.as_str(), whole.start())?);
            }
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_code, texts};

    #[test]
    fn test_detects_replaced_routes() {
        let code = "var server = require('server');\nserver.extend(module.superModule);\n\
            server.replace('Show', function (req, res, next) { next(); });\n\
            server.append('Begin', function (req, res, next) { next(); });\n\
            server.replace(\n    'Submit', function (req, res, next) { next(); });\n";
        let violations = check_code(
            &NoReplacedEndpoints::new(),
            "cartridges/app_custom_sfra/cartridge/controllers/Checkout.js",
            code,
        );
        assert_eq!(texts(&violations), vec!["Show", "Submit"]);
        assert_eq!(violations[0].offset(), 67);
    }
}
