//! Rule to require `LocalServiceRegistry`.
//!
//! `dw.svc.ServiceRegistry` needs services configured globally;
//! `LocalServiceRegistry` keeps the definition in the cartridge.

use crate::queries;
use cartridge_lint_core::patterns::SERVICE_REGISTRY;
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for local-service-registry.
pub const CODE: &str = "CL007";

/// Rule name for local-service-registry.
pub const NAME: &str = "local-service-registry";

/// Forbids lines using `dw/svc/ServiceRegistry`.
#[derive(Debug, Clone)]
pub struct LocalServiceRegistry {
    /// Severity level.
    pub severity: Severity,
}

impl Default for LocalServiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalServiceRegistry {
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

impl Rule for LocalServiceRegistry {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "LocalServiceRegistry should be used instead of ServiceRegistry"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::server_scripts()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        SERVICE_REGISTRY
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
    fn test_detects_service_registry() {
        let violations = check_code(
            &LocalServiceRegistry::new(),
            "cartridges/int_custom/cartridge/scripts/services/api.js",
            r"var ServiceRegistry = require('dw/svc/ServiceRegistry');
var LocalServiceRegistry = require('dw/svc/LocalServiceRegistry');
var svc = dw.svc.ServiceRegistry.get('custom.http');",
        );
        assert_eq!(
            texts(&violations),
            vec![
                "var ServiceRegistry = require('dw/svc/ServiceRegistry');",
                "var svc = dw.svc.ServiceRegistry.get('custom.http');",
            ]
        );
    }
}
