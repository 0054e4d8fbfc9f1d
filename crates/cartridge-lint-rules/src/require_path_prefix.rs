//! Rule to keep `require()` paths portable across cartridge paths.
//!
//! # Rationale
//!
//! A require path naming a cartridge directly breaks overlays: the module
//! is always loaded from that cartridge, whatever the cartridge path says.
//!
//! # Detected Patterns
//!
//! - `require('app_custom/cartridge/scripts/helper')`
//!
//! # Good Patterns
//!
//! ```ignore
//! var helper = require('*/cartridge/scripts/helper');
//! var Logger = require('dw/system/Logger');
//! var server = require('server');
//! ```

use crate::queries;
use cartridge_lint_core::patterns::{is_allowed_import, REQUIRE_PATH};
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for require-path-prefix.
pub const CODE: &str = "CL001";

/// Rule name for require-path-prefix.
pub const NAME: &str = "require-path-prefix";

/// Requires `require()` paths to start with an allowed prefix.
#[derive(Debug, Clone)]
pub struct RequirePathPrefix {
    /// Severity level.
    pub severity: Severity,
}

impl Default for RequirePathPrefix {
    fn default() -> Self {
        Self::new()
    }
}

impl RequirePathPrefix {
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

impl Rule for RequirePathPrefix {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "All require paths should not be hardcoded and use *"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::server_scripts()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let mut violations = Vec::new();
        for caps in REQUIRE_PATH.captures_iter(ctx.content) {
            let (Some(call), Some(path)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if !is_allowed_import(path.as_str()) {
                violations.push(Violation::new(call.as_str(), call.start())?);
            }
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_code, texts};

    fn check(code: &str) -> Vec<Violation> {
        check_code(
            &RequirePathPrefix::new(),
            "cartridges/int_custom/cartridge/scripts/a.js",
            code,
        )
    }

    #[test]
    fn test_detects_cartridge_path() {
        let violations = check(
            r"
var helper = require('app_custom/cartridge/scripts/helper');
var other = require('*/cartridge/scripts/other');
",
        );
        assert_eq!(
            texts(&violations),
            vec!["require('app_custom/cartridge/scripts/helper')"]
        );
        assert_eq!(violations[0].offset(), 14);
    }

    #[test]
    fn test_allows_platform_and_relative_paths() {
        let violations = check(
            r#"
var Logger = require("dw/system/Logger");
var server = require('server');
var local = require('./local');
var up = require('../up');
var top = require('~/cartridge/scripts/top');
"#,
        );
        assert!(violations.is_empty());
    }
}
