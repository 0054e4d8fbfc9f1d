//! Rule to forbid `.ds` scripts outside pipelines cartridges.

use cartridge_lint_core::{
    AuditError, FileContext, FileQuery, Rule, Severity, Violation, CHANGES_CARTRIDGES,
};

/// Rule code for no-ds-scripts.
pub const CODE: &str = "CL006";

/// Rule name for no-ds-scripts.
pub const NAME: &str = "no-ds-scripts";

/// Reports every `.ds` file of a non-pipelines cartridge.
#[derive(Debug, Clone)]
pub struct NoDsScripts {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoDsScripts {
    fn default() -> Self {
        Self::new()
    }
}

impl NoDsScripts {
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

impl Rule for NoDsScripts {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Only .js files should be used, .ds files are deprecated"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        FileQuery::cartridges()
            .extensions(".ds")
            .exclude(["*pipelines", CHANGES_CARTRIDGES])
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        Ok(vec![Violation::new(ctx.file.name(), 0)?])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{project, run_rule};

    #[test]
    fn test_reports_ds_files_outside_pipelines() {
        let dir = project(&[
            ("cartridges/int_custom/cartridge/scripts/export.ds", "importPackage(dw.system);"),
            ("cartridges/int_custom/cartridge/scripts/export.js", "'use strict';"),
            ("cartridges/int_custom_pipelines/cartridge/scripts/legacy.ds", "importPackage(dw.system);"),
        ]);
        let session = run_rule(dir.path(), NoDsScripts::new());
        assert_eq!(session.failed_audits().len(), 1);
        assert_eq!(session.failed_audits()[0].file().name(), "export.ds");
    }
}
