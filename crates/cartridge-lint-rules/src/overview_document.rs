//! Rule to require an installation overview document.
//!
//! A document is an overview when its file name contains `overview`, or its
//! text opens with `validation`.

use cartridge_lint_core::docs::{DocType, DOCUMENTATION_DIR};
use cartridge_lint_core::{
    AuditError, ProjectContext, ProjectRule, Severity, SourceFile, VerificationSession,
};

/// Rule code for overview-document.
pub const CODE: &str = "CL106";

/// Rule name for overview-document.
pub const NAME: &str = "overview-document";

/// Requires one document of the overview type.
#[derive(Debug, Clone)]
pub struct OverviewDocument {
    /// Severity level.
    pub severity: Severity,
}

impl Default for OverviewDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl OverviewDocument {
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

impl ProjectRule for OverviewDocument {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Cartridge overview how to quickly ensure that cartridge is installed and working properly should be provided as separate doc"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn needs_documents(&self) -> bool {
        true
    }

    fn check_project(
        &self,
        ctx: &ProjectContext<'_>,
        session: &mut VerificationSession,
    ) -> Result<(), AuditError> {
        let documents = ctx.documents()?.documents();
        let names: Vec<&str> = documents.iter().map(|d| d.name()).collect();
        let listing = names.join("\n");

        let dir = ctx.corpus.root().join(DOCUMENTATION_DIR);
        let mut scope = session.select(SourceFile::with_content(dir, listing));
        if !documents.iter().any(|d| d.doc_type() == DocType::Overview) {
            scope.add(
                format!("no cartridge overview/validation was found among files: {}", names.join(", ")),
                0,
            )?;
        }
        scope.save();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{docx, messages, project, run_project_rule, SFRA_GUIDE};

    #[test]
    fn test_overview_by_name() {
        let dir = project(&[]);
        docx(dir.path(), "int_custom_sfra_guide.docx", SFRA_GUIDE);
        docx(dir.path(), "int_custom_overview.docx", "Quick check");
        let session = run_project_rule(dir.path(), "", OverviewDocument::new()).unwrap();
        assert!(session.is_successful());
        assert_eq!(session.files_checked(), 1);
    }

    #[test]
    fn test_overview_by_content() {
        let dir = project(&[]);
        docx(dir.path(), "int_custom_checks.docx", "Validation of the installation");
        let session = run_project_rule(dir.path(), "", OverviewDocument::new()).unwrap();
        assert!(session.is_successful());
    }

    #[test]
    fn test_missing_overview_lists_documents() {
        let dir = project(&[]);
        docx(dir.path(), "int_custom_sfra_guide.docx", SFRA_GUIDE);
        docx(dir.path(), "int_custom_test_cases.docx", "Test cases");
        let session = run_project_rule(dir.path(), "", OverviewDocument::new()).unwrap();
        assert_eq!(
            messages(&session),
            vec![
                "no cartridge overview/validation was found among files: int_custom_sfra_guide.docx, int_custom_test_cases.docx"
            ]
        );
    }

    #[test]
    fn test_no_documents_is_a_configuration_error() {
        let dir = project(&[]);
        let err = run_project_rule(dir.path(), "", OverviewDocument::new()).unwrap_err();
        assert!(matches!(err, AuditError::Configuration(_)));
    }
}
