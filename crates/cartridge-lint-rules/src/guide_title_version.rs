//! Rule to require the cartridge version on the title page of every guide.

use crate::guides::{alternative, audit_guides};
use cartridge_lint_core::patterns::{ANY_CARTRIDGE_VERSION, CARTRIDGE_VERSION};
use cartridge_lint_core::{
    AuditError, ProjectConfig, ProjectContext, ProjectRule, Severity, VerificationSession,
};

/// Rule code for guide-title-version.
pub const CODE: &str = "CL102";

/// Rule name for guide-title-version.
pub const NAME: &str = "guide-title-version";

/// Requires guides to name the configured cartridge version before the table of contents.
#[derive(Debug, Clone)]
pub struct GuideTitleVersion {
    /// Severity level.
    pub severity: Severity,
}

impl Default for GuideTitleVersion {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideTitleVersion {
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

impl ProjectRule for GuideTitleVersion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Valid cartridge version number should be on a title page of the guide"
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
        let version =
            ProjectConfig::require(&ctx.config.project.cartridge_version, "cartridge_version")?;
        let pattern = CARTRIDGE_VERSION.build(&[version])?;
        let guides = ctx.documents()?.guides(None)?;

        audit_guides(session, guides, |guide| {
            let page = guide.first_page()?;
            if pattern.is_match(page) {
                return Ok(Vec::new());
            }
            Ok(vec![format!(
                "cartridge version {version} wasn't found in guide '{}'.{}",
                guide.name(),
                alternative(page, &ANY_CARTRIDGE_VERSION)
            )])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{docx, messages, project, run_project_rule, SFRA_GUIDE, VERSIONS};

    #[test]
    fn test_version_on_title_page_passes() {
        let dir = project(&[]);
        docx(dir.path(), "int_custom_sfra_guide.docx", SFRA_GUIDE);
        let session = run_project_rule(dir.path(), VERSIONS, GuideTitleVersion::new()).unwrap();
        assert!(session.is_successful());
        assert_eq!(session.files_checked(), 1);
    }

    #[test]
    fn test_other_version_is_shown() {
        let dir = project(&[]);
        docx(
            dir.path(),
            "int_custom_sfra_guide.docx",
            &SFRA_GUIDE.replace("Version 26.1.0", "Version 25.2.0"),
        );
        let session = run_project_rule(dir.path(), VERSIONS, GuideTitleVersion::new()).unwrap();
        assert_eq!(
            messages(&session),
            vec![
                "cartridge version 26.1.0 wasn't found in guide 'int_custom_sfra_guide.docx'. Instead was found: version25.2.0"
            ]
        );
    }

    #[test]
    fn test_guide_without_contents_fails() {
        let dir = project(&[]);
        docx(dir.path(), "int_custom_guide.docx", "Guide 26.1.0 without any index");
        let session = run_project_rule(dir.path(), VERSIONS, GuideTitleVersion::new()).unwrap();
        assert_eq!(messages(&session), vec!["no table of contents found"]);
    }

    #[test]
    fn test_no_guides_is_a_configuration_error() {
        let dir = project(&[]);
        docx(dir.path(), "int_custom_overview.docx", "Overview");
        let err = run_project_rule(dir.path(), VERSIONS, GuideTitleVersion::new()).unwrap_err();
        assert!(matches!(err, AuditError::Configuration(_)));
    }
}
