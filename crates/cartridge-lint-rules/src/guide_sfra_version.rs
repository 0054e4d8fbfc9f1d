//! Rule to require the SFRA version on the title page of SFRA guides.

use crate::guides::{alternative, audit_guides};
use cartridge_lint_core::patterns::{ANY_SFRA_VERSION, SFRA_VERSION};
use cartridge_lint_core::{
    AuditError, Generation, ProjectConfig, ProjectContext, ProjectRule, Severity,
    VerificationSession,
};
use tracing::debug;

/// Rule code for guide-sfra-version.
pub const CODE: &str = "CL103";

/// Rule name for guide-sfra-version.
pub const NAME: &str = "guide-sfra-version";

/// Requires SFRA guides to name the supported SFRA version on their title page.
///
/// Projects without SFRA cartridges pass.
#[derive(Debug, Clone)]
pub struct GuideSfraVersion {
    /// Severity level.
    pub severity: Severity,
}

impl Default for GuideSfraVersion {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideSfraVersion {
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

impl ProjectRule for GuideSfraVersion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "SFRA version number should be on a title page of the guide"
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
        if !ctx.has_generation(Generation::Sfra) {
            debug!("No SFRA cartridges, skipping {NAME}");
            return Ok(());
        }
        let version = ProjectConfig::require(&ctx.config.project.sfra_version, "sfra_version")?;
        let pattern = SFRA_VERSION.build(&[version])?;
        let guides = ctx.documents()?.guides(Some(Generation::Sfra))?;

        audit_guides(session, guides, |guide| {
            let page = guide.first_page()?;
            if pattern.is_match(page) {
                return Ok(Vec::new());
            }
            Ok(vec![format!(
                "sfra {version} mentioning was not found on title page of '{}'.{}",
                guide.name(),
                alternative(page, &ANY_SFRA_VERSION)
            )])
        })
    }
}
