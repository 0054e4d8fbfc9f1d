//! Rule to check where the project builds its base cartridge from.
//!
//! When `package.json` declares `paths.base`, it must lead to the sibling
//! checkout `../storefront-reference-architecture/cartridges/app_storefront_base`.

use crate::manifest_version::{load_manifest, MANIFEST};
use cartridge_lint_core::patterns::STOREFRONT_BASE_PATH;
use cartridge_lint_core::{
    AuditError, ProjectContext, ProjectRule, Severity, VerificationSession,
};
use tracing::debug;

/// Rule code for repo-layout.
pub const CODE: &str = "CL107";

/// Rule name for repo-layout.
pub const NAME: &str = "repo-layout";

/// Checks `paths.base` of `package.json`.
#[derive(Debug, Clone)]
pub struct RepoLayout {
    /// Severity level.
    pub severity: Severity,
}

impl Default for RepoLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl RepoLayout {
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

impl ProjectRule for RepoLayout {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "\"base\" path inside package.json should lead to sibling folder ../storefront-reference-architecture/cartridges/app_storefront_base/"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check_project(
        &self,
        ctx: &ProjectContext<'_>,
        session: &mut VerificationSession,
    ) -> Result<(), AuditError> {
        let (file, manifest) = load_manifest(ctx)?;
        let Some(paths) = manifest.paths else {
            debug!("{MANIFEST} declares no paths");
            return Ok(());
        };
        let base = paths.get("base").map_or("", String::as_str);
        if STOREFRONT_BASE_PATH.is_match(base) {
            return Ok(());
        }

        let offset = if base.is_empty() {
            0
        } else {
            file.content()?.find(base).unwrap_or(0)
        };
        let mut scope = session.select(file);
        scope.add(format!("paths.base is \"{base}\""), offset)?;
        scope.save();
        Ok(())
    }
}
