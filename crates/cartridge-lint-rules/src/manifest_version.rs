//! Rule to check the version declared by `package.json`.

use cartridge_lint_core::{
    AuditError, Manifest, ProjectConfig, ProjectContext, ProjectRule, Severity, SourceFile,
    VerificationSession,
};
use std::path::PathBuf;

/// Rule code for manifest-version.
pub const CODE: &str = "CL101";

/// Rule name for manifest-version.
pub const NAME: &str = "manifest-version";

/// Project manifest file name.
pub const MANIFEST: &str = "package.json";

/// Reads the project manifest.
///
/// Returns the manifest as a source file for reporting, plus its parsed form.
pub(crate) fn load_manifest(
    ctx: &ProjectContext<'_>,
) -> Result<(SourceFile, Manifest), AuditError> {
    let path: PathBuf = ctx.corpus.root().join(MANIFEST);
    if !path.is_file() {
        return Err(AuditError::Configuration(format!(
            "no {MANIFEST} found at {}",
            path.display()
        )));
    }
    let manifest = Manifest::from_file(&path)?;
    Ok((SourceFile::new(path), manifest))
}

/// Requires `package.json` to declare the configured cartridge version.
#[derive(Debug, Clone)]
pub struct ManifestVersion {
    /// Severity level.
    pub severity: Severity,
}

impl Default for ManifestVersion {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestVersion {
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

impl ProjectRule for ManifestVersion {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Valid version numbers must be included in the repository's package.json"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check_project(
        &self,
        ctx: &ProjectContext<'_>,
        session: &mut VerificationSession,
    ) -> Result<(), AuditError> {
        let expected =
            ProjectConfig::require(&ctx.config.project.cartridge_version, "cartridge_version")?;
        let (file, manifest) = load_manifest(ctx)?;
        let offset = file.content()?.find("\"version\"").unwrap_or(0);

        let mut scope = session.select(file);
        match manifest.version.as_deref() {
            None => scope.add(format!("version is missing in {MANIFEST}"), 0)?,
            Some(found) if found != expected => scope.add(
                format!("version in {MANIFEST} is {found} while expected {expected}"),
                offset,
            )?,
            Some(_) => {}
        }
        scope.save();
        Ok(())
    }
}
