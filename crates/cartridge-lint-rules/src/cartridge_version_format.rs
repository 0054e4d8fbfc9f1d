//! Rule to check the format of the configured cartridge version.
//!
//! Versions are `YY.N.B`: the two-digit year of the release, the partner's
//! release number within that year (from 1), and a bugfix number.

use cartridge_lint_core::{
    AuditError, ProjectConfig, ProjectContext, ProjectRule, Severity, SourceFile,
    VerificationSession,
};
use chrono::Datelike;

/// Rule code for cartridge-version-format.
pub const CODE: &str = "CL100";

/// Rule name for cartridge-version-format.
pub const NAME: &str = "cartridge-version-format";

/// Checks `project.cartridge_version` against the current year.
#[derive(Debug, Clone)]
pub struct CartridgeVersionFormat {
    /// Severity level.
    pub severity: Severity,
    /// Full year to check against; the current year if unset.
    pub year: Option<i32>,
}

impl Default for CartridgeVersionFormat {
    fn default() -> Self {
        Self::new()
    }
}

impl CartridgeVersionFormat {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            year: None,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Pins the release year.
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    fn short_year(&self) -> i32 {
        self.year.unwrap_or_else(|| chrono::Local::now().year()) - 2000
    }

    /// Problems with `version`, each with its offset.
    fn problems(&self, version: &str) -> Vec<(String, usize)> {
        let parts: Vec<&str> = version.split('.').collect();
        let numbers: Vec<u32> = parts.iter().filter_map(|p| p.parse().ok()).collect();
        if parts.len() != 3 || numbers.len() != 3 {
            return vec![(
                format!("version {version} is expected to be in YY.N.N format"),
                0,
            )];
        }

        let mut problems = Vec::new();
        let year = self.short_year();
        if i64::from(numbers[0]) != i64::from(year) {
            problems.push((
                format!(
                    "version {version} should start with the current year {year}, even if certification was submitted in the previous one"
                ),
                0,
            ));
        }
        if numbers[1] == 0 {
            problems.push((
                format!("partner version of the year in {version} should be at least 1"),
                parts[0].len() + 1,
            ));
        }
        problems
    }
}

impl ProjectRule for CartridgeVersionFormat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Version numbers must be in YY.N.N [year].[partner version of the year].[bugfix] format"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn check_project(
        &self,
        ctx: &ProjectContext<'_>,
        session: &mut VerificationSession,
    ) -> Result<(), AuditError> {
        let version =
            ProjectConfig::require(&ctx.config.project.cartridge_version, "cartridge_version")?;
        let file = SourceFile::with_content(
            ctx.corpus.root().join("project.cartridge_version"),
            version,
        );
        let mut scope = session.select(file);
        for (text, offset) in self.problems(version) {
            scope.add(text, offset)?;
        }
        scope.save();
        Ok(())
    }
}
