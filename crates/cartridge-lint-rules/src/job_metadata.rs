//! Rule to check job metadata shipped with the cartridges.
//!
//! # Configuration
//!
//! - `site_id`: the only site id jobs may target (default: `RefArch`)

use cartridge_lint_core::patterns::{JOB_MODULE_PATH, JOB_SITE_ID};
use cartridge_lint_core::{
    AuditError, FileContext, FileQuery, Rule, RuleConfig, Severity, Violation,
};

/// Rule code for job-metadata.
pub const CODE: &str = "CL019";

/// Rule name for job-metadata.
pub const NAME: &str = "job-metadata";

/// Default site id of job steps.
pub const DEFAULT_SITE_ID: &str = "RefArch";

/// Reports foreign site ids and `.ds` script modules in `jobs.xml`.
#[derive(Debug, Clone)]
pub struct JobMetadata {
    /// Severity level.
    pub severity: Severity,
    /// Expected site id.
    pub site_id: String,
}

impl Default for JobMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl JobMetadata {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            site_id: DEFAULT_SITE_ID.to_string(),
        }
    }

    /// Creates the rule from its `[rules.job-metadata]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        match config.and_then(|c| c.get_str("site_id")) {
            Some(site_id) => Self::new().site_id(site_id),
            None => Self::new(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the expected site id.
    #[must_use]
    pub fn site_id(mut self, site_id: impl Into<String>) -> Self {
        self.site_id = site_id.into();
        self
    }
}

impl Rule for JobMetadata {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Job metadata should target the default site and not refer to .ds files"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        FileQuery::new(".").extensions("jobs.xml")
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let mut violations = Vec::new();
        for caps in JOB_SITE_ID.captures_iter(ctx.content) {
            if let (Some(whole), Some(id)) = (caps.get(0), caps.get(1)) {
                if id.as_str() != self.site_id {
                    violations.push(Violation::new(whole.as_str(), whole.start())?);
                }
            }
        }
        for caps in JOB_MODULE_PATH.captures_iter(ctx.content) {
            if let Some(path) = caps.get(1) {
                if path.as_str().ends_with(".ds") {
                    violations.push(Violation::new(path.as_str(), path.start())?);
                }
            }
        }
        violations.sort_by_key(Violation::offset);
        Ok(violations)
    }
}
