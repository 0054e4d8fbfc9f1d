//! Rule to prefer relative units over pixels.
//!
//! # Configuration
//!
//! - `max_px`: largest pixel value still allowed (default: 5)

use crate::queries;
use cartridge_lint_core::patterns::SIZE_IN_PX;
use cartridge_lint_core::{
    AuditError, FileContext, FileQuery, Rule, RuleConfig, Severity, Violation,
};

/// Rule code for no-px-sizes.
pub const CODE: &str = "CL009";

/// Rule name for no-px-sizes.
pub const NAME: &str = "no-px-sizes";

/// Default largest allowed pixel value.
pub const DEFAULT_MAX_PX: u32 = 5;

/// Reports pixel sizes above a threshold in stylesheets.
#[derive(Debug, Clone)]
pub struct NoPxSizes {
    /// Severity level.
    pub severity: Severity,
    /// Largest pixel value still allowed.
    pub max_px: u32,
}

impl Default for NoPxSizes {
    fn default() -> Self {
        Self::new()
    }
}

impl NoPxSizes {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
            max_px: DEFAULT_MAX_PX,
        }
    }

    /// Creates the rule from its `[rules.no-px-sizes]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let max_px = config
            .map(|c| c.get_int("max_px", i64::from(DEFAULT_MAX_PX)))
            .and_then(|v| u32::try_from(v).ok())
            .unwrap_or(DEFAULT_MAX_PX);
        Self::new().max_px(max_px)
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the largest allowed pixel value.
    #[must_use]
    pub fn max_px(mut self, max_px: u32) -> Self {
        self.max_px = max_px;
        self
    }
}

impl Rule for NoPxSizes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "em or rems should be used instead of px"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::styles()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let mut violations = Vec::new();
        for caps in SIZE_IN_PX.captures_iter(ctx.content) {
            let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if value.as_str().parse::<u32>().is_ok_and(|px| px > self.max_px) {
                violations.push(Violation::new(whole.as_str(), whole.start())?);
            }
        }
        Ok(violations)
    }
}
