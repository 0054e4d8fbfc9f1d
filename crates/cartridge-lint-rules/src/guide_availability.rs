//! Rule to require guides to explain what happens when the service is down.
//!
//! # Configuration
//!
//! - `min_length`: characters the availability section must exceed (default: 100).
//!   Lengths count the normalized text, without whitespace.

use crate::guides::audit_guides;
use cartridge_lint_core::{
    AuditError, ProjectContext, ProjectRule, RuleConfig, Severity, VerificationSession,
};

/// Rule code for guide-availability.
pub const CODE: &str = "CL105";

/// Rule name for guide-availability.
pub const NAME: &str = "guide-availability";

/// Default length the availability section must exceed.
pub const DEFAULT_MIN_LENGTH: usize = 100;

/// Requires a substantial availability section in every guide.
#[derive(Debug, Clone)]
pub struct GuideAvailability {
    /// Severity level.
    pub severity: Severity,
    /// Length the section must exceed.
    pub min_length: usize,
}

impl Default for GuideAvailability {
    fn default() -> Self {
        Self::new()
    }
}

impl GuideAvailability {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            min_length: DEFAULT_MIN_LENGTH,
        }
    }

    /// Creates the rule from its `[rules.guide-availability]` table.
    #[must_use]
    pub fn from_config(config: Option<&RuleConfig>) -> Self {
        let min_length = config
            .map(|c| c.get_int("min_length", 0))
            .and_then(|v| usize::try_from(v).ok())
            .filter(|&v| v > 0)
            .unwrap_or(DEFAULT_MIN_LENGTH);
        Self::new().min_length(min_length)
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the length the section must exceed.
    #[must_use]
    pub fn min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }
}

impl ProjectRule for GuideAvailability {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Availability section should describe what merchants should expect when the partner's service is down"
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
        let guides = ctx.documents()?.guides(None)?;
        audit_guides(session, guides, |guide| {
            let section = guide.section("availability")?;
            if section.chars().count() > self.min_length {
                return Ok(Vec::new());
            }
            Ok(vec![format!(
                "provide an explanation of at least {} symbols of the situation when the service is down in '{}'. Current content: {section}",
                self.min_length,
                guide.name()
            )])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{docx, messages, project, run_project_rule, SFRA_GUIDE};

    #[test]
    fn test_long_section_passes() {
        let dir = project(&[]);
        docx(dir.path(), "int_custom_sfra_guide.docx", SFRA_GUIDE);
        let session = run_project_rule(dir.path(), "", GuideAvailability::new()).unwrap();
        assert!(session.is_successful());
    }

    #[test]
    fn test_short_section_fails() {
        let dir = project(&[]);
        let text = SFRA_GUIDE
            .split("Availability If")
            .next()
            .unwrap()
            .to_string()
            + "Availability Nothing changes.";
        docx(dir.path(), "int_custom_sfra_guide.docx", &text);
        let session = run_project_rule(dir.path(), "", GuideAvailability::new()).unwrap();
        assert_eq!(
            messages(&session),
            vec![
                "provide an explanation of at least 100 symbols of the situation when the service is down in 'int_custom_sfra_guide.docx'. Current content: nothingchanges."
            ]
        );
    }

    #[test]
    fn test_min_length_option() {
        let config = cartridge_lint_core::Config::parse(
            "[rules.guide-availability]\nmin_length = 500\n",
        )
        .unwrap();
        assert_eq!(
            GuideAvailability::from_config(config.rule(NAME)).min_length,
            500
        );
        assert_eq!(GuideAvailability::from_config(None).min_length, 100);

        let dir = project(&[]);
        docx(dir.path(), "int_custom_sfra_guide.docx", SFRA_GUIDE);
        let session =
            run_project_rule(dir.path(), "", GuideAvailability::new().min_length(500)).unwrap();
        assert!(!session.is_successful());
    }
}
