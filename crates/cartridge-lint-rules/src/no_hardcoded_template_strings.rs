//! Rule to require template text to come from resource bundles.
//!
//! # Detected Patterns
//!
//! Literal text between tags, e.g. `<p>Free shipping</p>`. Text inside
//! `<isscript>`, `<script>` and `<iscomment>` bodies is skipped, as are
//! `${...}` expressions.
//!
//! # Good Patterns
//!
//! ```ignore
//! <p>${Resource.msg('label.shipping.free', 'cart', null)}</p>
//! ```

use crate::queries;
use cartridge_lint_core::markup::hardcoded_strings;
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for no-hardcoded-template-strings.
pub const CODE: &str = "CL011";

/// Rule name for no-hardcoded-template-strings.
pub const NAME: &str = "no-hardcoded-template-strings";

/// Forbids literal text in templates.
#[derive(Debug, Clone)]
pub struct NoHardcodedTemplateStrings {
    /// Severity level.
    pub severity: Severity,
}

impl Default for NoHardcodedTemplateStrings {
    fn default() -> Self {
        Self::new()
    }
}

impl NoHardcodedTemplateStrings {
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

impl Rule for NoHardcodedTemplateStrings {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Hardcoded strings should be in a .properties file"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::templates()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        hardcoded_strings(ctx.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_code, project, run_rule, texts};
    use cartridge_lint_core::ReportOptions;

    const TEMPLATE: &str = "<div>\n    <h2>Free shipping</h2>\n    <p>${Resource.msg('a', 'b', null)}</p>\n    <isscript>var label = 'not text';</isscript>\n</div>";

    #[test]
    fn test_detects_text_between_tags() {
        let violations = check_code(
            &NoHardcodedTemplateStrings::new(),
            "cartridges/app_custom_sfra/cartridge/templates/default/cart.isml",
            TEMPLATE,
        );
        assert_eq!(texts(&violations), vec!["Free shipping"]);
    }

    #[test]
    fn test_report_lists_rows() {
        let dir = project(&[(
            "cartridges/app_custom_sfra/cartridge/templates/default/cart.isml",
            TEMPLATE,
        )]);
        let mut session = run_rule(dir.path(), NoHardcodedTemplateStrings::new())
            .with_options(ReportOptions::default());
        let report = session.report().unwrap();
        assert!(report.starts_with("Hardcoded strings should be in a .properties file:\n"));
        assert!(report.contains("cart.isml"));
        assert!(report.contains("   row 2: Free shipping"));
    }

    #[test]
    fn test_unterminated_tag_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let corpus = cartridge_lint_core::Corpus::open(dir.path(), true, &[]).unwrap();
        let config = cartridge_lint_core::Config::default();
        let file = cartridge_lint_core::SourceFile::with_content("a.isml", "<div class=\"x\"");
        let ctx = FileContext::new(&file, "<div class=\"x\"", &corpus, &config);
        assert!(NoHardcodedTemplateStrings::new().check(&ctx).is_err());
    }
}
