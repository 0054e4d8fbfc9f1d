//! Rule traits for defining audit rules.

use crate::context::{FileContext, ProjectContext};
use crate::corpus::FileQuery;
use crate::error::AuditError;
use crate::session::VerificationSession;
use crate::types::{Severity, Violation};

/// A per-file audit rule over raw text.
///
/// The analyzer selects the files named by [`query`](Rule::query), reads
/// each one and hands it to [`check`](Rule::check). Violations are offsets
/// into the text; rows are resolved when the report is printed.
///
/// # Example
///
/// ```ignore
/// use cartridge_lint_core::{FileContext, FileQuery, Rule, Violation, AuditError};
///
/// pub struct NoDebugger;
///
/// impl Rule for NoDebugger {
///     fn name(&self) -> &'static str { "no-debugger" }
///     fn code(&self) -> &'static str { "XX001" }
///     fn query(&self) -> FileQuery { FileQuery::cartridges().extensions(".js") }
///
///     fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
///         ctx.content
///             .match_indices("debugger;")
///             .map(|(i, m)| Violation::new(m, i))
///             .collect()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "no-todo").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CL002").
    fn code(&self) -> &'static str;

    /// Returns a brief description, used as the issue header of reports.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Files this rule looks at.
    fn query(&self) -> FileQuery;

    /// Checks a single file and returns any violations found.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be scanned; this aborts the run.
    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

/// A project-wide audit rule: versions, manifests and documentation.
///
/// Project rules select and record files on the session themselves, since
/// what they report on is often not a source file.
pub trait ProjectRule: Send + Sync {
    /// Returns the kebab-case name of this rule.
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CL100").
    fn code(&self) -> &'static str;

    /// Returns a brief description, used as the issue header of reports.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Whether the documentation must be loaded before this rule runs.
    fn needs_documents(&self) -> bool {
        false
    }

    /// Checks the project, recording audits on `session`.
    ///
    /// # Errors
    ///
    /// Returns an error on missing configuration or unreadable input.
    fn check_project(
        &self,
        ctx: &ProjectContext<'_>,
        session: &mut VerificationSession,
    ) -> Result<(), AuditError>;
}

/// Type alias for boxed `ProjectRule` trait objects.
pub type ProjectRuleBox = Box<dyn ProjectRule>;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn query(&self) -> FileQuery {
            FileQuery::cartridges().extensions(".js")
        }

        fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
            Ok(vec![Violation::new(ctx.content, 0)?])
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Error);
        assert_eq!(rule.query(), FileQuery::cartridges().extensions(".js"));
    }
}
