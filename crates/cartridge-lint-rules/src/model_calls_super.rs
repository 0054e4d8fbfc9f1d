//! Rule to require model constructors to extend their base model.
//!
//! # Rationale
//!
//! A model constructor that never calls `super.call(this, ...)` replaces the
//! base model instead of decorating it, dropping every property the base
//! cartridge sets.
//!
//! # Detected Patterns
//!
//! ```ignore
//! function FullProduct(product) {
//!     this.id = product.ID;
//! }
//! ```
//!
//! # Good Patterns
//!
//! ```ignore
//! function FullProduct(product) {
//!     super.call(this, product);
//! }
//! ```

use crate::queries;
use cartridge_lint_core::patterns::SUPER_CALL;
use cartridge_lint_core::scope::find_constructors;
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for model-calls-super.
pub const CODE: &str = "CL015";

/// Rule name for model-calls-super.
pub const NAME: &str = "model-calls-super";

/// Reports model constructors that never call `super.call(`.
#[derive(Debug, Clone)]
pub struct ModelCallsSuper {
    /// Severity level.
    pub severity: Severity,
}

impl Default for ModelCallsSuper {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelCallsSuper {
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

impl Rule for ModelCallsSuper {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Models should extend base models and call their constructors"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::models()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        find_constructors(ctx.content)?
            .into_iter()
            .filter(|c| !SUPER_CALL.is_match(c.body))
            .map(|c| {
                let brace = c.end - c.body.len();
                Violation::new(ctx.content[c.start..brace].trim(), c.start)
            })
            .collect()
    }
}
