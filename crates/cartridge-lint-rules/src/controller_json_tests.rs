//! Rule to require integration tests for JSON endpoints.
//!
//! An endpoint returns JSON when its registration body contains `res.json`.
//! The controller `Cart.js` is covered by the file under `test/integration`
//! whose name ends with `Cart.js`, and that file must declare at least one
//! `it(` case per JSON endpoint.

use crate::queries;
use cartridge_lint_core::patterns::TEST_CASE;
use cartridge_lint_core::scope::find_endpoints;
use cartridge_lint_core::{
    AuditError, FileContext, FileQuery, Generation, Rule, Severity, Violation,
};

/// Rule code for controller-json-tests.
pub const CODE: &str = "CL016";

/// Rule name for controller-json-tests.
pub const NAME: &str = "controller-json-tests";

/// Reports SFRA controllers whose JSON endpoints lack integration tests.
#[derive(Debug, Clone)]
pub struct ControllerJsonTests {
    /// Severity level.
    pub severity: Severity,
}

impl Default for ControllerJsonTests {
    fn default() -> Self {
        Self::new()
    }
}

impl ControllerJsonTests {
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

impl Rule for ControllerJsonTests {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Controllers with JSON responses should have integration tests"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::controllers(Generation::Sfra)
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let endpoints = find_endpoints(ctx.content)?;
        let json: Vec<_> = endpoints
            .iter()
            .filter(|e| e.body.contains("res.json"))
            .collect();
        let Some(first) = json.first() else {
            return Ok(Vec::new());
        };
        let names = json.iter().map(|e| e.name).collect::<Vec<_>>().join(", ");
        let name = ctx.file.name();

        let tests = ctx.corpus.files(&queries::integration_tests())?;
        let Some(test) = tests.iter().find(|t| t.name().ends_with(name)) else {
            return Ok(vec![Violation::new(
                format!("no integration test named {name}, endpoints returning json: {names}"),
                first.start,
            )?]);
        };

        let cases = TEST_CASE.find_iter(test.content()?).count();
        if cases < json.len() {
            return Ok(vec![Violation::new(
                format!(
                    "{name} has only {cases} test(s) for {} endpoint(s) returning json: {names}",
                    json.len()
                ),
                first.start,
            )?]);
        }
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{messages, project, run_rule};

    const CONTROLLER: &str = "'use strict';\n\
        var server = require('server');\n\
        server.get('Show', function (req, res, next) {\n    res.render('cart');\n    next();\n});\n\
        server.post('AddProduct', function (req, res, next) {\n    res.json({ ok: true });\n    next();\n});\n\
        server.post('Remove', function (req, res, next) {\n    res.json({ ok: true });\n    next();\n});\n\
        module.exports = server.exports();\n";

    const CART: &str = "cartridges/app_custom_sfra/cartridge/controllers/Cart.js";

    #[test]
    fn test_missing_integration_test() {
        let dir = project(&[(CART, CONTROLLER)]);
        let session = run_rule(dir.path(), ControllerJsonTests::new());
        assert_eq!(
            messages(&session),
            vec!["no integration test named Cart.js, endpoints returning json: AddProduct, Remove"]
        );
    }

    #[test]
    fn test_too_few_test_cases() {
        let dir = project(&[
            (CART, CONTROLLER),
            (
                "test/integration/Cart.js",
                "describe('Cart', function () {\n    it('adds a product', function () {});\n});\n",
            ),
        ]);
        let session = run_rule(dir.path(), ControllerJsonTests::new());
        assert_eq!(
            messages(&session),
            vec!["Cart.js has only 1 test(s) for 2 endpoint(s) returning json: AddProduct, Remove"]
        );
    }

    #[test]
    fn test_enough_test_cases_pass() {
        let dir = project(&[
            (CART, CONTROLLER),
            (
                "test/integration/cart/Cart.js",
                "it('adds', () => {});\nit('removes', () => {});\n",
            ),
        ]);
        assert!(run_rule(dir.path(), ControllerJsonTests::new()).is_successful());
    }

    #[test]
    fn test_sitegenesis_controllers_are_skipped() {
        let dir = project(&[(
            "cartridges/app_custom_controllers/cartridge/controllers/Cart.js",
            CONTROLLER,
        )]);
        let session = run_rule(dir.path(), ControllerJsonTests::new());
        assert_eq!(session.files_checked(), 0);
    }
}
