//! Rule to require seekable iterators to be closed.
//!
//! # Rationale
//!
//! Query methods of the platform managers return `SeekableIterator`s that
//! hold database cursors until closed. Forgetting `close()` exhausts the
//! cursor pool under load.
//!
//! # Detected Patterns
//!
//! For every catalog class used in a file, through an alias
//! (`var OrderMgr = require('dw/order/OrderMgr')`) or directly
//! (`dw.order.OrderMgr.searchOrders`), each `x = <class>.<method>(...)`
//! must be followed by `x.close()` in the enclosing function, or anywhere in
//! the file for top-level code.

use crate::queries;
use cartridge_lint_core::patterns::{
    CLOSED_VARIABLE, DW_CLASS_DIRECT, DW_CLASS_VARIABLE, METHODS, METHOD_CALL_SAVED_TO_VAR, VARS,
};
use cartridge_lint_core::scope::{enclosing_function, find_functions, FunctionScope};
use cartridge_lint_core::{AuditError, FileContext, FileQuery, Rule, Severity, Violation};

/// Rule code for close-seekable-iterators.
pub const CODE: &str = "CL005";

/// Rule name for close-seekable-iterators.
pub const NAME: &str = "close-seekable-iterators";

/// Manager classes and their methods returning a seekable iterator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeekableIteratorCatalog {
    classes: Vec<(String, Vec<String>)>,
}

impl Default for SeekableIteratorCatalog {
    fn default() -> Self {
        Self::empty()
            .with_class("CustomerMgr", &["queryProfiles", "searchProfiles"])
            .with_class("OrderMgr", &["queryOrders", "searchOrders"])
            .with_class(
                "ProductMgr",
                &[
                    "queryAllSiteProducts",
                    "queryProductsInCatalog",
                    "queryAllSiteProductsSorted",
                    "queryProductsInCatalogSorted",
                ],
            )
            .with_class("ProductListMgr", &["queryProductLists"])
            .with_class("SystemObjectMgr", &["querySystemObjects", "getAllSystemObjects"])
            .with_class("CustomObjectMgr", &["queryCustomObjects", "getAllCustomObjects"])
    }
}

impl SeekableIteratorCatalog {
    /// A catalog with no classes.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            classes: Vec::new(),
        }
    }

    /// Adds `class` with the `methods` returning an iterator.
    #[must_use]
    pub fn with_class(mut self, class: &str, methods: &[&str]) -> Self {
        self.classes.push((
            class.to_string(),
            methods.iter().map(|m| (*m).to_string()).collect(),
        ));
        self
    }

    /// `(class, methods)` pairs in insertion order.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.classes.iter().map(|(c, m)| (c.as_str(), m.as_slice()))
    }
}

/// Requires `close()` on every seekable iterator saved to a variable.
#[derive(Debug, Clone)]
pub struct CloseSeekableIterators {
    /// Severity level.
    pub severity: Severity,
    catalog: SeekableIteratorCatalog,
}

impl Default for CloseSeekableIterators {
    fn default() -> Self {
        Self::new()
    }
}

impl CloseSeekableIterators {
    /// Creates a new rule with the platform catalog.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            catalog: SeekableIteratorCatalog::default(),
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Replaces the catalog.
    #[must_use]
    pub fn catalog(mut self, catalog: SeekableIteratorCatalog) -> Self {
        self.catalog = catalog;
        self
    }
}

/// Names the class is reachable through in `text`.
fn class_aliases(text: &str, class: &str) -> Result<Vec<String>, AuditError> {
    let mut aliases: Vec<String> = Vec::new();
    let mut push = |alias: &str| {
        if !aliases.iter().any(|a| a == alias) {
            aliases.push(alias.to_string());
        }
    };

    for caps in DW_CLASS_VARIABLE.build(&[class])?.captures_iter(text) {
        let (Some(whole), Some(alias)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let rest = &text[whole.end()..];
        let is_call =
            rest.starts_with('.') || rest.starts_with("').") || rest.starts_with("\").");
        if !is_call {
            push(alias.as_str());
        }
    }
    for caps in DW_CLASS_DIRECT.build(&[class])?.captures_iter(text) {
        if let Some(direct) = caps.get(1) {
            push(direct.as_str());
        }
    }
    Ok(aliases)
}

impl Rule for CloseSeekableIterators {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "All SeekableIterators should be explicitly closed"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn query(&self) -> FileQuery {
        queries::server_scripts()
    }

    fn check(&self, ctx: &FileContext<'_>) -> Result<Vec<Violation>, AuditError> {
        let text = ctx.content;
        let mut functions: Option<Vec<FunctionScope<'_>>> = None;
        let mut violations = Vec::new();

        for (class, methods) in self.catalog.classes() {
            let aliases = class_aliases(text, class)?;
            if aliases.is_empty() {
                continue;
            }
            let calls = METHOD_CALL_SAVED_TO_VAR
                .build_with(&[(VARS, aliases.as_slice()), (METHODS, methods)])?;
            for caps in calls.captures_iter(text) {
                let (Some(call), Some(var)) = (caps.get(0), caps.get(1)) else {
                    continue;
                };
                if functions.is_none() {
                    functions = Some(find_functions(text)?);
                }
                let scope = functions
                    .as_deref()
                    .and_then(|f| enclosing_function(f, call.start()))
                    .map_or(text, |f| f.body);
                if !CLOSED_VARIABLE.build(&[var.as_str()])?.is_match(scope) {
                    violations.push(Violation::new(call.as_str(), call.start())?);
                }
            }
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{check_code, texts};

    fn check(code: &str) -> Vec<Violation> {
        check_code(
            &CloseSeekableIterators::new(),
            "cartridges/int_custom/cartridge/scripts/jobs/export.js",
            code,
        )
    }

    #[test]
    fn test_detects_unclosed_alias_call() {
        let violations = check(
            r"var OrderMgr = require('dw/order/OrderMgr');

function exportOrders() {
    var orders = OrderMgr.searchOrders('status={0}', null, 3);
    while (orders.hasNext()) {
        write(orders.next());
    }
}
",
        );
        assert_eq!(
            texts(&violations),
            vec!["orders = OrderMgr.searchOrders"]
        );
    }

    #[test]
    fn test_close_must_be_in_enclosing_function() {
        let violations = check(
            r"var ProductMgr = require('dw/catalog/ProductMgr');

function first() {
    var products = ProductMgr.queryAllSiteProducts();
    products.close();
}

function second() {
    var products = ProductMgr.queryAllSiteProducts();
}
",
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].offset() > 100);
    }

    #[test]
    fn test_detects_direct_class_usage() {
        let violations = check(
            r"function run() {
    var profiles = require('dw/customer/CustomerMgr').searchProfiles(q, null);
    return profiles.count;
}
",
        );
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_top_level_calls_use_whole_file() {
        let violations = check(
            r"var CustomObjectMgr = require('dw/object/CustomObjectMgr');
var all = CustomObjectMgr.getAllCustomObjects('Log');
all.close();
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_ignores_non_iterator_methods() {
        let violations = check(
            r"var OrderMgr = require('dw/order/OrderMgr');
function get(id) {
    var order = OrderMgr.getOrder(id);
    return order;
}
",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_injected_catalog() {
        let catalog =
            SeekableIteratorCatalog::empty().with_class("StoreMgr", &["searchStoresByCoordinates"]);
        let rule = CloseSeekableIterators::new().catalog(catalog);
        let violations = check_code(
            &rule,
            "cartridges/int_custom/cartridge/scripts/a.js",
            "var StoreMgr = require('dw/catalog/StoreMgr');\nvar s = StoreMgr.searchStoresByCoordinates(1, 2);\n",
        );
        assert_eq!(violations.len(), 1);
    }
}
