//! Pattern library.
//!
//! Static patterns are compiled once. Patterns that depend on identifiers found
//! earlier in the same file (variable names, class aliases) or on configured
//! version strings are [`Template`]s: their placeholders are replaced by an
//! escaped alternation before compiling.

#![allow(clippy::unwrap_used)]

use lazy_static::lazy_static;
use regex::Regex;

/// Placeholder for discovered identifiers.
pub const VARS: &str = "{vars}";

/// Placeholder for method names.
pub const METHODS: &str = "{methods}";

/// Import prefixes considered valid in `require()` paths.
pub const ALLOWED_IMPORT_PREFIXES: &[&str] = &["*/", "./", "../", "~/", "dw/", "server"];

lazy_static! {
    // scripts
    pub static ref FUNCTION_HEADER: Regex =
        Regex::new(r"\bfunction\s+(\w+)\s*\(|(\w+)\s*[:=]\s*function\b[^(]*\(").unwrap();
    pub static ref ROUTE_REGISTRATION: Regex =
        Regex::new(r#"server\.(get|post|use|prepend|append|replace|extend)\(\W*['"](\w+)"#).unwrap();
    pub static ref REPLACED_ROUTE: Regex =
        Regex::new(r#"server\.replace\(\W*['"](\w+)"#).unwrap();
    pub static ref CONTROLLER_CALL: Regex =
        Regex::new(r#"app\.getController\(['"](\w+)['"]\)"#).unwrap();
    pub static ref TEST_CASE: Regex = Regex::new(r#"\bit\s?\(\W*['"]"#).unwrap();
    pub static ref SUPER_CALL: Regex = Regex::new(r"super\.call\(").unwrap();
    pub static ref REQUIRE_PATH: Regex =
        Regex::new(r#"require\(\s*['"]([^'")]+)['"]\s*\)"#).unwrap();
    pub static ref TODO: Regex = Regex::new(r"TODO.*").unwrap();
    pub static ref SESSION_ALIAS: Regex =
        Regex::new(r"(?i)\b(\w+)\s?=\s?request\.getSession\(\)[^.]").unwrap();
    pub static ref READER_WRITER_BINDING: Regex = Regex::new(
        r"\b(\w+)(\s:\s[A-Za-z]+)?\s?=\s?new\s([A-Za-z.]+)?(Reader|Writer)\("
    )
    .unwrap();
    pub static ref SERVICE_REGISTRY: Regex =
        Regex::new(r"(?im)^.*dw[/.]svc[/.]ServiceRegistry.*$").unwrap();

    // client side
    pub static ref HARDCODED_URL: Regex = Regex::new(r".*https?://.*").unwrap();
    pub static ref COMMENTED_URL: Regex =
        Regex::new(r"(?:^\s*\*.*|.*//.*|/\*\*?).*https?://.*").unwrap();
    pub static ref SIZE_IN_PX: Regex = Regex::new(r".*?(\d{1,5})px").unwrap();
    pub static ref IMPORTANT: Regex = Regex::new(r".*!important.*").unwrap();

    // templates
    pub static ref TAG_START: Regex = Regex::new(r"<\S").unwrap();
    pub static ref HARDCODED_STRING: Regex = Regex::new(r"(?m)^\s*[^$<\s][^<]*").unwrap();
    pub static ref ENCODING_OFF: Regex = Regex::new(r#"encoding\s?=\s?['"]off['"]"#).unwrap();

    // metadata
    pub static ref JOB_SITE_ID: Regex = Regex::new(r#"site-id\s?=\s?"([^"]+)""#).unwrap();
    pub static ref JOB_MODULE_PATH: Regex = Regex::new(
        r#"<parameter name="ExecuteScriptModule\.Module">([\w/.]*)</parameter>"#
    )
    .unwrap();

    // documentation (content is lower-cased with whitespace removed)
    pub static ref TOC_BULLET: Regex = Regex::new(r"([^0-9\s.]\D+)\d").unwrap();
    pub static ref TOC_CUSTOM_CONTROLLER: Regex =
        Regex::new(r"customcode[^)]controller[^)]").unwrap();
    pub static ref ANY_CARTRIDGE_VERSION: Regex =
        Regex::new(r"(?:v|v\.|version)\D*(\d{2}\.\d\.\d)").unwrap();
    pub static ref ANY_SFRA_VERSION: Regex = Regex::new(r"sfra\D*(\d\.\d.\d)").unwrap();
    pub static ref ANY_PLATFORM_VERSION: Regex =
        Regex::new(r"(?:sfcc|salesforce|api|platform)\D*(\d{2}\.\d{1,2})").unwrap();
    pub static ref ANY_SITEGEN_VERSION: Regex =
        Regex::new(r"(?:sitegen|genes|sg)\D{0,25}(\d{3}\.\d{1,2}.\d{1,2})").unwrap();
    pub static ref ANY_COMPATIBILITY_MODE: Regex =
        Regex::new(r"compatibility\D*(\d{2}\.\d{1,2})").unwrap();

    // manifest
    pub static ref STOREFRONT_BASE_PATH: Regex =
        Regex::new(r"^\.\./storefront-reference-architecture/cartridges/app_storefront_base/?$").unwrap();
}

/// `session.custom` / `session.getCustom()` on the session or any alias of it.
pub const SESSION_CUSTOM: Template = Template::new(
    "session-custom",
    r"(?m)^.*?(?:\b(?:{vars}session)|request\.getSession\(\))\.(?:custom\W|getCustom\(\)).*?$",
)
.with_suffix("|");

/// `.close()` called on one of the identifiers.
pub const CLOSED_VARIABLE: Template = Template::new("closed-variable", r"\b({vars})\.close\(\)");

/// Result of one of the methods, called on one of the identifiers, saved to a variable.
pub const METHOD_CALL_SAVED_TO_VAR: Template = Template::new(
    "method-call-saved-to-var",
    r"(\w+)\s?=\s?.*(?:{vars})\.(?:{methods})\b",
);

/// A variable bound to an expression ending in the class name.
///
/// Callers drop matches followed by `.` or `').`, which are method calls on
/// the class rather than aliases of it.
pub const DW_CLASS_VARIABLE: Template =
    Template::new("dw-class-variable", r"(\w+)\s?=\s?.*(?:{vars})");

/// Direct use of the class, e.g. `dw.order.OrderMgr.` or `require('dw/order/OrderMgr').`.
pub const DW_CLASS_DIRECT: Template =
    Template::new("dw-class-direct", r#"((?:{vars})(?:["']\))?)\."#);

/// A configured SFRA version mentioned after "sfra".
pub const SFRA_VERSION: Template = Template::new("sfra-version", r"sfra\D*(?:{vars})");

/// A configured platform version mentioned after a platform keyword.
pub const PLATFORM_VERSION: Template = Template::new(
    "platform-version",
    r"(?:sfcc|salesforce|api|platform)\D*(?:{vars})",
);

/// A configured SiteGenesis version mentioned after a SiteGenesis keyword.
pub const SITEGEN_VERSION: Template =
    Template::new("sitegen-version", r"(?:sitegen|genes|sg)\D{0,25}(?:{vars})");

/// A configured compatibility mode mentioned after "compatibility".
pub const COMPATIBILITY_MODE: Template =
    Template::new("compatibility-mode", r"compatibility\D*(?:{vars})");

/// The configured cartridge version anywhere.
pub const CARTRIDGE_VERSION: Template = Template::new("cartridge-version", r"(?:{vars})");

/// Atom that matches no input.
pub const NEVER: &str = r"[^\s\S]";

/// A regex source with identifier placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    name: &'static str,
    source: &'static str,
    suffix: &'static str,
}

impl Template {
    /// Creates a template.
    #[must_use]
    pub const fn new(name: &'static str, source: &'static str) -> Self {
        Self {
            name,
            source,
            suffix: "",
        }
    }

    /// Appends `suffix` after a non-empty injected alternation.
    #[must_use]
    pub const fn with_suffix(mut self, suffix: &'static str) -> Self {
        self.suffix = suffix;
        self
    }

    /// Template name, for diagnostics.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw template source.
    #[must_use]
    pub fn source(&self) -> &'static str {
        self.source
    }

    /// Fills [`VARS`] with `identifiers` and compiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the filled pattern does not compile.
    pub fn build<S: AsRef<str>>(&self, identifiers: &[S]) -> Result<Regex, regex::Error> {
        self.build_with(&[(VARS, identifiers)])
    }

    /// Fills every `(placeholder, identifiers)` slot and compiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the filled pattern does not compile.
    pub fn build_with<S: AsRef<str>>(&self, slots: &[(&str, &[S])]) -> Result<Regex, regex::Error> {
        let mut pattern = self.source.to_string();
        for (placeholder, identifiers) in slots {
            pattern = pattern.replace(placeholder, &self.inject(identifiers));
        }
        Regex::new(&pattern)
    }

    /// An empty set leaves a suffixed slot empty and fills a bare slot with
    /// [`NEVER`], so the compiled pattern matches nothing the identifiers
    /// would not.
    fn inject<S: AsRef<str>>(&self, identifiers: &[S]) -> String {
        match (identifiers.is_empty(), self.suffix.is_empty()) {
            (true, true) => NEVER.to_string(),
            (true, false) => String::new(),
            (false, _) => format!("{}{}", alternation(identifiers), self.suffix),
        }
    }
}

/// Escapes each identifier and joins them with `|`.
#[must_use]
pub fn alternation<S: AsRef<str>>(identifiers: &[S]) -> String {
    identifiers
        .iter()
        .map(|s| regex::escape(s.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Returns true if `path` starts with one of [`ALLOWED_IMPORT_PREFIXES`].
#[must_use]
pub fn is_allowed_import(path: &str) -> bool {
    ALLOWED_IMPORT_PREFIXES.iter().any(|p| path.starts_with(p))
}
