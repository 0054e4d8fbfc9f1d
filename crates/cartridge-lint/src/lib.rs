//! # cartridge-lint
//!
//! Certification auditor for Salesforce B2C Commerce cartridge repositories.
//!
//! This is the main facade crate that re-exports core functionality and rules.
//!
//! ## Quick Start: `cargo test` Integration
//!
//! ```toml
//! [dev-dependencies]
//! cartridge-lint = "0.4"
//! ```
//!
//! ```rust,ignore
//! // tests/certification.rs
//! cartridge_lint::check!();
//! ```
//!
//! This runs the audit as part of `cargo test`. Configure via `cartridge-lint.toml`:
//!
//! ```rust,ignore
//! cartridge_lint::check!(preset = "strict", fail_on = "warning");
//! ```
//!
//! ## Programmatic Usage
//!
//! ```rust,ignore
//! use cartridge_lint::Analyzer;
//! use cartridge_lint::rules::Preset;
//!
//! let config = cartridge_lint::Config::from_file("cartridge-lint.toml".as_ref())?;
//! let mut builder = Analyzer::builder().root("./storefront");
//! for rule in Preset::Strict.rules(&config) {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.config(config).build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]

pub use cartridge_lint_core::*;

/// Built-in rules and presets.
pub mod rules {
    pub use cartridge_lint_rules::*;
}

mod runner;

#[doc(hidden)]
pub mod __internal {
    pub use crate::runner::{run_check, CheckArgs};
}

/// Generates a `#[test]` that audits the project and fails on violations.
///
/// Accepts `preset`, `config` and `fail_on`, each a string literal. Anything
/// left out comes from `cartridge-lint.toml`, then the defaults
/// (`recommended`, `error`).
#[macro_export]
macro_rules! check {
    ($($key:ident = $value:expr),* $(,)?) => {
        #[test]
        fn cartridge_lint_check() {
            #[allow(unused_mut)]
            let mut args = $crate::__internal::CheckArgs::default();
            $( args.$key = Some($value); )*
            $crate::__internal::run_check(&args);
        }
    };
}
