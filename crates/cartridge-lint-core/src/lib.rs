//! # cartridge-lint-core
//!
//! Core framework for auditing Salesforce B2C Commerce cartridges against
//! certification conventions.
//!
//! This crate provides the foundational traits and types for building
//! audit rules. It includes:
//!
//! - [`Rule`] trait for per-file text rules
//! - [`ProjectRule`] trait for project-wide rules (versions, documentation)
//! - [`Analyzer`] for orchestrating audit execution
//! - [`VerificationSession`] and [`AuditScope`] for collecting violations
//! - text scanners for scripts ([`scope`]) and templates ([`markup`])
//! - the [`patterns`] library and [`docs`] model used by rules
//!
//! ## Example
//!
//! ```ignore
//! use cartridge_lint_core::{Analyzer, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./my-cartridges")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let mut result = analyzer.analyze()?;
//! println!("{}", result.format_test_report(Severity::Error)?);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod corpus;
mod error;
mod rule;
mod session;
mod source;
mod types;

pub mod docs;
pub mod markup;
pub mod patterns;
pub mod scope;

pub use analyzer::{Analyzer, AnalyzerBuilder};
pub use config::{AnalyzerConfig, Config, ConfigError, Manifest, ProjectConfig, RuleConfig};
pub use context::{FileContext, ProjectContext};
pub use corpus::{
    cartridge_of, CartridgeSet, Corpus, FileQuery, Generation, CARTRIDGES_DIR,
    CHANGES_CARTRIDGES, DEFAULT_EXCLUDES,
};
pub use error::{AuditError, ScanError};
pub use rule::{ProjectRule, ProjectRuleBox, Rule, RuleBox};
pub use session::{AuditScope, VerificationSession};
pub use source::SourceFile;
pub use types::{
    beautify_text, row_of, AuditResult, FileAudit, ReportOptions, RuleReport, Severity, Violation,
};
