//! Error taxonomy for audit runs.
//!
//! Rule violations are never errors: they are collected into
//! [`VerificationSession`](crate::VerificationSession)s. Everything here aborts
//! the run.

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of one of the text scanners on malformed source.
///
/// Carries no path; the analyzer attaches the file being scanned via
/// [`AuditError::in_file`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// An opening delimiter was never closed before end of text.
    #[error("unterminated `{open}` opened at offset {offset}")]
    UnterminatedScope {
        /// The opening delimiter.
        open: char,
        /// Offset of the opening delimiter.
        offset: usize,
    },

    /// A markup tag has no closing `>`.
    #[error("unterminated tag starting at offset {offset}")]
    UnterminatedTag {
        /// Offset of the tag name.
        offset: usize,
    },

    /// None of the expected closing sequences occur after the cursor.
    #[error("none of `{targets}` found after offset {offset}")]
    MissingSequence {
        /// Pipe-joined list of expected sequences.
        targets: String,
        /// Cursor where the search started.
        offset: usize,
    },
}

/// Errors that abort an audit run.
#[derive(Debug, Error, Diagnostic)]
pub enum AuditError {
    /// Missing or inconsistent configuration / manifest data.
    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(cartridge_lint::configuration),
        help("check cartridge-lint.toml and the project's package.json")
    )]
    Configuration(String),

    /// Unterminated markup or scope in a scanned file.
    #[error("Malformed input in {}: {source}", path.display())]
    #[diagnostic(code(cartridge_lint::malformed_input))]
    MalformedInput {
        /// File being scanned.
        path: PathBuf,
        /// What the scanner could not find.
        source: ScanError,
    },

    /// Scanner failure not yet attributed to a file.
    #[error("Malformed input: {0}")]
    #[diagnostic(code(cartridge_lint::malformed_input))]
    Scan(#[from] ScanError),

    /// Contract violation by the caller, e.g. an empty violation text.
    #[error("Invalid argument: {0}")]
    #[diagnostic(code(cartridge_lint::invalid_argument))]
    InvalidArgument(String),

    /// IO error reading the source tree.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    /// A built pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Invalid exclude pattern.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// A documentation archive could not be read.
    #[error("Failed to read archive {}: {source}", path.display())]
    Archive {
        /// Archive path.
        path: PathBuf,
        /// Underlying zip error.
        source: zip::result::ZipError,
    },

    /// The project manifest is not valid JSON.
    #[error("Failed to parse {}: {source}", path.display())]
    Json {
        /// Manifest path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// A document lacks a structure a rule cannot do without.
    #[error("Malformed document: {0}")]
    #[diagnostic(code(cartridge_lint::malformed_document))]
    Document(#[from] crate::docs::DocumentError),

    /// A background extraction task panicked or was cancelled.
    #[error("Extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// Configuration file error.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

impl AuditError {
    /// Attributes an unattributed scanner failure to `path`.
    #[must_use]
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            Self::Scan(source) => Self::MalformedInput {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_file_attaches_path_to_scan_errors() {
        let err = AuditError::from(ScanError::UnterminatedTag { offset: 4 });
        let err = err.in_file(Path::new("cartridges/app/templates/a.isml"));
        assert!(matches!(err, AuditError::MalformedInput { .. }));
        assert!(err.to_string().contains("a.isml"));
        assert!(err.to_string().contains("offset 4"));
    }

    #[test]
    fn in_file_keeps_other_errors() {
        let err = AuditError::Configuration("no guides".into()).in_file(Path::new("x"));
        assert!(matches!(err, AuditError::Configuration(_)));
    }
}
