//! Context types for rule execution.

use crate::config::Config;
use crate::corpus::{cartridge_of, Corpus, Generation};
use crate::docs::DocumentSet;
use crate::error::AuditError;
use crate::source::SourceFile;

/// Context provided to per-file rules.
///
/// Holds the file being checked plus read access to the rest of the corpus,
/// for rules that pair a file with its tests.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    /// The file being checked.
    pub file: &'a SourceFile,
    /// File contents.
    pub content: &'a str,
    /// The corpus the file belongs to.
    pub corpus: &'a Corpus,
    /// Active configuration.
    pub config: &'a Config,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(file: &'a SourceFile, content: &'a str, corpus: &'a Corpus, config: &'a Config) -> Self {
        Self {
            file,
            content,
            corpus,
            config,
        }
    }

    /// Path relative to the project root, `/`-separated.
    #[must_use]
    pub fn relative_path(&self) -> String {
        self.corpus.relative(self.file.path())
    }

    /// Name of the cartridge holding the file, if it lives under `cartridges/`.
    #[must_use]
    pub fn cartridge(&self) -> Option<String> {
        cartridge_of(&self.relative_path()).map(String::from)
    }

    /// Storefront generation of the file's cartridge.
    #[must_use]
    pub fn generation(&self) -> Option<Generation> {
        self.cartridge().map(|c| Generation::classify(&c))
    }
}

/// Context provided to project-wide rules.
#[derive(Debug, Clone, Copy)]
pub struct ProjectContext<'a> {
    /// The audited project.
    pub corpus: &'a Corpus,
    /// Active configuration.
    pub config: &'a Config,
    documents: Option<&'a DocumentSet>,
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(corpus: &'a Corpus, config: &'a Config) -> Self {
        Self {
            corpus,
            config,
            documents: None,
        }
    }

    /// Attaches loaded documentation.
    #[must_use]
    pub fn with_documents(mut self, documents: &'a DocumentSet) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Loaded documentation.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::Configuration`] if no documentation was loaded,
    /// which means the rule did not declare it needs documents.
    pub fn documents(&self) -> Result<&'a DocumentSet, AuditError> {
        self.documents.ok_or_else(|| {
            AuditError::Configuration("documentation was not loaded for this run".into())
        })
    }

    /// True if the project has cartridges of `generation`.
    #[must_use]
    pub fn has_generation(&self, generation: Generation) -> bool {
        !self.corpus.cartridges().names(generation).is_empty()
    }
}
