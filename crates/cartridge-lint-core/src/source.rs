//! Source files with lazily cached content and line index.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// A file of the audited source tree.
///
/// Content is read on first access and cached for the rest of the run, as are
/// the byte offsets of its newline characters.
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    content: OnceCell<String>,
    newlines: OnceCell<Vec<usize>>,
}

impl SourceFile {
    /// Creates a handle for `path` without touching the file system.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            content: OnceCell::new(),
            newlines: OnceCell::new(),
        }
    }

    /// Creates a file whose content is already known (fixtures, extracted text).
    #[must_use]
    pub fn with_content(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        let file = Self::new(path);
        let _ = file.content.set(content.into());
        file
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name without directories, or an empty string for odd paths.
    #[must_use]
    pub fn name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }

    /// Returns the file content, reading it on first call.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read as UTF-8 text.
    pub fn content(&self) -> std::io::Result<&str> {
        if let Some(content) = self.content.get() {
            return Ok(content);
        }
        let text = std::fs::read_to_string(&self.path)?;
        Ok(self.content.get_or_init(|| text))
    }

    /// Sorted byte offsets of every `\n` in the content, computed once.
    ///
    /// # Errors
    ///
    /// Returns an error if the content cannot be read.
    pub fn newline_offsets(&self) -> std::io::Result<&[usize]> {
        if let Some(offsets) = self.newlines.get() {
            return Ok(offsets);
        }
        let offsets = newline_offsets(self.content()?);
        Ok(self.newlines.get_or_init(|| offsets))
    }
}

impl PartialEq for SourceFile {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for SourceFile {}

/// Byte offsets of every `\n` in `text`, ascending.
#[must_use]
pub fn newline_offsets(text: &str) -> Vec<usize> {
    text.bytes()
        .enumerate()
        .filter_map(|(i, b)| (b == b'\n').then_some(i))
        .collect()
}
