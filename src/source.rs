//! Source loading utilities
//!
//! A [`SourceFile`] is a named file reduced to its raw lines. It is created once, before
//! scanning, and every token produced from it borrows it, so it must outlive the tokens
//! and any AST built from them.
//!
//! [`SourceLoader`] is the entry point used by the binary and the tests: it reads a file
//! (or takes a string) and hands back the `SourceFile`.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// A named source file split into lines.
///
/// Lines are split on `'\n'` only, without any trailing-newline normalization: a file
/// ending in a newline has a final empty line, which the scanner skips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    name: String,
    lines: Vec<String>,
}

impl SourceFile {
    /// Build a source file from its name and full text.
    pub fn new(name: impl Into<String>, text: &str) -> Self {
        SourceFile {
            name: name.into(),
            lines: text.split('\n').map(str::to_owned).collect(),
        }
    }

    /// Build a source file from already split lines.
    pub fn from_lines<I, S>(name: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SourceFile {
            name: name.into(),
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Get a line by its 1-indexed line number.
    pub fn line(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Error that can occur when loading sources
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("file \"{}\" not found", path.display())]
    NotFound { path: PathBuf },

    #[error("permission denied for \"{}\"", path.display())]
    PermissionDenied { path: PathBuf },

    #[error("could not read \"{}\": {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoaderError {
    fn from_io(path: &Path, source: std::io::Error) -> Self {
        let path = path.to_path_buf();
        match source.kind() {
            std::io::ErrorKind::NotFound => LoaderError::NotFound { path },
            std::io::ErrorKind::PermissionDenied => LoaderError::PermissionDenied { path },
            _ => LoaderError::Io { path, source },
        }
    }
}

/// Source loader
///
/// ```text
/// let file = SourceLoader::from_path("add.rkt")?.into_source();
/// let file = SourceLoader::from_string("inline", "(+ 1 2)").into_source();
/// ```
pub struct SourceLoader {
    name: String,
    text: String,
}

impl SourceLoader {
    /// Load from a file path. The path, as given, becomes the file name.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| LoaderError::from_io(path, e))?;
        debug!(path = %path.display(), bytes = text.len(), "loaded source");
        Ok(SourceLoader {
            name: path.display().to_string(),
            text,
        })
    }

    /// Load from a string, under the given file name.
    pub fn from_string<N: Into<String>, S: Into<String>>(name: N, text: S) -> Self {
        SourceLoader {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_source(self) -> SourceFile {
        SourceFile::new(self.name, &self.text)
    }
}
