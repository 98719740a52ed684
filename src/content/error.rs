//! Errors produced while parsing, validating and loading content

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong with a single content file or lookup
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no frontmatter block: file must start with `---` or `+++`")]
    MissingFrontmatter,

    #[error("malformed frontmatter{}: {message}", location(.line, .column))]
    MalformedFrontmatter {
        message: String,
        /// 1-based line in the source file
        line: Option<usize>,
        /// 1-based column
        column: Option<usize>,
    },

    #[error("missing required field `{0}`")]
    MissingRequiredField(String),

    #[error("type mismatch for `{field}`: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("duplicate id `{0}`: more than one file resolves to it")]
    DuplicateId(String),

    #[error("no entry with id `{0}`")]
    NotFound(String),

    #[error("file name is not valid UTF-8: {0:?}")]
    InvalidFileName(PathBuf),

    #[error("failed to read content file: {0}")]
    Io(#[from] std::io::Error),
}

impl ContentError {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        ContentError::MalformedFrontmatter {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub(crate) fn mismatch(field: &str, expected: &'static str) -> Self {
        ContentError::TypeMismatch {
            field: field.to_string(),
            expected,
        }
    }
}

fn location(line: &Option<usize>, column: &Option<usize>) -> String {
    match (line, column) {
        (Some(l), Some(c)) => format!(" at line {}, column {}", l, c),
        (Some(l), None) => format!(" at line {}", l),
        _ => String::new(),
    }
}

/// A file that could not become part of the collection
#[derive(Debug)]
pub struct LoadFailure {
    /// Id the file would have had
    pub id: String,
    /// Source file path
    pub path: PathBuf,
    pub error: ContentError,
}

impl LoadFailure {
    pub fn is_duplicate(&self) -> bool {
        matches!(self.error, ContentError::DuplicateId(_))
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.id, self.path.display(), self.error)
    }
}

/// All failures of a strict load, reported together
#[derive(Debug)]
pub struct LoadErrors {
    pub failures: Vec<LoadFailure>,
}

impl std::error::Error for LoadErrors {}

impl fmt::Display for LoadErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} content file(s) failed to load:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, "\n  - {}", failure)?;
        }
        Ok(())
    }
}
