//! Errors raised while loading a document.

use std::path::PathBuf;

use smol_str::SmolStr;
use thiserror::Error;

/// Reasons a document could not be turned into a [`Document`](super::Document).
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text is not valid for the supported YAML subset.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    /// The document has no content.
    #[error("document is empty")]
    Empty,

    /// The top level is a scalar or a sequence.
    #[error("top level of the document at line {line} is not a mapping")]
    NotAMapping { line: u32 },

    /// The top-level mapping names more than one entity.
    #[error("expected a single top-level entity, found `{first}` and `{second}` at line {line}")]
    MultipleEntities {
        line: u32,
        first: SmolStr,
        second: SmolStr,
    },
}

impl LoadError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Line the failure was detected on, when there is one.
    pub fn line(&self) -> Option<u32> {
        match self {
            Self::Syntax { line, .. }
            | Self::NotAMapping { line }
            | Self::MultipleEntities { line, .. } => Some(*line),
            Self::Io { .. } | Self::Empty => None,
        }
    }
}
