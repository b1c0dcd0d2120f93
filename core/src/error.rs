//! Error types for the similarity-graph pipeline.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::DocumentId;

/// Fatal errors raised while loading inputs or configuring a run.
///
/// Degenerate corpora (empty vocabulary, no surviving documents) are not
/// errors; they are reported through [`crate::pipeline::CorpusStatus`].
#[derive(Debug, Error)]
pub enum GraphError {
    /// A required input record is absent.
    #[error("missing input: {what} ({id})")]
    MissingInput {
        /// Kind of record that was expected.
        what: &'static str,
        /// Identifier or path of the offending record.
        id: String,
    },

    /// Two records decode to the same document id.
    #[error("duplicate document id: {0}")]
    DuplicateDocument(DocumentId),

    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GraphError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub(crate) fn missing(what: &'static str, id: impl Into<String>) -> Self {
        Self::MissingInput { what, id: id.into() }
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
