use std::path::PathBuf;

use thiserror::Error;

use crate::model::RenderedDocument;

/// Boundary step that failed after the document was built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SinkStage {
    Store,
    IssueUrl,
    Metadata,
}

impl std::fmt::Display for SinkStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SinkStage::Store => "storing the document",
            SinkStage::IssueUrl => "issuing a retrieval URL",
            SinkStage::Metadata => "writing the metadata record",
        })
    }
}

/// Failure reported by a storage, URL or metadata collaborator.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode metadata: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("{0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown report type '{0}' (expected orders, deliveries or stock)")]
    InvalidSchema(String),

    #[error("invalid report request: {0}")]
    InvalidRequest(String),

    #[error("font error: {0}")]
    Font(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse report request: {0}")]
    Json(#[from] serde_json::Error),

    /// The document was rendered but could not be persisted. The document is
    /// handed back so persistence can be retried without rendering again.
    #[error("document built ({} pages) but not persisted: failed while {stage}: {source}", .document.page_count)]
    NotPersisted {
        stage: SinkStage,
        document: Box<RenderedDocument>,
        #[source]
        source: SinkError,
    },

    /// Some reports of a batch were not published. Each failure has already
    /// been logged with its own cause.
    #[error("{failed} of {total} reports were not published")]
    PublishIncomplete { failed: usize, total: usize },
}

impl Error {
    /// True when only persistence failed, so retrying needs no re-render.
    pub fn is_retryable_without_render(&self) -> bool {
        matches!(self, Error::NotPersisted { .. })
    }

    /// Take the built document back out of a persistence failure.
    pub fn into_document(self) -> Option<RenderedDocument> {
        match self {
            Error::NotPersisted { document, .. } => Some(*document),
            _ => None,
        }
    }
}
