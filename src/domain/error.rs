// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure in a training run maps onto one of these.
// Nothing is retried: the first error aborts the run and is
// propagated up to main(), where anyhow prints the chain.
//
//   Configuration   → unsupported model kind
//   DataUnavailable → dataset store has no local copy to give
//   DataFormat      → a CSV source is not (text, label) shaped
//   everything else → fatal errors from collaborators
//
// Reference: thiserror crate documentation
//            Rust Book §9 (Recoverable Errors with Result)

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("malformed data in '{}': {reason}", path.display())]
    DataFormat { path: PathBuf, reason: String },

    #[error("training failed: {0}")]
    Training(String),

    #[error("tracking error: {0}")]
    Tracking(String),

    #[error("plotting failed: {0}")]
    Plot(String),

    #[error("artifact error: {0}")]
    Artifact(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TrainerError {
    /// Attach a path to a raw I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn data_format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DataFormat { path: path.into(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;
