use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// Exit status for every failed run (`-1` as seen by the shell).
pub const FAILURE_EXIT_CODE: u8 = 255;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{status} - failed to retrieve {what}: {body}")]
    UnexpectedStatus {
        what: String,
        status: u16,
        body: String,
    },

    #[error("Could not find download_url in {document}")]
    MissingDownloadUrl { document: String },

    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to extract archive: {0}")]
    Archive(#[from] std::io::Error),

    #[error("Refusing to extract archive entry outside target directory: {}", path.display())]
    UnsafeArchiveEntry { path: PathBuf },

    #[error("Failed to load json mappings from file {}: {source}", path.display())]
    SchemaLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse json mappings from file {}: {source}", path.display())]
    SchemaParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Mapping document does not have the expected shape: missing object at '{path}'")]
    SchemaShapeMismatch { path: String },

    #[error("Failed to write mapping file {}: {source}", path.display())]
    SchemaWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Extraction task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ImportError {
    /// Every failure is terminal for the run; there is no partial-success status.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(FAILURE_EXIT_CODE)
    }
}
