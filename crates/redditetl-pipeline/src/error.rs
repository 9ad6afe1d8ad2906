use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the content source.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid extract request: {0}")]
    InvalidRequest(String),

    /// Token exchange or API call rejected the credentials.
    #[error("Reddit authentication failed with status {status}")]
    Auth { status: u16 },

    #[error("subreddit not found: r/{collection}")]
    NotFound { collection: String },

    /// Private, quarantined or banned subreddit.
    #[error("access to r/{collection} forbidden")]
    Forbidden { collection: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Malformed upstream records or a payload that cannot be encoded/decoded.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("post #{index} ({post_id}) is missing required field `{field}`")]
    MissingField {
        index: usize,
        post_id: String,
        field: &'static str,
    },

    #[error("post #{index} ({post_id}) has invalid `{field}`: {reason}")]
    InvalidField {
        index: usize,
        post_id: String,
        field: &'static str,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unexpected CSV header: {found}")]
    UnexpectedHeader { found: String },
}

/// Object storage failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage configuration: {0}")]
    Config(String),

    #[error("invalid object key \"{key}\": {source}")]
    InvalidKey {
        key: String,
        #[source]
        source: object_store::path::Error,
    },

    #[error("failed to write object \"{key}\": {source}")]
    Put {
        key: String,
        #[source]
        source: object_store::Error,
    },
}

/// Any failure that aborts a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("extract failed: {0}")]
    Client(#[from] ClientError),

    #[error("transform failed: {0}")]
    Schema(#[from] SchemaError),

    #[error("load failed: {0}")]
    Storage(#[from] StorageError),

    #[error("failed to write local copy {}: {source}", path.display())]
    LocalCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
