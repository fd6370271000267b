//! Error types for schema parsing and schema fetching.

use thiserror::Error;

/// Errors while interpreting a profile document as a form schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema has no \"properties\" member")]
    MissingProperties,

    #[error("schema \"properties\" must be an object, got {actual}")]
    InvalidProperties { actual: String },

    #[error("property \"{name}\" must be described by an object, got {actual}")]
    InvalidDescriptor { name: String, actual: String },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },
}

impl SchemaError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while resolving a resource's schema over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    // IO errors (exit code 3)
    #[error("failed to fetch {url}: {message}")]
    Network { url: String, message: String },

    #[cfg(feature = "remote")]
    #[error("failed to build HTTP client: {source}")]
    Client {
        #[source]
        source: reqwest::Error,
    },

    // Document errors (exit code 2)
    #[error("invalid JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource {url} has no profile link")]
    MissingProfileLink { url: String },

    #[error("invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl FetchError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            FetchError::Network { .. } => 3,
            #[cfg(feature = "remote")]
            FetchError::Client { .. } => 3,
            FetchError::Schema(e) => e.exit_code(),
            _ => 2,
        }
    }
}
