use thiserror::Error;

/// Failures at the document-store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document {collection}/{key} not found")]
    NotFound { collection: String, key: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("could not decode stored document: {0}")]
    Decode(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn not_found(collection: &str, key: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}
