use crate::domain::material::MaterialError;
use crate::storage::document::StoreError;
use thiserror::Error;

/// Outcome categories the material facade reports to its callers.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("material {0} not found")]
    NotFound(String),

    #[error("document store failure: {0}")]
    Transport(#[source] StoreError),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<MaterialError> for RepositoryError {
    fn from(err: MaterialError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
