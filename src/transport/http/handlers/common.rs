use crate::app::error::RepositoryError;
use crate::domain::material::MaterialId;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::Json;

pub type HandlerError = (StatusCode, Json<ApiResponse>);

pub fn status_for(err: &RepositoryError) -> StatusCode {
    match err {
        RepositoryError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::Transport(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn repository_error(err: RepositoryError) -> HandlerError {
    (status_for(&err), Json(ApiResponse::failure(err.to_string())))
}

/// Parses the `:id` path segment into a document key.
pub fn parse_path_id(raw: &str) -> Result<MaterialId, HandlerError> {
    MaterialId::parse(raw).map_err(|e| repository_error(RepositoryError::from(e)))
}
