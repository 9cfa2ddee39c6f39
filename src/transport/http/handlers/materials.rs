use crate::transport::http::handlers::common::{parse_path_id, repository_error, HandlerError};
use crate::transport::http::types::{json_422, ApiResponse, AppState, MaterialPayload};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

type HandlerResult = Result<(StatusCode, Json<ApiResponse>), HandlerError>;

#[utoipa::path(
    get,
    path = "/api/materiales",
    responses(
        (status = 200, description = "All materials, ascending by id", body = ApiResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn list_handler(State(state): State<AppState>) -> HandlerResult {
    let records = state.materials.list().await.map_err(repository_error)?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(json!({
            "count": records.len(),
            "records": records
        }))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/materiales/{id}",
    params(
        ("id" = String, Path, description = "Material id (document key)")
    ),
    responses(
        (status = 200, description = "The material", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 404, description = "No such material", body = ApiResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn get_handler(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let id = parse_path_id(&id)?;
    let record = state.materials.get(&id).await.map_err(repository_error)?;
    Ok((StatusCode::OK, Json(ApiResponse::ok(record.to_json()))))
}

#[utoipa::path(
    post,
    path = "/api/materiales",
    request_body = MaterialPayload,
    responses(
        (status = 201, description = "Material written (created or replaced)", body = ApiResponse),
        (status = 400, description = "Missing or invalid id", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn create_handler(
    State(state): State<AppState>,
    request: Result<Json<MaterialPayload>, JsonRejection>,
) -> HandlerResult {
    let Json(MaterialPayload(body)) =
        request.map_err(|e| json_422(e, "{\"id\": ..., ...fields}"))?;
    let record = state.materials.create(&body).await.map_err(repository_error)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(record.to_json()))))
}

#[utoipa::path(
    patch,
    path = "/api/materiales/{id}",
    params(
        ("id" = String, Path, description = "Material id (document key)")
    ),
    request_body = MaterialPayload,
    responses(
        (status = 200, description = "Fields merged into the material", body = ApiResponse),
        (status = 400, description = "Invalid id or patch", body = ApiResponse),
        (status = 404, description = "No such material", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn update_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    request: Result<Json<MaterialPayload>, JsonRejection>,
) -> HandlerResult {
    let id = parse_path_id(&id)?;
    let Json(MaterialPayload(patch)) = request.map_err(|e| json_422(e, "{...fields}"))?;
    state
        .materials
        .update(&id, &patch)
        .await
        .map_err(repository_error)?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(json!({ "id": id, "updated": true }))),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/materiales/{id}",
    params(
        ("id" = String, Path, description = "Material id (document key)")
    ),
    responses(
        (status = 200, description = "Material absent (deleted or never existed)", body = ApiResponse),
        (status = 400, description = "Invalid id", body = ApiResponse),
        (status = 502, description = "Document store failure", body = ApiResponse)
    )
)]
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult {
    let id = parse_path_id(&id)?;
    state.materials.delete(&id).await.map_err(repository_error)?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::ok(json!({ "id": id, "deleted": true }))),
    ))
}
