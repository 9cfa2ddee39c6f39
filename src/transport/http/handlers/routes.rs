use crate::routing::history::fragment_path;
use crate::routing::{hash_href, Resolution};
use crate::transport::http::types::{ApiResponse, AppState, ResolveQuery};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

#[utoipa::path(
    get,
    path = "/api/routes",
    responses(
        (status = 200, description = "The static route table", body = ApiResponse)
    )
)]
pub async fn list_routes_handler(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse>) {
    let routes: Vec<_> = state
        .routes
        .routes()
        .iter()
        .map(|r| {
            json!({
                "route": r,
                "href": hash_href(&state.base_url, &r.path)
            })
        })
        .collect();
    (
        StatusCode::OK,
        Json(ApiResponse::ok(json!({
            "base_url": state.base_url,
            "routes": routes
        }))),
    )
}

#[utoipa::path(
    get,
    path = "/api/routes/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Path renders a view or redirects", body = ApiResponse),
        (status = 404, description = "No route matches", body = ApiResponse)
    )
)]
pub async fn resolve_handler(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> (StatusCode, Json<ApiResponse>) {
    // accept a full hash address as well as a bare path
    let path = if query.path.contains('#') {
        fragment_path(&query.path)
    } else {
        query.path.clone()
    };
    let resolution = state.routes.resolve(&path);
    let status = match &resolution {
        Resolution::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::OK,
    };
    let href = match &resolution {
        Resolution::Render { route } => Some(hash_href(&state.base_url, &route.path)),
        Resolution::Redirect { to, .. } => Some(hash_href(&state.base_url, &to.path)),
        Resolution::NotFound { .. } => None,
    };
    (
        status,
        Json(ApiResponse {
            success: status == StatusCode::OK,
            data: Some(json!({ "resolution": resolution, "href": href })),
            error: (status != StatusCode::OK).then(|| format!("No route matches {}", path)),
        }),
    )
}
