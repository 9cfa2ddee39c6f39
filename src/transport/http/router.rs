use crate::routing::{Matched, Resolution, Route, RouteRef, RouteTarget};
use crate::transport::http::handlers::{health, materials, routes};
use crate::transport::http::types::{ApiResponse, MaterialPayload};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        materials::list_handler,
        materials::get_handler,
        materials::create_handler,
        materials::update_handler,
        materials::delete_handler,
        routes::list_routes_handler,
        routes::resolve_handler
    ),
    components(schemas(
        ApiResponse,
        MaterialPayload,
        Route,
        RouteRef,
        RouteTarget,
        Matched,
        Resolution
    ))
)]
#[allow(dead_code)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/materiales",
            get(materials::list_handler).post(materials::create_handler),
        )
        .route(
            "/api/materiales/:id",
            get(materials::get_handler)
                .patch(materials::update_handler)
                .delete(materials::delete_handler),
        )
        .route("/api/routes", get(routes::list_routes_handler))
        .route("/api/routes/resolve", get(routes::resolve_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
