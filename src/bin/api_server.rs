// src/bin/api_server.rs

use materiales_service::infra::config::Settings;
use materiales_service::infra::telemetry;
use materiales_service::storage::document::open_store;
use materiales_service::transport;
use materiales_service::{MaterialService, RouteTable};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let settings = Settings::from_env()?;
    telemetry::init_tracing(&settings.log_level, settings.log_format)?;

    // --- Store + facade ---
    info!(backend = settings.store.kind(), "opening document store");
    let store = open_store(&settings.store).await?;
    let materials = Arc::new(MaterialService::new(store));
    if let Err(e) = materials.ping().await {
        // Keep serving: /health reports the failure and every call surfaces it.
        warn!(error = %e, "document store is not reachable at startup");
    }

    let routes = RouteTable::standard();
    routes.validate()?;

    let app_state = transport::http::AppState {
        materials,
        routes: Arc::new(routes),
        base_url: settings.base_url.clone(),
    };

    // --- API Server Initialization ---
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);
    let listener = tokio::net::TcpListener::bind(settings.listen_addr).await?;
    info!(addr = %settings.listen_addr, "API server listening");
    info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "could not listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("graceful shutdown complete");
    Ok(())
}
