use crate::app::material_service::MaterialService;
use crate::routing::RouteTable;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Clone)]
pub struct AppState {
    pub materials: Arc<MaterialService>,
    pub routes: Arc<RouteTable>,
    /// Base of the hash history, used to build `href`s.
    pub base_url: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// A material as sent by clients: an object with an `id` plus any other fields.
#[derive(Deserialize, Serialize, Debug, ToSchema)]
#[serde(transparent)]
pub struct MaterialPayload(#[schema(value_type = Object)] pub JsonValue);

#[derive(Deserialize, Debug, IntoParams)]
pub struct ResolveQuery {
    /// Route path or full hash address (e.g. `/`, `/inicio`, `/#/inicio`).
    pub path: String,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::failure(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
