//! `GET /` and `GET /health`.

use axum::response::Json;
use serde_json::{json, Value};

use crate::types::ApiInfo;

use super::registry::EndpointRegistry;

pub async fn root() -> Json<ApiInfo> {
    Json(EndpointRegistry::api_info())
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
