use crate::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

/// GET /debug/health - Check if services are working
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let mut status = json!({
        "status": "ok",
        "checks": {}
    });

    match state.route_builder.geocoder().cache_stats() {
        Some(stats) => {
            status["checks"]["geocode_cache"] = json!(stats);
        }
        None => {
            status["checks"]["geocode_cache"] = json!("disabled");
        }
    }

    Json(status)
}
