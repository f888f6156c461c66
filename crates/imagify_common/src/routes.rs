// --- File: crates/imagify_common/src/routes.rs ---
use axum::{routing::get, Json, Router};

use crate::http::MessageBody;

/// Liveness probe.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health", // Path relative to /api
    responses((status = 200, description = "Service is up", body = MessageBody)),
    tag = "Imagify"
))]
pub async fn health() -> Json<MessageBody> {
    Json(MessageBody::ok("Imagify API is running"))
}

/// Routes shared by every deployment, independent of enabled features.
pub fn routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
