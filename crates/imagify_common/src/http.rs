// --- File: crates/imagify_common/src/http.rs ---
use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{debug, error};

use crate::error::ImagifyError;

// Include the client module
pub mod client;

/// `{ "success": ..., "message": ... }`, used for every failed request and for
/// acknowledgements that carry only a message.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct MessageBody {
    pub success: bool,
    pub message: String,
}

impl MessageBody {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Extension trait for ImagifyError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for ImagifyError {
    fn into_http_response(self) -> Response {
        if self.is_business() {
            debug!("Request rejected: {}", self);
        } else {
            error!("Request failed: {}", self);
        }

        // Existing clients branch on `success`, not on the status code.
        Json(MessageBody::failure(self.public_message())).into_response()
    }
}

/// Implement IntoResponse for ImagifyError to make it easier to use in Axum handlers.
impl IntoResponse for ImagifyError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}

/// Unwraps a JSON body, treating an unparseable or absent body as `T::default()`.
///
/// Handlers then report missing fields through their usual validation path.
pub fn payload_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(value)) => value,
        Err(rejection) => {
            debug!("Ignoring unreadable request body: {}", rejection);
            T::default()
        }
    }
}
