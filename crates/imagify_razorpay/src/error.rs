// --- File: crates/imagify_razorpay/src/error.rs ---
use imagify_common::{external_service_error, ImagifyError};
use thiserror::Error;

/// Razorpay-specific error types.
#[derive(Error, Debug)]
pub enum RazorpayError {
    /// Error occurred during a Razorpay API request
    #[error("Razorpay API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Error returned by the Razorpay API
    #[error("Razorpay API returned an error: {message} (Status: {status_code})")]
    ApiError { status_code: u16, message: String },

    /// Error parsing Razorpay API response
    #[error("Failed to parse Razorpay API response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Missing or incomplete Razorpay configuration
    #[error("Razorpay configuration missing or incomplete")]
    ConfigError,

    /// Checkout callback signature did not match
    #[error("Razorpay signature mismatch")]
    SignatureMismatch,

    /// Internal processing error
    #[error("Internal processing error: {0}")]
    InternalError(String),
}

/// Convert RazorpayError to ImagifyError
impl From<RazorpayError> for ImagifyError {
    fn from(err: RazorpayError) -> Self {
        match err {
            RazorpayError::RequestError(e) => {
                ImagifyError::HttpError(format!("Razorpay request error: {}", e))
            }
            RazorpayError::ApiError {
                status_code,
                message,
            } => external_service_error(
                "Razorpay API",
                format!("Status: {}, Message: {}", status_code, message),
            ),
            RazorpayError::ParseError(e) => {
                ImagifyError::ParseError(format!("Razorpay response parse error: {}", e))
            }
            RazorpayError::ConfigError => ImagifyError::ConfigError(
                "Razorpay configuration missing or incomplete".to_string(),
            ),
            RazorpayError::SignatureMismatch => {
                ImagifyError::AuthError("Razorpay signature mismatch".to_string())
            }
            RazorpayError::InternalError(msg) => {
                ImagifyError::InternalError(format!("Razorpay internal error: {}", msg))
            }
        }
    }
}
