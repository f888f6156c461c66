// --- File: crates/imagify_common/src/lib.rs ---

pub mod error;    // Error taxonomy
pub mod features; // Runtime feature checks
pub mod http;     // HTTP utilities
pub mod logging;  // Logging setup
pub mod models;   // Domain records
pub mod routes;   // Shared routes
pub mod services; // Service abstractions

// Re-export the routes function to be used by the main backend service
pub use routes::routes;

// Re-export error types and utilities for easier access
pub use error::{
    auth_error, config_error, conflict, database_error, external_service_error, internal_error,
    not_found, validation_error, Context, ImagifyError, GENERIC_ERROR_MESSAGE,
};

// Re-export HTTP utilities for easier access
pub use http::{
    client::{create_client, HTTP_CLIENT},
    payload_or_default, IntoHttpResponse, MessageBody,
};

pub use features::{is_feature_enabled, is_razorpay_enabled};
pub use logging::init_with_filter;
pub use models::{Account, GatewayOrder, OrderRequest, Plan, Transaction};
pub use services::{BoxFuture, PaymentGateway};
