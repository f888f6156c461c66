// --- File: crates/imagify_billing/src/lib.rs ---

pub mod doc;
pub mod handlers;
pub mod logic;
pub mod routes;

// Re-export for main backend
pub use logic::{PaymentOrchestrator, PaymentVerifier};
pub use routes::routes;
