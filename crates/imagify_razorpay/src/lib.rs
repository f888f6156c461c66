// --- File: crates/imagify_razorpay/src/lib.rs ---

pub mod error;
pub mod logic;
pub mod service;

pub use error::RazorpayError;
pub use logic::{compute_signature, create_order, verify_payment_signature};
pub use service::RazorpayGateway;
