// --- File: crates/imagify_common/src/services.rs ---
//! Service abstractions for external services.
//!
//! Payment logic depends on [`PaymentGateway`] rather than on a concrete
//! provider, so the orchestration can be tested without network access.

use std::future::Future;
use std::pin::Pin;

use crate::error::ImagifyError;
use crate::models::{GatewayOrder, OrderRequest};

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A hosted payment gateway with server-side orders and signed checkout callbacks.
pub trait PaymentGateway: Send + Sync {
    /// Short provider name used in logs.
    fn name(&self) -> &'static str;

    /// Create an order the client can pay against.
    fn create_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayOrder, ImagifyError>;

    /// Check that a checkout callback was signed by the gateway.
    ///
    /// Returns `AuthError` when the signature does not match.
    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), ImagifyError>;
}
