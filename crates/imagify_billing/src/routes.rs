// --- File: crates/imagify_billing/src/routes.rs ---

use axum::{middleware::from_fn_with_state, routing::post, Router};
use imagify_auth::{require_auth, TokenSigner};
use imagify_common::PaymentGateway;
use imagify_db::TransactionRepository;
use std::sync::Arc;

use crate::handlers::{pay_handler, verify_handler, BillingState};
use crate::logic::{PaymentOrchestrator, PaymentVerifier};

/// Creates a router containing the `/user` payment routes.
///
/// Orders are created for the authenticated account; the verification
/// callback is public and trusted only through the gateway signature.
pub fn routes<T>(
    transactions: Arc<T>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
    signer: Arc<TokenSigner>,
) -> Router
where
    T: TransactionRepository + 'static,
{
    let state = Arc::new(BillingState {
        orchestrator: PaymentOrchestrator::new(
            Arc::clone(&transactions),
            Arc::clone(&gateway),
            currency,
        ),
        verifier: PaymentVerifier::new(transactions, gateway),
    });

    let protected = Router::new()
        .route("/user/pay-razor", post(pay_handler::<T>))
        .route_layer(from_fn_with_state(signer, require_auth));

    Router::new()
        .route("/user/verify-razor", post(verify_handler::<T>))
        .merge(protected)
        .with_state(state)
}
