// --- File: crates/services/imagify_backend/src/lib.rs ---
pub mod app_state;

use axum::Router;
use imagify_db::{AccountRepository, TransactionRepository};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use app_state::AppState;

/// Assembles the `/api` router: health, account routes, and payment routes
/// when a gateway is configured.
pub fn build_router<A, T>(state: &AppState<A, T>) -> Router
where
    A: AccountRepository + 'static,
    T: TransactionRepository + 'static,
{
    let mut router: Router = imagify_common::routes();
    router = router.merge(imagify_auth::routes(
        Arc::clone(&state.accounts),
        Arc::clone(&state.signer),
        state.config.auth.bcrypt_cost,
    ));

    if let Some(gateway) = state.gateway.as_ref() {
        router = router.merge(imagify_billing::routes(
            Arc::clone(&state.transactions),
            Arc::clone(gateway),
            state.currency(),
            Arc::clone(&state.signer),
        ));
    }

    Router::new()
        .nest("/api", router)
        .layer(TraceLayer::new_for_http())
}
