// --- File: crates/imagify_auth/src/routes.rs ---

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use imagify_db::AccountRepository;
use std::sync::Arc;

use crate::handlers::{credits_handler, login_handler, register_handler, AuthState};
use crate::logic::{AuthService, CreditService};
use crate::middleware::require_auth;
use crate::token::TokenSigner;

/// Creates a router containing the `/user` account routes.
pub fn routes<A>(accounts: Arc<A>, signer: Arc<TokenSigner>, bcrypt_cost: u32) -> Router
where
    A: AccountRepository + 'static,
{
    let state = Arc::new(AuthState {
        auth: AuthService::new(Arc::clone(&accounts), Arc::clone(&signer), bcrypt_cost),
        credits: CreditService::new(accounts),
    });

    let protected = Router::new()
        .route("/user/credits", get(credits_handler::<A>))
        .route_layer(from_fn_with_state(signer, require_auth));

    Router::new()
        .route("/user/register", post(register_handler::<A>))
        .route("/user/login", post(login_handler::<A>))
        .merge(protected)
        .with_state(state)
}
