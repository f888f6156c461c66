// --- File: crates/imagify_auth/src/handlers.rs ---
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use imagify_common::{payload_or_default, ImagifyError};
use imagify_db::AccountRepository;
use std::sync::Arc;

use crate::logic::{
    AuthResponse, AuthService, CreditService, CreditsResponse, LoginRequest, RegisterRequest,
};
use crate::middleware::AuthenticatedAccount;

// --- State for user handlers ---
pub struct AuthState<A> {
    pub auth: AuthService<A>,
    pub credits: CreditService<A>,
}

/// `POST /user/register`
pub async fn register_handler<A: AccountRepository>(
    State(state): State<Arc<AuthState<A>>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ImagifyError> {
    let request = payload_or_default(payload);
    let session = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;
    Ok(Json(session.into()))
}

/// `POST /user/login`
pub async fn login_handler<A: AccountRepository>(
    State(state): State<Arc<AuthState<A>>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ImagifyError> {
    let request = payload_or_default(payload);
    let session = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(session.into()))
}

/// `GET /user/credits`, behind [`crate::require_auth`].
pub async fn credits_handler<A: AccountRepository>(
    State(state): State<Arc<AuthState<A>>>,
    account: AuthenticatedAccount,
) -> Result<Json<CreditsResponse>, ImagifyError> {
    state.credits.balance(&account.account_id).await.map(Json)
}
