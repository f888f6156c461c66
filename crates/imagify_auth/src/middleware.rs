// --- File: crates/imagify_auth/src/middleware.rs ---

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use imagify_common::{auth_error, ImagifyError};
use std::sync::Arc;
use tracing::debug;

use crate::token::TokenSigner;
use crate::NOT_AUTHORIZED;

/// Header older clients send the bare token in.
const LEGACY_TOKEN_HEADER: &str = "token";

/// The account a request was authenticated as, set by [`require_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedAccount {
    pub account_id: String,
}

/// Pulls the session token from `Authorization: Bearer ...`, falling back to
/// the legacy `token` header.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    bearer
        .or_else(|| {
            headers
                .get(LEGACY_TOKEN_HEADER)
                .and_then(|value| value.to_str().ok())
                .map(str::trim)
        })
        .filter(|token| !token.is_empty())
}

/// Axum middleware guarding routes that need a signed-in account.
///
/// On success the [`AuthenticatedAccount`] is stored in the request
/// extensions; otherwise the request is answered with
/// `{success: false, message: "Not Authorized. Login Again"}`.
pub async fn require_auth(
    State(signer): State<Arc<TokenSigner>>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(token) = session_token(req.headers()) else {
        debug!("Request to {} without session token", req.uri().path());
        return auth_error(NOT_AUTHORIZED).into_response();
    };

    match signer.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthenticatedAccount {
                account_id: claims.id,
            });
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    S: Send + Sync,
{
    type Rejection = ImagifyError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedAccount>()
            .cloned()
            .ok_or_else(|| auth_error(NOT_AUTHORIZED))
    }
}
