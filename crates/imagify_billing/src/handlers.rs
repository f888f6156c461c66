// --- File: crates/imagify_billing/src/handlers.rs ---
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use imagify_auth::AuthenticatedAccount;
use imagify_common::{payload_or_default, ImagifyError, MessageBody};
use imagify_db::TransactionRepository;
use std::sync::Arc;

use crate::logic::{
    PayRequest, PayResponse, PaymentOrchestrator, PaymentVerifier, VerifyRequest,
    PAYMENT_VERIFIED,
};

// --- State for payment handlers ---
pub struct BillingState<T> {
    pub orchestrator: PaymentOrchestrator<T>,
    pub verifier: PaymentVerifier<T>,
}

/// `POST /user/pay-razor`, behind [`imagify_auth::require_auth`].
pub async fn pay_handler<T: TransactionRepository>(
    State(state): State<Arc<BillingState<T>>>,
    account: AuthenticatedAccount,
    payload: Result<Json<PayRequest>, JsonRejection>,
) -> Result<Json<PayResponse>, ImagifyError> {
    let request = payload_or_default(payload);
    let order = state
        .orchestrator
        .create_order(&account.account_id, &request.plan_id)
        .await?;
    Ok(Json(PayResponse {
        success: true,
        order,
    }))
}

/// `POST /user/verify-razor`
///
/// Authenticated by the gateway signature, not by a session token.
pub async fn verify_handler<T: TransactionRepository>(
    State(state): State<Arc<BillingState<T>>>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<MessageBody>, ImagifyError> {
    let request = payload_or_default(payload);
    state
        .verifier
        .verify(
            &request.razorpay_payment_id,
            &request.razorpay_order_id,
            &request.razorpay_signature,
        )
        .await?;
    Ok(Json(MessageBody::ok(PAYMENT_VERIFIED)))
}
