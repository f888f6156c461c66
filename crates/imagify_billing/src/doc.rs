// --- File: crates/imagify_billing/src/doc.rs ---
#![allow(dead_code)]
#![cfg(feature = "openapi")]
use imagify_common::{GatewayOrder, MessageBody};
use utoipa::OpenApi;

use crate::logic::{PayRequest, PayResponse, VerifyRequest};

#[utoipa::path(
    post,
    path = "/user/pay-razor", // Path relative to /api
    request_body(content = PayRequest, example = json!({ "planId": "Advanced" })),
    responses(
        (status = 200, description = "Gateway order for the plan, or `success: false` with a message", body = PayResponse)
    ),
    security(("bearer_token" = [])),
    tag = "Payments"
)]
fn doc_pay_handler() {}

#[utoipa::path(
    post,
    path = "/user/verify-razor", // Path relative to /api
    request_body(content = VerifyRequest, example = json!({
        "razorpay_payment_id": "pay_29QQoUBi66xm2f",
        "razorpay_order_id": "order_9A33XWu170gUtm",
        "razorpay_signature": "9ef4dffbfd84f1318f6739a3ce19f9d85851857ae648f114332d8401e0949a3d"
    })),
    responses(
        (status = 200, description = "Credits added (replays also succeed), or `success: false` with a message", body = MessageBody)
    ),
    tag = "Payments"
)]
fn doc_verify_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_pay_handler, doc_verify_handler),
    components(schemas(PayRequest, PayResponse, VerifyRequest, GatewayOrder, MessageBody)),
    tags((name = "Payments", description = "Razorpay orders and checkout verification"))
)]
pub struct BillingApiDoc;
