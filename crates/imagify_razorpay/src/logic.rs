// --- File: crates/imagify_razorpay/src/logic.rs ---
use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use imagify_common::{GatewayOrder, OrderRequest};
use imagify_config::RazorpayConfig;
use reqwest::Client;
use serde::Serialize;
use sha2::Sha256;
use tracing::{debug, info, warn};

use crate::error::RazorpayError;

type HmacSha256 = Hmac<Sha256>;

/// Body of `POST /v1/orders`.
#[derive(Serialize, Debug)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// Creates a Razorpay order.
///
/// Authenticates with HTTP basic auth (`key_id:key_secret`). `request.amount`
/// is in minor units.
pub async fn create_order(
    client: &Client,
    config: &RazorpayConfig,
    request: &OrderRequest,
) -> Result<GatewayOrder, RazorpayError> {
    if config.key_id.is_empty() || config.key_secret.is_empty() {
        return Err(RazorpayError::ConfigError);
    }

    let api_url = format!("{}/orders", config.api_base_url.trim_end_matches('/'));
    let body = CreateOrderBody {
        amount: request.amount,
        currency: &request.currency,
        receipt: &request.receipt,
    };
    debug!("[Razorpay] Creating order for receipt {} at {}", request.receipt, api_url);

    let response = client
        .post(&api_url)
        .basic_auth(&config.key_id, Some(&config.key_secret))
        .json(&body)
        .send()
        .await?;

    let status = response.status();
    let body_text = response.text().await?;

    if status.is_success() {
        let order: GatewayOrder = serde_json::from_str(&body_text)?;
        info!("[Razorpay] Order {} created for receipt {}", order.id, request.receipt);
        Ok(order)
    } else {
        // Razorpay errors look like {"error": {"code": "...", "description": "..."}}
        let error_message = match serde_json::from_str::<serde_json::Value>(&body_text) {
            Ok(json_body) => json_body
                .get("error")
                .and_then(|e| e.get("description"))
                .and_then(|m| m.as_str())
                .unwrap_or(&body_text)
                .to_string(),
            Err(_) => body_text,
        };
        warn!(
            "[Razorpay] Order creation failed with HTTP status {}: {}",
            status, error_message
        );
        Err(RazorpayError::ApiError {
            status_code: status.as_u16(),
            message: error_message,
        })
    }
}

/// Hex-encoded HMAC-SHA256 of `"{order_id}|{payment_id}"` under `key_secret`,
/// as Razorpay Checkout signs its success callback.
pub fn compute_signature(
    order_id: &str,
    payment_id: &str,
    key_secret: &str,
) -> Result<String, RazorpayError> {
    let mut mac = HmacSha256::new_from_slice(key_secret.as_bytes())
        .map_err(|_| RazorpayError::InternalError("invalid HMAC key".to_string()))?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a checkout callback signature in constant time.
///
/// Empty fields never verify.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    key_secret: &str,
) -> Result<(), RazorpayError> {
    if order_id.is_empty() || payment_id.is_empty() || signature.is_empty() {
        return Err(RazorpayError::SignatureMismatch);
    }

    let expected = compute_signature(order_id, payment_id, key_secret)?;
    if constant_time_eq(expected.as_bytes(), signature.as_bytes()) {
        Ok(())
    } else {
        Err(RazorpayError::SignatureMismatch)
    }
}
