// --- File: crates/imagify_razorpay/src/service.rs ---
use imagify_common::services::{BoxFuture, PaymentGateway};
use imagify_common::{GatewayOrder, ImagifyError, OrderRequest, HTTP_CLIENT};
use imagify_config::RazorpayConfig;
use reqwest::Client;
use tracing::warn;

use crate::logic::{create_order, verify_payment_signature};

/// Razorpay implementation of [`PaymentGateway`].
#[derive(Clone)]
pub struct RazorpayGateway {
    config: RazorpayConfig,
    client: Client,
}

impl RazorpayGateway {
    /// Uses the shared HTTP client.
    pub fn new(config: RazorpayConfig) -> Self {
        Self::with_client(config, HTTP_CLIENT.clone())
    }

    pub fn with_client(config: RazorpayConfig, client: Client) -> Self {
        Self { config, client }
    }
}

impl PaymentGateway for RazorpayGateway {
    fn name(&self) -> &'static str {
        "Razorpay"
    }

    fn create_order(&self, request: OrderRequest) -> BoxFuture<'_, GatewayOrder, ImagifyError> {
        Box::pin(async move {
            create_order(&self.client, &self.config, &request)
                .await
                .map_err(ImagifyError::from)
        })
    }

    fn verify_signature(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), ImagifyError> {
        verify_payment_signature(order_id, payment_id, signature, &self.config.key_secret).map_err(
            |err| {
                warn!("Rejected Razorpay callback for order '{}': {}", order_id, err);
                ImagifyError::from(err)
            },
        )
    }
}

impl std::fmt::Debug for RazorpayGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::compute_signature;

    fn gateway() -> RazorpayGateway {
        RazorpayGateway::new(RazorpayConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: "rzp_test_secret".to_string(),
            currency: "INR".to_string(),
            api_base_url: "https://api.razorpay.com/v1".to_string(),
        })
    }

    #[test]
    fn verifies_with_configured_secret() {
        let gateway = gateway();
        let signature = compute_signature("order_1", "pay_1", "rzp_test_secret").unwrap();
        assert!(gateway.verify_signature("order_1", "pay_1", &signature).is_ok());

        let err = gateway
            .verify_signature("order_1", "pay_1", "deadbeef")
            .unwrap_err();
        assert!(matches!(err, ImagifyError::AuthError(_)));
    }
}
