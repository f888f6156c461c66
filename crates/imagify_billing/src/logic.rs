// --- File: crates/imagify_billing/src/logic.rs ---

use std::sync::Arc;

use imagify_common::{
    auth_error, internal_error, not_found, validation_error, GatewayOrder, ImagifyError,
    OrderRequest, PaymentGateway, Plan,
};
use imagify_db::{NewTransaction, Settlement, TransactionRepository};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const MISSING_DETAILS: &str = "Missing Details";
pub const PLAN_NOT_FOUND: &str = "Plan not found";
pub const VERIFICATION_FAILED: &str = "Payment verification failed";
pub const TRANSACTION_NOT_FOUND: &str = "Transaction not found";
pub const PAYMENT_VERIFIED: &str = "Payment verified and credits added";

/// Minor units per major unit (paise per rupee).
const MINOR_UNITS: i64 = 100;

// --- Request / response bodies ---

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PayRequest {
    #[serde(rename = "planId", default)]
    #[cfg_attr(feature = "openapi", schema(example = "Advanced"))]
    pub plan_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct PayResponse {
    pub success: bool,
    pub order: GatewayOrder,
}

/// Fields Razorpay Checkout hands to its success callback.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct VerifyRequest {
    #[serde(default)]
    pub razorpay_payment_id: String,
    #[serde(default)]
    pub razorpay_order_id: String,
    #[serde(default)]
    pub razorpay_signature: String,
}

// --- Payment Orchestrator ---

/// Opens a ledger entry for a plan and a matching gateway order.
pub struct PaymentOrchestrator<T> {
    transactions: Arc<T>,
    gateway: Arc<dyn PaymentGateway>,
    currency: String,
}

impl<T: TransactionRepository> PaymentOrchestrator<T> {
    pub fn new(transactions: Arc<T>, gateway: Arc<dyn PaymentGateway>, currency: String) -> Self {
        Self {
            transactions,
            gateway,
            currency,
        }
    }

    /// Creates a pending transaction for `plan_id` and a gateway order for its
    /// price, receipted with the transaction id.
    ///
    /// If the gateway call fails the transaction stays pending without an
    /// order id; it can never be settled and is kept for auditing.
    pub async fn create_order(
        &self,
        account_id: &str,
        plan_id: &str,
    ) -> Result<GatewayOrder, ImagifyError> {
        if account_id.is_empty() || plan_id.is_empty() {
            return Err(validation_error(MISSING_DETAILS));
        }
        let plan = Plan::from_id(plan_id).ok_or_else(|| not_found(PLAN_NOT_FOUND))?;

        let transaction = self
            .transactions
            .create_transaction(NewTransaction {
                user_id: account_id.to_string(),
                plan,
            })
            .await?;

        let request = OrderRequest {
            amount: transaction.amount * MINOR_UNITS,
            currency: self.currency.clone(),
            receipt: transaction.id.clone(),
        };
        let order = match self.gateway.create_order(request).await {
            Ok(order) => order,
            Err(err) => {
                warn!(
                    "{} order failed; transaction {} left pending without order id: {}",
                    self.gateway.name(),
                    transaction.id,
                    err
                );
                return Err(err);
            }
        };

        if !self
            .transactions
            .attach_order_id(&transaction.id, &order.id)
            .await?
        {
            return Err(internal_error(format!(
                "transaction {} vanished before order {} could be attached",
                transaction.id, order.id
            )));
        }

        info!(
            "Order {} created for transaction {} ({}, {} credits)",
            order.id, transaction.id, plan, transaction.credits
        );
        Ok(order)
    }
}

// --- Payment Verifier ---

/// Applies verified gateway callbacks to the ledger, at most once per transaction.
pub struct PaymentVerifier<T> {
    transactions: Arc<T>,
    gateway: Arc<dyn PaymentGateway>,
}

impl<T: TransactionRepository> PaymentVerifier<T> {
    pub fn new(transactions: Arc<T>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self {
            transactions,
            gateway,
        }
    }

    /// Checks the callback signature, then settles the transaction and
    /// credits its account. A replay of an already settled callback succeeds
    /// without changing anything.
    pub async fn verify(
        &self,
        payment_id: &str,
        order_id: &str,
        signature: &str,
    ) -> Result<Settlement, ImagifyError> {
        self.gateway
            .verify_signature(order_id, payment_id, signature)
            .map_err(|err| match err {
                ImagifyError::AuthError(_) => auth_error(VERIFICATION_FAILED),
                other => other,
            })?;

        match self
            .transactions
            .settle_and_credit(order_id, payment_id)
            .await?
        {
            Settlement::NotFound => {
                warn!("Verified callback for unknown order {}", order_id);
                Err(not_found(TRANSACTION_NOT_FOUND))
            }
            Settlement::AlreadySettled(transaction) => {
                debug!(
                    "Replayed callback for settled transaction {}; nothing to do",
                    transaction.id
                );
                Ok(Settlement::AlreadySettled(transaction))
            }
            settled => Ok(settled),
        }
    }
}
