// --- File: crates/imagify_common/src/models.rs ---

// Domain records shared by the store, the services and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Store-assigned UUID v4.
    pub id: String,
    pub name: String,
    /// Unique across accounts, compared as stored.
    pub email: String,
    /// bcrypt hash; never leaves the process.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub credit_balance: i64,
}

/// A priced credit bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Plan {
    Basic,
    Advanced,
    Business,
}

impl Plan {
    pub const ALL: [Plan; 3] = [Plan::Basic, Plan::Advanced, Plan::Business];

    /// Looks up a plan by its public identifier. Matching is exact.
    pub fn from_id(plan_id: &str) -> Option<Plan> {
        Plan::ALL.into_iter().find(|plan| plan.as_str() == plan_id)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Basic => "Basic",
            Plan::Advanced => "Advanced",
            Plan::Business => "Business",
        }
    }

    /// Credits granted once the plan is paid.
    pub fn credits(&self) -> i64 {
        match self {
            Plan::Basic => 100,
            Plan::Advanced => 500,
            Plan::Business => 5000,
        }
    }

    /// Price in major currency units.
    pub fn amount(&self) -> i64 {
        match self {
            Plan::Basic => 10,
            Plan::Advanced => 50,
            Plan::Business => 250,
        }
    }
}

impl std::fmt::Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment intent in the ledger.
///
/// `payment` flips from `false` to `true` exactly once, when the gateway
/// callback is verified and the credits are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,
    pub plan: Plan,
    pub amount: i64,
    pub credits: i64,
    pub date: DateTime<Utc>,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub payment: bool,
}

/// Order parameters sent to the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Minor currency units (paise for INR).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
}

/// Order descriptor returned by the gateway and passed through to the client,
/// which hands it to the checkout widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GatewayOrder {
    pub id: String,
    #[serde(default)]
    pub entity: String,
    pub amount: i64,
    #[serde(default)]
    pub amount_paid: i64,
    #[serde(default)]
    pub amount_due: i64,
    pub currency: String,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attempts: i64,
    #[serde(default)]
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_table() {
        let table: Vec<(&str, i64, i64)> = Plan::ALL
            .iter()
            .map(|p| (p.as_str(), p.credits(), p.amount()))
            .collect();
        assert_eq!(
            table,
            vec![("Basic", 100, 10), ("Advanced", 500, 50), ("Business", 5000, 250)]
        );
    }

    #[test]
    fn plan_lookup_is_exact() {
        assert_eq!(Plan::from_id("Advanced"), Some(Plan::Advanced));
        assert_eq!(Plan::from_id("advanced"), None);
        assert_eq!(Plan::from_id("Gold"), None);
        assert_eq!(Plan::from_id(""), None);
    }

    #[test]
    fn account_never_serializes_password_hash() {
        let account = Account {
            id: "a1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            credit_balance: 5,
        };
        let value = serde_json::to_value(&account).expect("serialize");
        assert!(value.get("password_hash").is_none());
        assert_eq!(value["credit_balance"], 5);
    }

    #[test]
    fn gateway_order_tolerates_sparse_payload() {
        let order: GatewayOrder = serde_json::from_str(
            r#"{"id":"order_9A33XWu170gUtm","amount":5000,"currency":"INR","notes":[]}"#,
        )
        .expect("deserialize");
        assert_eq!(order.id, "order_9A33XWu170gUtm");
        assert_eq!(order.amount, 5000);
        assert_eq!(order.receipt, None);
    }
}
