//! In-process store for development and tests.
//!
//! Implements both repository traits over one lock, so settlement has the
//! same all-or-nothing behaviour as the SQL transaction.

use crate::error::DbError;
use crate::repositories::account_sql::EMAIL_TAKEN;
use crate::repository::{
    AccountRepository, NewAccount, NewTransaction, Settlement, TransactionRepository,
};
use chrono::Utc;
use imagify_common::{Account, Transaction};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<String, Account>,
    transactions: HashMap<String, Transaction>,
}

/// Cloning shares the underlying tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ledger entries, settled or not.
    pub fn transaction_count(&self) -> Result<usize, DbError> {
        Ok(self.lock()?.transactions.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>, DbError> {
        self.tables
            .lock()
            .map_err(|_| DbError::Other("memory store lock poisoned".to_string()))
    }
}

impl AccountRepository for MemoryStore {
    async fn init_schema(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, DbError> {
        let mut tables = self.lock()?;
        if tables.accounts.values().any(|a| a.email == account.email) {
            return Err(DbError::UniqueViolation(EMAIL_TAKEN.to_string()));
        }

        let created = Account {
            id: Uuid::new_v4().to_string(),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            credit_balance: 0,
        };
        tables.accounts.insert(created.id.clone(), created.clone());
        debug!("Created account {} in memory", created.id);
        Ok(created)
    }

    async fn find_account_by_id(&self, id: &str) -> Result<Option<Account>, DbError> {
        Ok(self.lock()?.accounts.get(id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        Ok(self
            .lock()?
            .accounts
            .values()
            .find(|a| a.email == email)
            .cloned())
    }
}

impl TransactionRepository for MemoryStore {
    async fn init_schema(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn create_transaction(&self, new: NewTransaction) -> Result<Transaction, DbError> {
        let transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            user_id: new.user_id,
            plan: new.plan,
            amount: new.plan.amount(),
            credits: new.plan.credits(),
            date: Utc::now(),
            gateway_order_id: None,
            gateway_payment_id: None,
            payment: false,
        };
        self.lock()?
            .transactions
            .insert(transaction.id.clone(), transaction.clone());
        Ok(transaction)
    }

    async fn attach_order_id(&self, transaction_id: &str, order_id: &str) -> Result<bool, DbError> {
        let mut tables = self.lock()?;
        if tables
            .transactions
            .values()
            .any(|t| t.id != transaction_id && t.gateway_order_id.as_deref() == Some(order_id))
        {
            return Err(DbError::UniqueViolation(
                "Gateway order already linked".to_string(),
            ));
        }
        match tables.transactions.get_mut(transaction_id) {
            Some(transaction) => {
                transaction.gateway_order_id = Some(order_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_transaction_by_id(&self, id: &str) -> Result<Option<Transaction>, DbError> {
        Ok(self.lock()?.transactions.get(id).cloned())
    }

    async fn find_transaction_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Transaction>, DbError> {
        Ok(self
            .lock()?
            .transactions
            .values()
            .find(|t| t.gateway_order_id.as_deref() == Some(order_id))
            .cloned())
    }

    async fn settle_and_credit(
        &self,
        order_id: &str,
        payment_id: &str,
    ) -> Result<Settlement, DbError> {
        let mut guard = self.lock()?;
        let tables = &mut *guard;

        let Some(transaction) = tables
            .transactions
            .values_mut()
            .find(|t| t.gateway_order_id.as_deref() == Some(order_id))
        else {
            return Ok(Settlement::NotFound);
        };
        if transaction.payment {
            return Ok(Settlement::AlreadySettled(transaction.clone()));
        }

        // Check the account before touching the transaction so a failure leaves both unchanged.
        let account = tables.accounts.get_mut(&transaction.user_id).ok_or_else(|| {
            DbError::Other(format!(
                "account {} not found while settling transaction {}",
                transaction.user_id, transaction.id
            ))
        })?;

        transaction.payment = true;
        transaction.gateway_payment_id = Some(payment_id.to_string());
        account.credit_balance += transaction.credits;

        info!(
            "Settled transaction {} (+{} credits for {})",
            transaction.id, transaction.credits, transaction.user_id
        );
        Ok(Settlement::Settled {
            transaction: transaction.clone(),
            new_balance: account.credit_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imagify_common::Plan;

    async fn pending(store: &MemoryStore, order_id: &str) -> Account {
        let account = store
            .create_account(NewAccount {
                name: "Ada".to_string(),
                email: format!("{}@example.com", order_id),
                password_hash: "hash".to_string(),
            })
            .await
            .expect("account");
        let transaction = store
            .create_transaction(NewTransaction {
                user_id: account.id.clone(),
                plan: Plan::Business,
            })
            .await
            .expect("transaction");
        store
            .attach_order_id(&transaction.id, order_id)
            .await
            .expect("attach");
        account
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        pending(&store, "order_1").await;
        let err = store
            .create_account(NewAccount {
                name: "Other".to_string(),
                email: "order_1@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .await
            .expect_err("duplicate");
        assert!(matches!(err, DbError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn concurrent_settles_credit_once() {
        let store = MemoryStore::new();
        let account = pending(&store, "order_2").await;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .settle_and_credit("order_2", &format!("pay_{}", i))
                        .await
                        .expect("settle")
                })
            })
            .collect();

        let mut settled = 0;
        for handle in handles {
            if matches!(handle.await.expect("join"), Settlement::Settled { .. }) {
                settled += 1;
            }
        }
        assert_eq!(settled, 1);

        let account = store
            .find_account_by_id(&account.id)
            .await
            .expect("query")
            .expect("account");
        assert_eq!(account.credit_balance, 5000);
    }

    #[tokio::test]
    async fn order_ids_are_unique() {
        let store = MemoryStore::new();
        pending(&store, "order_3").await;
        let other = store
            .create_transaction(NewTransaction {
                user_id: "someone".to_string(),
                plan: Plan::Basic,
            })
            .await
            .expect("transaction");
        assert!(store.attach_order_id(&other.id, "order_3").await.is_err());
    }
}
