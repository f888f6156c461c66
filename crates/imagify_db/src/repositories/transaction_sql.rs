//! SQL implementation of the transaction repository

use crate::error::DbError;
use crate::repository::{NewTransaction, Settlement, TransactionRepository};
use crate::DbClient;
use chrono::{DateTime, Utc};
use imagify_common::{Plan, Transaction};
use sqlx::any::AnyRow;
use sqlx::{Row, ValueRef};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const SELECT_TRANSACTION: &str = r#"
    SELECT id, user_id, plan, amount, credits, date,
           gateway_order_id, gateway_payment_id, payment
    FROM transactions
"#;

/// SQL implementation of the transaction repository
#[derive(Debug, Clone)]
pub struct SqlTransactionRepository {
    db_client: DbClient,
}

impl SqlTransactionRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    async fn find_one(&self, filter: &str, value: &str) -> Result<Option<Transaction>, DbError> {
        let query = format!("{} WHERE {} = $1", SELECT_TRANSACTION, filter);
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        row.as_ref().map(transaction_from_row).transpose()
    }
}

/// Nullable TEXT column. The `Any` driver cannot decode NULL into
/// `Option<String>`, so nullness is checked on the raw value first.
fn optional_text(row: &AnyRow, column: &str) -> Result<Option<String>, DbError> {
    if row.try_get_raw(column)?.is_null() {
        return Ok(None);
    }
    Ok(Some(row.try_get(column)?))
}

fn transaction_from_row(row: &AnyRow) -> Result<Transaction, DbError> {
    let plan: String = row.try_get("plan")?;
    let plan = Plan::from_id(&plan)
        .ok_or_else(|| DbError::CorruptRow(format!("unknown plan '{}'", plan)))?;
    let date_millis: i64 = row.try_get("date")?;
    let date = DateTime::<Utc>::from_timestamp_millis(date_millis)
        .ok_or_else(|| DbError::CorruptRow(format!("timestamp out of range: {}", date_millis)))?;
    let payment: i64 = row.try_get("payment")?;

    Ok(Transaction {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        plan,
        amount: row.try_get("amount")?,
        credits: row.try_get("credits")?,
        date,
        gateway_order_id: optional_text(row, "gateway_order_id")?,
        gateway_payment_id: optional_text(row, "gateway_payment_id")?,
        payment: payment != 0,
    })
}

impl TransactionRepository for SqlTransactionRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing transaction schema");

        let table = r#"
            CREATE TABLE IF NOT EXISTS transactions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                plan TEXT NOT NULL,
                amount BIGINT NOT NULL,
                credits BIGINT NOT NULL,
                date BIGINT NOT NULL,
                gateway_order_id TEXT,
                gateway_payment_id TEXT,
                payment BIGINT NOT NULL DEFAULT 0
            )
        "#;
        self.db_client.execute(table).await?;
        self.db_client
            .execute(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_transactions_order_id \
                 ON transactions (gateway_order_id)",
            )
            .await?;
        self.db_client
            .execute("CREATE INDEX IF NOT EXISTS idx_transactions_user_id ON transactions (user_id)")
            .await?;

        info!("Transaction schema initialized successfully");
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
        debug!(
            "Creating transaction {} for user {} ({})",
            transaction.id, transaction.user_id, transaction.plan
        );

        let query = r#"
            INSERT INTO transactions (id, user_id, plan, amount, credits, date, payment)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#;
        sqlx::query(query)
            .bind(&transaction.id)
            .bind(&transaction.user_id)
            .bind(transaction.plan.as_str())
            .bind(transaction.amount)
            .bind(transaction.credits)
            .bind(transaction.date.timestamp_millis())
            .bind(0_i64)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert transaction: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        Ok(transaction)
    }

    async fn attach_order_id(&self, transaction_id: &str, order_id: &str) -> Result<bool, DbError> {
        let query = "UPDATE transactions SET gateway_order_id = $1 WHERE id = $2";
        let result = sqlx::query(query)
            .bind(order_id)
            .bind(transaction_id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| DbError::from_insert(e, "Gateway order already linked"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_transaction_by_id(&self, id: &str) -> Result<Option<Transaction>, DbError> {
        self.find_one("id", id).await
    }

    async fn find_transaction_by_order_id(
        &self,
        order_id: &str,
    ) -> Result<Option<Transaction>, DbError> {
        self.find_one("gateway_order_id", order_id).await
    }

    async fn settle_and_credit(
        &self,
        order_id: &str,
        payment_id: &str,
    ) -> Result<Settlement, DbError> {
        let mut tx = self.db_client.begin().await?;

        // The conditional flip runs first so the write lock is taken before
        // anything is read; a concurrent settle waits here, then matches no row.
        let flipped = sqlx::query(
            "UPDATE transactions SET payment = 1, gateway_payment_id = $1 \
             WHERE gateway_order_id = $2 AND payment = 0",
        )
        .bind(payment_id)
        .bind(order_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?
        .rows_affected();

        let query = format!("{} WHERE gateway_order_id = $1", SELECT_TRANSACTION);
        let row = sqlx::query(&query)
            .bind(order_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let Some(transaction) = row.as_ref().map(transaction_from_row).transpose()? else {
            return Ok(Settlement::NotFound);
        };

        if flipped == 0 {
            debug!("Transaction {} already settled", transaction.id);
            return Ok(Settlement::AlreadySettled(transaction));
        }

        let credited = sqlx::query(
            "UPDATE accounts SET credit_balance = credit_balance + $1 WHERE id = $2",
        )
        .bind(transaction.credits)
        .bind(&transaction.user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::QueryError(e.to_string()))?
        .rows_affected();
        if credited == 0 {
            warn!(
                "Account {} for transaction {} is missing; rolling back",
                transaction.user_id, transaction.id
            );
            return Err(DbError::Other(format!(
                "account {} not found while settling transaction {}",
                transaction.user_id, transaction.id
            )));
        }

        let balance_row = sqlx::query("SELECT credit_balance FROM accounts WHERE id = $1")
            .bind(&transaction.user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        let new_balance: i64 = balance_row.try_get("credit_balance")?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;

        info!(
            "Settled transaction {} (+{} credits for {})",
            transaction.id, transaction.credits, transaction.user_id
        );
        Ok(Settlement::Settled {
            transaction,
            new_balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::SqlAccountRepository;
    use crate::repository::{AccountRepository, NewAccount};

    async fn repositories() -> (SqlAccountRepository, SqlTransactionRepository) {
        let client = DbClient::from_url("sqlite::memory:").await.expect("client");
        let accounts = SqlAccountRepository::new(client.clone());
        let transactions = SqlTransactionRepository::new(client);
        accounts.init_schema().await.expect("accounts schema");
        transactions.init_schema().await.expect("transactions schema");
        (accounts, transactions)
    }

    async fn pending_order(
        accounts: &SqlAccountRepository,
        transactions: &SqlTransactionRepository,
        plan: Plan,
        order_id: &str,
    ) -> (String, Transaction) {
        let account = accounts
            .create_account(NewAccount {
                name: "Ada".to_string(),
                email: format!("{}@example.com", order_id),
                password_hash: "$2b$10$hash".to_string(),
            })
            .await
            .expect("account");
        let transaction = transactions
            .create_transaction(NewTransaction {
                user_id: account.id.clone(),
                plan,
            })
            .await
            .expect("transaction");
        assert!(transactions
            .attach_order_id(&transaction.id, order_id)
            .await
            .expect("attach"));
        (account.id, transaction)
    }

    #[tokio::test]
    async fn created_transaction_copies_plan() {
        let (accounts, transactions) = repositories().await;
        let (_, created) = pending_order(&accounts, &transactions, Plan::Advanced, "order_A").await;

        let stored = transactions
            .find_transaction_by_id(&created.id)
            .await
            .expect("query")
            .expect("stored");
        assert_eq!(stored.credits, 500);
        assert_eq!(stored.amount, 50);
        assert!(!stored.payment);
        assert_eq!(stored.gateway_order_id.as_deref(), Some("order_A"));
        assert_eq!(stored.date.timestamp_millis(), created.date.timestamp_millis());
    }

    #[tokio::test]
    async fn settle_credits_exactly_once() {
        let (accounts, transactions) = repositories().await;
        let (account_id, _) = pending_order(&accounts, &transactions, Plan::Basic, "order_B").await;

        let first = transactions
            .settle_and_credit("order_B", "pay_1")
            .await
            .expect("settle");
        match first {
            Settlement::Settled {
                transaction,
                new_balance,
            } => {
                assert!(transaction.payment);
                assert_eq!(transaction.gateway_payment_id.as_deref(), Some("pay_1"));
                assert_eq!(new_balance, 100);
            }
            other => panic!("expected Settled, got {:?}", other),
        }

        let second = transactions
            .settle_and_credit("order_B", "pay_1")
            .await
            .expect("settle");
        assert!(matches!(second, Settlement::AlreadySettled(_)));

        let account = accounts
            .find_account_by_id(&account_id)
            .await
            .expect("query")
            .expect("account");
        assert_eq!(account.credit_balance, 100);
    }

    #[tokio::test]
    async fn pending_transaction_is_found_by_order_id() {
        let (accounts, transactions) = repositories().await;
        let (account_id, created) =
            pending_order(&accounts, &transactions, Plan::Business, "order_P").await;

        let stored = transactions
            .find_transaction_by_order_id("order_P")
            .await
            .expect("query")
            .expect("stored");
        assert_eq!(stored.id, created.id);
        assert_eq!(stored.user_id, account_id);
        assert_eq!(stored.gateway_payment_id, None);
        assert!(!stored.payment);
    }

    #[tokio::test]
    async fn transaction_without_order_id_reads_back() {
        let (_, transactions) = repositories().await;
        let created = transactions
            .create_transaction(NewTransaction {
                user_id: "user-1".to_string(),
                plan: Plan::Basic,
            })
            .await
            .expect("transaction");

        let stored = transactions
            .find_transaction_by_id(&created.id)
            .await
            .expect("query")
            .expect("stored");
        assert_eq!(stored.gateway_order_id, None);
        assert_eq!(stored.gateway_payment_id, None);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_settles_on_file_pool_credit_once() {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("ledger.db").display());
        let client = DbClient::from_config(&imagify_config::DatabaseConfig {
            url,
            max_connections: 5,
        })
        .await
        .expect("client");
        let accounts = SqlAccountRepository::new(client.clone());
        let transactions = SqlTransactionRepository::new(client);
        accounts.init_schema().await.expect("accounts schema");
        transactions.init_schema().await.expect("transactions schema");
        let (account_id, _) =
            pending_order(&accounts, &transactions, Plan::Basic, "order_C").await;

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let transactions = transactions.clone();
                tokio::spawn(async move {
                    transactions
                        .settle_and_credit("order_C", &format!("pay_{}", i))
                        .await
                })
            })
            .collect();

        let mut settled = 0;
        let mut already = 0;
        for handle in handles {
            match handle.await.expect("join").expect("settle") {
                Settlement::Settled { .. } => settled += 1,
                Settlement::AlreadySettled(_) => already += 1,
                Settlement::NotFound => panic!("order_C vanished"),
            }
        }
        assert_eq!((settled, already), (1, 7));

        let account = accounts
            .find_account_by_id(&account_id)
            .await
            .expect("query")
            .expect("account");
        assert_eq!(account.credit_balance, 100);
    }

    #[tokio::test]
    async fn settle_unknown_order_is_not_found() {
        let (_, transactions) = repositories().await;
        let outcome = transactions
            .settle_and_credit("order_missing", "pay_1")
            .await
            .expect("settle");
        assert_eq!(outcome, Settlement::NotFound);
    }

    #[tokio::test]
    async fn attach_to_unknown_transaction_reports_false() {
        let (_, transactions) = repositories().await;
        assert!(!transactions
            .attach_order_id("no-such-id", "order_X")
            .await
            .expect("attach"));
    }
}
