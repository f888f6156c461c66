//! SQL implementation of the account repository

use crate::error::DbError;
use crate::repository::{AccountRepository, NewAccount};
use crate::DbClient;
use imagify_common::Account;
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info};
use uuid::Uuid;

pub(crate) const EMAIL_TAKEN: &str = "Email already registered";

/// SQL implementation of the account repository
#[derive(Debug, Clone)]
pub struct SqlAccountRepository {
    db_client: DbClient,
}

impl SqlAccountRepository {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }
}

fn account_from_row(row: &AnyRow) -> Result<Account, DbError> {
    Ok(Account {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        credit_balance: row.try_get("credit_balance")?,
    })
}

impl AccountRepository for SqlAccountRepository {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing account schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                credit_balance BIGINT NOT NULL DEFAULT 0
            )
        "#;
        self.db_client.execute(query).await?;

        info!("Account schema initialized successfully");
        Ok(())
    }

    async fn create_account(&self, account: NewAccount) -> Result<Account, DbError> {
        let id = Uuid::new_v4().to_string();
        debug!("Creating account {}", id);

        let query = r#"
            INSERT INTO accounts (id, name, email, password_hash, credit_balance)
            VALUES ($1, $2, $3, $4, $5)
        "#;
        sqlx::query(query)
            .bind(&id)
            .bind(&account.name)
            .bind(&account.email)
            .bind(&account.password_hash)
            .bind(0_i64)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                let err = DbError::from_insert(e, EMAIL_TAKEN);
                if !matches!(err, DbError::UniqueViolation(_)) {
                    error!("Failed to insert account: {}", err);
                }
                err
            })?;

        Ok(Account {
            id,
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            credit_balance: 0,
        })
    }

    async fn find_account_by_id(&self, id: &str) -> Result<Option<Account>, DbError> {
        let query = r#"
            SELECT id, name, email, password_hash, credit_balance
            FROM accounts
            WHERE id = $1
        "#;
        let row = sqlx::query(query)
            .bind(id)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        row.as_ref().map(account_from_row).transpose()
    }

    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, DbError> {
        let query = r#"
            SELECT id, name, email, password_hash, credit_balance
            FROM accounts
            WHERE email = $1
        "#;
        let row = sqlx::query(query)
            .bind(email)
            .fetch_optional(self.db_client.pool())
            .await
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        row.as_ref().map(account_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn repository() -> SqlAccountRepository {
        let client = DbClient::from_url("sqlite::memory:").await.expect("client");
        let repo = SqlAccountRepository::new(client);
        repo.init_schema().await.expect("schema");
        repo
    }

    fn new_account(email: &str) -> NewAccount {
        NewAccount {
            name: "Ada".to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn create_and_find() {
        let repo = repository().await;
        let created = repo.create_account(new_account("ada@example.com")).await.expect("create");
        assert_eq!(created.credit_balance, 0);

        let by_id = repo.find_account_by_id(&created.id).await.expect("query");
        assert_eq!(by_id.as_ref(), Some(&created));

        let by_email = repo.find_account_by_email("ada@example.com").await.expect("query");
        assert_eq!(by_email.map(|a| a.id), Some(created.id));

        assert!(repo.find_account_by_email("ADA@example.com").await.expect("query").is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_unique_violation() {
        let repo = repository().await;
        repo.create_account(new_account("ada@example.com")).await.expect("create");

        let err = repo
            .create_account(new_account("ada@example.com"))
            .await
            .expect_err("duplicate");
        assert!(matches!(err, DbError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let repo = repository().await;
        repo.init_schema().await.expect("second init");
    }
}
