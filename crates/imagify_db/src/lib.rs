//! Storage for the Imagify backend
//!
//! Accounts and the payment ledger live behind the [`AccountRepository`] and
//! [`TransactionRepository`] traits. [`SqlAccountRepository`] and
//! [`SqlTransactionRepository`] run on an `sqlx::Any` pool (SQLite by default,
//! PostgreSQL with the `postgres` feature); [`MemoryStore`] keeps everything
//! in process.
//!
//! # Example
//!
//! ```rust,no_run
//! use imagify_db::{AccountRepository, DbClient, SqlAccountRepository};
//!
//! async fn setup() -> Result<SqlAccountRepository, imagify_db::DbError> {
//!     let client = DbClient::from_url("sqlite://data/imagify.db?mode=rwc").await?;
//!     let accounts = SqlAccountRepository::new(client);
//!     accounts.init_schema().await?;
//!     Ok(accounts)
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod repository;

pub use client::{DbClient, DbTransaction};
pub use error::DbError;
pub use repositories::{MemoryStore, SqlAccountRepository, SqlTransactionRepository};
pub use repository::{
    AccountRepository, NewAccount, NewTransaction, Settlement, TransactionRepository,
};
