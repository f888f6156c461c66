//! Repository traits for database access
//!
//! Services are generic over these traits, so the SQL repositories and the
//! in-memory store are interchangeable.

use crate::error::DbError;
use imagify_common::{Account, Plan, Transaction};
use std::future::Future;

/// Fields supplied when registering an account. The store assigns the id
/// and starts the balance at zero.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// A pending payment for a plan. The store assigns the id and the date and
/// copies amount and credits from the plan.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub plan: Plan,
}

/// Outcome of [`TransactionRepository::settle_and_credit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    /// This call flipped `payment` and credited the account.
    Settled {
        transaction: Transaction,
        new_balance: i64,
    },
    /// The transaction had been settled before; nothing changed.
    AlreadySettled(Transaction),
    /// No transaction carries the order id.
    NotFound,
}

/// Storage for user accounts.
pub trait AccountRepository: Send + Sync {
    /// Create the accounts table if it does not exist.
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Insert an account.
    ///
    /// Fails with [`DbError::UniqueViolation`] when the email is taken.
    fn create_account(
        &self,
        account: NewAccount,
    ) -> impl Future<Output = Result<Account, DbError>> + Send;

    fn find_account_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Account>, DbError>> + Send;

    /// Exact, case-sensitive match on the stored email.
    fn find_account_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Option<Account>, DbError>> + Send;
}

/// Storage for the payment ledger.
pub trait TransactionRepository: Send + Sync {
    /// Create the transactions table if it does not exist.
    fn init_schema(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Insert a pending transaction.
    fn create_transaction(
        &self,
        transaction: NewTransaction,
    ) -> impl Future<Output = Result<Transaction, DbError>> + Send;

    /// Record the gateway order id on a transaction. Returns `false` when no
    /// transaction has the id.
    fn attach_order_id(
        &self,
        transaction_id: &str,
        order_id: &str,
    ) -> impl Future<Output = Result<bool, DbError>> + Send;

    fn find_transaction_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Transaction>, DbError>> + Send;

    fn find_transaction_by_order_id(
        &self,
        order_id: &str,
    ) -> impl Future<Output = Result<Option<Transaction>, DbError>> + Send;

    /// Atomically mark the transaction for `order_id` as paid and add its
    /// credits to the owning account.
    ///
    /// The flag flip is conditional on `payment` being false, and both writes
    /// commit together, so concurrent calls credit the account at most once.
    fn settle_and_credit(
        &self,
        order_id: &str,
        payment_id: &str,
    ) -> impl Future<Output = Result<Settlement, DbError>> + Send;
}
