//! Repository implementations
//!
//! SQL repositories for deployments with a database, and an in-memory store
//! for development and tests.

pub mod account_sql;
pub mod memory;
pub mod transaction_sql;

pub use account_sql::SqlAccountRepository;
pub use memory::MemoryStore;
pub use transaction_sql::SqlTransactionRepository;
