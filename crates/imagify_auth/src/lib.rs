// --- File: crates/imagify_auth/src/lib.rs ---

pub mod doc;
pub mod handlers;
pub mod logic;
pub mod middleware;
pub mod routes;
pub mod token;

/// Answer given to requests without a valid session token.
pub const NOT_AUTHORIZED: &str = "Not Authorized. Login Again";

// Re-export for main backend
pub use logic::{AuthService, CreditService, Session};
pub use middleware::{require_auth, session_token, AuthenticatedAccount};
pub use routes::routes;
pub use token::{Claims, TokenSigner};
