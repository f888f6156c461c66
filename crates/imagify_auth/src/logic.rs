// --- File: crates/imagify_auth/src/logic.rs ---

use std::sync::Arc;

use imagify_common::{auth_error, conflict, internal_error, not_found, validation_error, Account, ImagifyError};
use imagify_db::{AccountRepository, DbError, NewAccount};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::token::TokenSigner;

pub const MISSING_DETAILS: &str = "Missing Details";
pub const EMAIL_TAKEN: &str = "Email already registered";
pub const USER_NOT_FOUND: &str = "User does not exist";
pub const INCORRECT_PASSWORD: &str = "Incorrect password";

// --- Request / response bodies ---

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UserSummary {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreditsResponse {
    pub success: bool,
    pub credits: i64,
    pub user: UserSummary,
}

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub account: Account,
}

impl From<Session> for AuthResponse {
    fn from(session: Session) -> Self {
        Self {
            success: true,
            token: session.token,
            user: UserSummary {
                name: session.account.name,
            },
        }
    }
}

// --- Auth Service ---

/// Registers accounts and exchanges credentials for session tokens.
pub struct AuthService<A> {
    accounts: Arc<A>,
    signer: Arc<TokenSigner>,
    bcrypt_cost: u32,
}

impl<A> Clone for AuthService<A> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
            signer: Arc::clone(&self.signer),
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

impl<A: AccountRepository> AuthService<A> {
    pub fn new(accounts: Arc<A>, signer: Arc<TokenSigner>, bcrypt_cost: u32) -> Self {
        Self {
            accounts,
            signer,
            bcrypt_cost,
        }
    }

    /// Creates an account with a zero balance and signs a token for it.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, ImagifyError> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(validation_error(MISSING_DETAILS));
        }

        if self.accounts.find_account_by_email(email).await?.is_some() {
            debug!("Registration refused: email already in use");
            return Err(conflict(EMAIL_TAKEN));
        }

        let password_hash = hash_password(password.to_string(), self.bcrypt_cost).await?;
        let account = self
            .accounts
            .create_account(NewAccount {
                name: name.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                // A concurrent registration won the insert.
                DbError::UniqueViolation(_) => conflict(EMAIL_TAKEN),
                other => other.into(),
            })?;

        info!("Registered account {}", account.id);
        let token = self.signer.issue(&account.id)?;
        Ok(Session { token, account })
    }

    /// Checks the password against the stored hash and signs a token.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ImagifyError> {
        let account = self
            .accounts
            .find_account_by_email(email)
            .await?
            .ok_or_else(|| not_found(USER_NOT_FOUND))?;

        if !verify_password(password.to_string(), account.password_hash.clone()).await? {
            debug!("Login refused for account {}: wrong password", account.id);
            return Err(auth_error(INCORRECT_PASSWORD));
        }

        let token = self.signer.issue(&account.id)?;
        Ok(Session { token, account })
    }
}

// --- Credit Service ---

/// Reports the balance of the authenticated account.
pub struct CreditService<A> {
    accounts: Arc<A>,
}

impl<A> Clone for CreditService<A> {
    fn clone(&self) -> Self {
        Self {
            accounts: Arc::clone(&self.accounts),
        }
    }
}

impl<A: AccountRepository> CreditService<A> {
    pub fn new(accounts: Arc<A>) -> Self {
        Self { accounts }
    }

    pub async fn balance(&self, account_id: &str) -> Result<CreditsResponse, ImagifyError> {
        let account = self
            .accounts
            .find_account_by_id(account_id)
            .await?
            .ok_or_else(|| not_found(USER_NOT_FOUND))?;

        Ok(CreditsResponse {
            success: true,
            credits: account.credit_balance,
            user: UserSummary { name: account.name },
        })
    }
}

// Both bcrypt calls run on the blocking pool.
async fn hash_password(password: String, cost: u32) -> Result<String, ImagifyError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| internal_error(format!("password hashing task failed: {}", e)))?
        .map_err(|e| internal_error(format!("password hashing failed: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool, ImagifyError> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| internal_error(format!("password check task failed: {}", e)))?
        .map_err(|e| internal_error(format!("stored password hash is unusable: {}", e)))
}
