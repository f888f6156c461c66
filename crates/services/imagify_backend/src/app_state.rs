// --- File: crates/services/imagify_backend/src/app_state.rs ---
use imagify_auth::TokenSigner;
use imagify_common::{is_razorpay_enabled, PaymentGateway};
use imagify_config::AppConfig;
use imagify_db::{AccountRepository, TransactionRepository};
use imagify_razorpay::RazorpayGateway;
use std::sync::Arc;
use tracing::info;

/// Everything the routers are built from.
///
/// `A` and `T` are the account and ledger stores. They are separate types
/// for the SQL repositories and the same [`imagify_db::MemoryStore`] when
/// no database is configured.
pub struct AppState<A, T> {
    pub config: Arc<AppConfig>,
    pub signer: Arc<TokenSigner>,
    pub accounts: Arc<A>,
    pub transactions: Arc<T>,
    /// Present only when payments are enabled.
    pub gateway: Option<Arc<dyn PaymentGateway>>,
}

impl<A, T> AppState<A, T>
where
    A: AccountRepository + 'static,
    T: TransactionRepository + 'static,
{
    /// Builds the state from configuration, with the Razorpay gateway when
    /// `use_razorpay` is set and its section is present.
    pub fn new(config: Arc<AppConfig>, accounts: Arc<A>, transactions: Arc<T>) -> Self {
        let gateway = match config.razorpay.as_ref() {
            Some(razorpay) if is_razorpay_enabled(&config) => {
                info!("Razorpay payments enabled ({})", razorpay.currency);
                Some(Arc::new(RazorpayGateway::new(razorpay.clone())) as Arc<dyn PaymentGateway>)
            }
            _ => {
                info!("Razorpay payments disabled; payment routes are not mounted");
                None
            }
        };

        Self {
            signer: Arc::new(TokenSigner::from_config(&config.auth)),
            config,
            accounts,
            transactions,
            gateway,
        }
    }

    /// Replaces the payment gateway, e.g. with a stub in tests.
    pub fn with_gateway(mut self, gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        self.gateway = gateway;
        self
    }

    /// Currency for new orders.
    pub fn currency(&self) -> String {
        self.config
            .razorpay
            .as_ref()
            .map(|razorpay| razorpay.currency.clone())
            .unwrap_or_else(|| "INR".to_string())
    }
}
