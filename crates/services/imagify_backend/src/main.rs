// File: services/imagify_backend/src/main.rs
use imagify_backend::{build_router, AppState};
use imagify_common::{config_error, Context, ImagifyError};
use imagify_config::load_config;
use imagify_db::{
    AccountRepository, DbClient, MemoryStore, SqlAccountRepository, SqlTransactionRepository,
    TransactionRepository,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        error!("Imagify backend stopped: {}", err);
        eprintln!("Imagify backend stopped: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ImagifyError> {
    let config = Arc::new(load_config().map_err(config_error)?);
    imagify_common::init_with_filter(&config.logging.level);

    match config.database.as_ref() {
        Some(db_config) => {
            let client = DbClient::from_config(db_config).await?;
            let accounts = Arc::new(SqlAccountRepository::new(client.clone()));
            let transactions = Arc::new(SqlTransactionRepository::new(client));
            accounts.init_schema().await?;
            transactions.init_schema().await?;
            serve(AppState::new(Arc::clone(&config), accounts, transactions)).await
        }
        None => {
            warn!("No database configured; accounts and payments are kept in memory only");
            let store = Arc::new(MemoryStore::new());
            serve(AppState::new(Arc::clone(&config), Arc::clone(&store), store)).await
        }
    }
}

async fn serve<A, T>(state: AppState<A, T>) -> Result<(), ImagifyError>
where
    A: AccountRepository + 'static,
    T: TransactionRepository + 'static,
{
    #[allow(unused_mut)] // only the openapi feature adds to it
    let mut app = build_router(&state);

    #[cfg(feature = "openapi")]
    {
        app = app.merge(swagger_ui(state.gateway.is_some()));
    }

    let addr = format!("{}:{}", state.config.server.host, state.config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .context("serving HTTP")?;
    Ok(())
}

/// Swagger UI at `/api/docs` over the merged docs of the mounted crates.
#[cfg(feature = "openapi")]
fn swagger_ui(with_payments: bool) -> axum::Router {
    use imagify_auth::doc::AuthApiDoc;
    use imagify_billing::doc::BillingApiDoc;
    use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    #[derive(OpenApi)]
    #[openapi(
        info(
            title = "Imagify API",
            version = "0.1.0",
            description = "Accounts, credits and Razorpay payments for Imagify"
        ),
        paths(imagify_common::routes::health),
        tags((name = "Imagify", description = "Core service endpoints")),
        servers((url = "/api", description = "Main API Prefix")),
    )]
    struct ApiDoc;

    let mut openapi_doc = ApiDoc::openapi();
    openapi_doc.merge(AuthApiDoc::openapi());
    if with_payments {
        openapi_doc.merge(BillingApiDoc::openapi());
    }
    openapi_doc
        .components
        .get_or_insert_with(Default::default)
        .add_security_scheme(
            "bearer_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    info!("Adding Swagger UI at /api/docs");

    SwaggerUi::new("/api/docs")
        .url("/api/docs/openapi.json", openapi_doc)
        .into()
}
