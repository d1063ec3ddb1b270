use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zarinpal_gateway::config::AppConfig;
use zarinpal_gateway::gateways::zarinpal::ZarinpalClient;
use zarinpal_gateway::ledger::pg_ledger::PgLedger;
use zarinpal_gateway::repo::transactions_repo::TransactionsRepo;
use zarinpal_gateway::service::delivery::ComponentRegistry;
use zarinpal_gateway::service::payment_service::PaymentService;
use zarinpal_gateway::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&cfg.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let ledger = PgLedger {
        pool: pool.clone(),
        merchant_id: cfg.merchant_id.clone(),
        environment: cfg.environment,
        surcharge_percent: cfg.surcharge_percent,
        success_url_base: cfg.success_url_base.clone(),
    };

    let payment_service = PaymentService {
        store: Arc::new(TransactionsRepo { pool }),
        gateway: Arc::new(ZarinpalClient::new(cfg.gateway_timeout_ms)),
        platform: Arc::new(ledger),
        registry: ComponentRegistry::new(),
        public_url: cfg.public_url.clone(),
    };

    let state = AppState { payment_service };

    let app = Router::new()
        .route("/health", get(zarinpal_gateway::http::handlers::payments::health))
        .route("/payments", post(zarinpal_gateway::http::handlers::payments::initiate_payment))
        .route(
            "/payments/process",
            get(zarinpal_gateway::http::handlers::callback::process_callback),
        )
        .route(
            "/payments/:authority",
            get(zarinpal_gateway::http::handlers::payments::get_transaction),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    tracing::info!("listening on {}", cfg.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
