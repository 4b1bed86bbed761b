//! Entry point: load config, wire dependencies, and run the server.

use authgate::auth::JwtSecret;
use authgate::clock::{Clock, SystemClock};
use authgate::config::{Config, DispatchBackend};
use authgate::db::{self, PgAccountRepository};
use authgate::dispatch::{Dispatcher, LogDispatcher, RedisDispatcher};
use authgate::{create_app, AccountPolicy, AccountService, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("config: {}", e))?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db_pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&db_pool).await?;
    let accounts = Arc::new(PgAccountRepository::new(db_pool));

    let dispatcher: Arc<dyn Dispatcher> = match config.dispatch_backend {
        DispatchBackend::Redis => Arc::new(RedisDispatcher::connect(&config.redis_url).await?),
        DispatchBackend::Log => {
            tracing::warn!("DISPATCH_BACKEND=log: verification links are not delivered");
            Arc::new(LogDispatcher)
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let jwt_secret = JwtSecret::new(
        &config.jwt_secret,
        chrono::Duration::seconds(config.access_token_ttl_secs),
        clock.clone(),
    );
    let policy = AccountPolicy {
        min_password_length: config.min_password_length,
        verification_ttl: chrono::Duration::seconds(config.verification_token_ttl_secs),
        verification_base_url: config.verification_base_url.clone(),
        dispatch_timeout: std::time::Duration::from_secs(config.dispatch_timeout_secs),
    };
    let account_service = AccountService::new(accounts, dispatcher, jwt_secret, clock, policy);

    let app = create_app(AppState::new(account_service));

    tracing::info!(addr = %config.server_addr, "listening");
    let listener = tokio::net::TcpListener::bind(config.server_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
