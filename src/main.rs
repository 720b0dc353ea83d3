use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use barangay_registry::access::ScopeResolver;
use barangay_registry::auth::JwtVerifier;
use barangay_registry::config::{self, StoreBackend};
use barangay_registry::database::manager::DatabaseManager;
use barangay_registry::database::memory::InMemoryStore;
use barangay_registry::database::postgres::PgStore;
use barangay_registry::database::store::EntityStore;
use barangay_registry::{app, is_development, AppState, RegistryService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::config();
    info!("Starting Barangay Registry in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        warn!("JWT_SECRET is not set; every scoped request will be rejected");
    }

    let store: Arc<dyn EntityStore> = match config.store.backend {
        StoreBackend::Memory => {
            if !is_development!() {
                warn!("Using the in-memory store outside development; data is lost on restart");
            }
            Arc::new(InMemoryStore::new())
        }
        StoreBackend::Postgres => {
            let pool = DatabaseManager::pool()
                .await
                .context("failed to connect to the registry database")?;
            let store = PgStore::new(pool);
            if config.store.ensure_schema {
                store.ensure_schema().await.context("failed to create schema")?;
            }
            Arc::new(store)
        }
    };
    info!("Entity store: {}", store.backend());

    let resolver = ScopeResolver::new(Arc::new(JwtVerifier::from_config()));
    let state = AppState::new(RegistryService::new(store), resolver);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Barangay Registry listening on http://{}", bind_addr);

    axum::serve(listener, app(state)).await.context("server error")?;

    DatabaseManager::close().await;
    Ok(())
}
