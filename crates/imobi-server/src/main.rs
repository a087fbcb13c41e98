//! Main entry point for the imobi server.

use std::sync::Arc;

use imobi_listing::{
    ListingSource, ListingStore, MemoryListingStore, MongoListingStore, VistaClient,
};
use imobi_server::{
    middleware::rate_limit::{self, RateLimiterState},
    model::{AppState, Configuration, StoreMode},
    startup,
};
use tracing::{info, warn};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let configuration = Configuration::new()?;
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    let database_connection = configuration.database_connection().await?;
    if configuration.database_create_schema() {
        imobi_persistence::create_schema(&database_connection).await?;
    }

    match configuration.bootstrap_admin() {
        Some((username, password)) => {
            imobi_auth::service::user::ensure_bootstrap_admin(
                &database_connection,
                &username,
                &password,
            )
            .await?;
        }
        None => {
            if imobi_auth::service::user::count(&database_connection).await? == 0 {
                warn!("No admin account exists and admin.username/admin.password are not set");
            }
        }
    }

    let listing_store: Arc<dyn ListingStore> = match configuration.store_mode() {
        StoreMode::Mongo => {
            let store = MongoListingStore::connect(
                &configuration.store_url(),
                &configuration.store_database(),
            )
            .await?;
            info!(database = %configuration.store_database(), "Using MongoDB listing store");
            Arc::new(store)
        }
        StoreMode::Memory => {
            info!("Using in-memory listing store");
            Arc::new(MemoryListingStore::new())
        }
    };

    if configuration.vista_key().is_empty() {
        warn!("vista.key is not set, listing API calls will be rejected upstream");
    }
    let listing_source: Arc<dyn ListingSource> = Arc::new(VistaClient::new(
        &configuration.vista_base_url(),
        &configuration.vista_key(),
        configuration.vista_timeout(),
    )?);

    let limiter = Arc::new(RateLimiterState::new(configuration.rate_limit_config()));
    let _cleanup_handle = rate_limit::start_cleanup_task(limiter.clone());

    let address = configuration.server_address();
    let port = configuration.server_port();
    let workers = configuration.server_workers();

    let app_state = AppState::new(
        configuration,
        database_connection,
        listing_store,
        listing_source,
    );

    info!(%address, port, "Starting imobi server");
    startup::http_server(app_state, limiter, address, port, workers)?.await?;
    info!("imobi server stopped");

    Ok(())
}
