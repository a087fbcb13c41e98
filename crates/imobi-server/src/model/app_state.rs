//! Shared application state handed to every handler

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use imobi_listing::{ListingSource, ListingStore};
use sea_orm::DatabaseConnection;
use tracing::warn;

use super::config::Configuration;

#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    pub database_connection: DatabaseConnection,
    pub listing_store: Arc<dyn ListingStore>,
    pub listing_source: Arc<dyn ListingSource>,
    /// Base64 HS256 secret for admin session tokens
    pub session_secret: String,
}

impl AppState {
    pub fn new(
        configuration: Configuration,
        database_connection: DatabaseConnection,
        listing_store: Arc<dyn ListingStore>,
        listing_source: Arc<dyn ListingSource>,
    ) -> Self {
        let session_secret = configuration.session_secret().unwrap_or_else(|| {
            warn!("session.secret is not set, admin sessions will not survive a restart");
            random_secret()
        });

        Self {
            configuration,
            database_connection,
            listing_store,
            listing_source,
            session_secret,
        }
    }

    pub fn store(&self) -> &dyn ListingStore {
        self.listing_store.as_ref()
    }

    pub fn source(&self) -> &dyn ListingSource {
        self.listing_source.as_ref()
    }
}

/// 32 random bytes, base64 encoded
fn random_secret() -> String {
    let mut bytes = Vec::with_capacity(32);
    bytes.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
    bytes.extend_from_slice(uuid::Uuid::new_v4().as_bytes());
    STANDARD.encode(bytes)
}
