//! Configuration management for the imobi server
//!
//! Settings come from `conf/application.yml` (optional), then `IMOBI_*`
//! environment variables (`__` separates nested keys, e.g.
//! `IMOBI_VISTA__KEY`), then command line overrides.

use std::time::Duration;

use clap::Parser;
use config::{Config, Environment, File};
use imobi_auth::model::DEFAULT_SESSION_TTL_SECONDS;
use imobi_common::DEFAULT_CITY;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::middleware::rate_limit::RateLimitConfig;
use crate::startup::logging::LoggingConfig;

pub const DEFAULT_CONFIG_FILE: &str = "conf/application.yml";
pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_PAGE_SIZE: u32 = 12;
pub const DEFAULT_SYNC_PAGE_SIZE: u32 = 50;

/// Command line arguments for the server
#[derive(Debug, Parser)]
#[command(name = "imobi-server", version, about = "Real-estate site and back office")]
pub struct Cli {
    /// Configuration file
    #[arg(short = 'c', long = "config", default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,
    #[arg(long = "db-url", env = "DATABASE_URL")]
    pub database_url: Option<String>,
    #[arg(long = "mongo-url", env = "MONGODB_URI")]
    pub mongo_url: Option<String>,
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

/// Where listings are mirrored
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreMode {
    Mongo,
    Memory,
}

/// Application configuration loaded from config files and environment
#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub config: Config,
}

impl Configuration {
    /// Load configuration using the process arguments
    pub fn new() -> anyhow::Result<Self> {
        Self::from_cli(Cli::parse())
    }

    pub fn from_cli(args: Cli) -> anyhow::Result<Self> {
        let mut builder = Config::builder()
            .add_source(File::with_name(&args.config).required(false))
            .add_source(
                Environment::with_prefix("IMOBI")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(v) = args.database_url {
            builder = builder.set_override("database.url", v)?;
        }
        if let Some(v) = args.mongo_url {
            builder = builder
                .set_override("store.mode", "mongo")?
                .set_override("store.url", v)?;
        }
        if let Some(v) = args.port {
            builder = builder.set_override("server.port", i64::from(v))?;
        }

        Ok(Self::from_config(builder.build()?))
    }

    pub fn from_config(config: Config) -> Self {
        Configuration { config }
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.config
            .get_string(key)
            .unwrap_or_else(|_| default.to_string())
    }

    fn optional_string(&self, key: &str) -> Option<String> {
        self.config
            .get_string(key)
            .ok()
            .filter(|v| !v.trim().is_empty())
    }

    // ========================================================================
    // Server
    // ========================================================================

    pub fn server_address(&self) -> String {
        self.string_or("server.address", "0.0.0.0")
    }

    pub fn server_port(&self) -> u16 {
        self.config
            .get_int("server.port")
            .ok()
            .and_then(|v| u16::try_from(v).ok())
            .unwrap_or(DEFAULT_SERVER_PORT)
    }

    pub fn server_workers(&self) -> Option<usize> {
        self.config
            .get_int("server.workers")
            .ok()
            .and_then(|v| usize::try_from(v).ok())
            .filter(|v| *v > 0)
    }

    // ========================================================================
    // Site
    // ========================================================================

    /// Public base URL, without the trailing slash
    pub fn site_base_url(&self) -> String {
        self.string_or("site.base_url", "http://localhost:3000")
            .trim_end_matches('/')
            .to_string()
    }

    pub fn site_name(&self) -> String {
        self.string_or("site.name", "imobi")
    }

    pub fn site_default_city(&self) -> String {
        self.string_or("site.default_city", DEFAULT_CITY)
    }

    /// Results per search page
    pub fn site_page_size(&self) -> u32 {
        self.config
            .get_int("site.page_size")
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    // ========================================================================
    // Relational database
    // ========================================================================

    pub fn database_url(&self) -> anyhow::Result<String> {
        Ok(self.config.get_string("database.url")?)
    }

    /// Create missing tables at startup
    pub fn database_create_schema(&self) -> bool {
        self.config
            .get_bool("database.create_schema")
            .unwrap_or(true)
    }

    pub async fn database_connection(&self) -> anyhow::Result<DatabaseConnection> {
        let max_connections = self
            .config
            .get_int("database.pool.max_connections")
            .unwrap_or(10) as u32;
        let min_connections = self
            .config
            .get_int("database.pool.min_connections")
            .unwrap_or(1) as u32;
        let connect_timeout = self
            .config
            .get_int("database.pool.connect_timeout")
            .unwrap_or(30) as u64;
        let idle_timeout = self
            .config
            .get_int("database.pool.idle_timeout")
            .unwrap_or(600) as u64;
        let sqlx_logging = self
            .config
            .get_bool("database.pool.sqlx_logging")
            .unwrap_or(false);

        let mut opt = ConnectOptions::new(self.database_url()?);

        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(connect_timeout))
            .idle_timeout(Duration::from_secs(idle_timeout))
            .sqlx_logging(sqlx_logging);

        tracing::info!(
            max_connections,
            min_connections,
            connect_timeout,
            idle_timeout,
            sqlx_logging,
            "Database connection pool configured"
        );

        Ok(Database::connect(opt).await?)
    }

    // ========================================================================
    // Document store
    // ========================================================================

    pub fn store_mode(&self) -> StoreMode {
        match self.string_or("store.mode", "memory").to_lowercase().as_str() {
            "mongo" | "mongodb" => StoreMode::Mongo,
            _ => StoreMode::Memory,
        }
    }

    pub fn store_url(&self) -> String {
        self.string_or("store.url", "mongodb://localhost:27017")
    }

    pub fn store_database(&self) -> String {
        self.string_or("store.database", "imobi")
    }

    // ========================================================================
    // Listing API
    // ========================================================================

    pub fn vista_base_url(&self) -> String {
        self.string_or("vista.base_url", "http://sandbox-rest.vistahost.com.br")
    }

    pub fn vista_key(&self) -> String {
        self.string_or("vista.key", "")
    }

    /// Listings requested per page during a full sync
    pub fn vista_page_size(&self) -> u32 {
        self.config
            .get_int("vista.page_size")
            .ok()
            .and_then(|v| u32::try_from(v).ok())
            .filter(|v| (1..=50).contains(v))
            .unwrap_or(DEFAULT_SYNC_PAGE_SIZE)
    }

    pub fn vista_timeout(&self) -> Duration {
        Duration::from_secs(self.config.get_int("vista.timeout_seconds").unwrap_or(30) as u64)
    }

    // ========================================================================
    // Sessions and admin
    // ========================================================================

    /// Base64 HS256 secret; a random one is used when unset
    pub fn session_secret(&self) -> Option<String> {
        self.optional_string("session.secret")
    }

    pub fn session_ttl_seconds(&self) -> i64 {
        self.config
            .get_int("session.ttl_seconds")
            .ok()
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_SESSION_TTL_SECONDS)
    }

    pub fn session_secure_cookie(&self) -> bool {
        self.config
            .get_bool("session.secure_cookie")
            .unwrap_or(false)
    }

    /// Credentials for the first admin, created only while `usuarios` is empty
    pub fn bootstrap_admin(&self) -> Option<(String, String)> {
        let username = self.optional_string("admin.username")?;
        let password = self.optional_string("admin.password")?;
        Some((username, password))
    }

    // ========================================================================
    // Image hosting
    // ========================================================================

    pub fn cloudinary_cloud_name(&self) -> Option<String> {
        self.optional_string("cloudinary.cloud_name")
    }

    pub fn cloudinary_api_key(&self) -> Option<String> {
        self.optional_string("cloudinary.api_key")
    }

    pub fn cloudinary_api_secret(&self) -> Option<String> {
        self.optional_string("cloudinary.api_secret")
    }

    // ========================================================================
    // Rate limiting
    // ========================================================================

    pub fn rate_limit_config(&self) -> RateLimitConfig {
        RateLimitConfig {
            max_requests: self
                .config
                .get_int("rate_limit.leads.max_requests")
                .unwrap_or(10) as u32,
            window_duration: Duration::from_secs(
                self.config
                    .get_int("rate_limit.leads.window_seconds")
                    .unwrap_or(60) as u64,
            ),
            enabled: self
                .config
                .get_bool("rate_limit.leads.enabled")
                .unwrap_or(true),
        }
    }

    // ========================================================================
    // Logging
    // ========================================================================

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_config(
            self.optional_string("logging.dir"),
            self.config.get_bool("logging.console").unwrap_or(true),
            self.config.get_bool("logging.file").unwrap_or(false),
            self.string_or("logging.level", "info"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configuration(yaml: &str) -> Configuration {
        let config = Config::builder()
            .add_source(File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap();
        Configuration::from_config(config)
    }

    #[test]
    fn test_defaults() {
        let conf = configuration("{}");
        assert_eq!(conf.server_port(), DEFAULT_SERVER_PORT);
        assert_eq!(conf.site_default_city(), "Piracicaba");
        assert_eq!(conf.site_page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(conf.store_mode(), StoreMode::Memory);
        assert_eq!(conf.session_ttl_seconds(), DEFAULT_SESSION_TTL_SECONDS);
        assert!(conf.database_url().is_err());
        assert!(conf.bootstrap_admin().is_none());
        assert!(conf.session_secret().is_none());
    }

    #[test]
    fn test_values_from_yaml() {
        let conf = configuration(
            r#"
server:
  port: 8080
site:
  base_url: "https://imobi.test/"
  page_size: 24
store:
  mode: mongo
vista:
  page_size: 500
admin:
  username: admin
  password: secret
cloudinary:
  api_secret: ""
"#,
        );
        assert_eq!(conf.server_port(), 8080);
        assert_eq!(conf.site_base_url(), "https://imobi.test");
        assert_eq!(conf.site_page_size(), 24);
        assert_eq!(conf.store_mode(), StoreMode::Mongo);
        assert_eq!(conf.vista_page_size(), DEFAULT_SYNC_PAGE_SIZE);
        assert_eq!(
            conf.bootstrap_admin(),
            Some(("admin".to_string(), "secret".to_string()))
        );
        assert!(conf.cloudinary_api_secret().is_none());
    }

    #[test]
    fn test_cli_overrides() {
        let args = Cli::parse_from([
            "imobi-server",
            "--config",
            "does/not/exist.yml",
            "--db-url",
            "sqlite::memory:",
            "--mongo-url",
            "mongodb://db:27017",
            "--port",
            "9090",
        ]);
        let conf = Configuration::from_cli(args).unwrap();
        assert_eq!(conf.database_url().unwrap(), "sqlite::memory:");
        assert_eq!(conf.store_mode(), StoreMode::Mongo);
        assert_eq!(conf.store_url(), "mongodb://db:27017");
        assert_eq!(conf.server_port(), 9090);
    }
}
