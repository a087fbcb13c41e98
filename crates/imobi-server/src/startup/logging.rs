//! Console and rolling-file logging.
//!
//! Besides the root `imobi.log`, each component writes its own daily file:
//!
//! | Log File          | Component                     | Target Prefixes                          |
//! |-------------------|-------------------------------|------------------------------------------|
//! | imobi.log         | Root logger (all components)  | (all)                                    |
//! | listing.log       | Listing API, sync, similarity | imobi_listing, imobi_server::api::vista  |
//! | content.log       | Site content and leads        | imobi_content                            |
//! | console.log       | Admin JSON API                | imobi_console                            |
//! | auth.log          | Sessions and admin users      | imobi_auth, imobi_server::middleware     |
//! | persistence.log   | Relational store              | imobi_persistence                        |
//!
//! Log files live in `~/imobi/logs` unless `logging.dir` or `IMOBI_LOG_DIR`
//! says otherwise.

use std::path::PathBuf;

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

struct ComponentLogDef {
    file_name: &'static str,
    targets: &'static [&'static str],
}

const ROOT_LOG_FILE: &str = "imobi.log";

const COMPONENT_LOGS: &[ComponentLogDef] = &[
    ComponentLogDef {
        file_name: "listing.log",
        targets: &["imobi_listing", "imobi_server::api::vista"],
    },
    ComponentLogDef {
        file_name: "content.log",
        targets: &["imobi_content"],
    },
    ComponentLogDef {
        file_name: "console.log",
        targets: &["imobi_console"],
    },
    ComponentLogDef {
        file_name: "auth.log",
        targets: &[
            "imobi_auth",
            "imobi_server::middleware",
            "imobi_server::api::auth",
        ],
    },
    ComponentLogDef {
        file_name: "persistence.log",
        targets: &["imobi_persistence"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogRotation {
    Daily,
    Hourly,
    Never,
}

impl From<LogRotation> for Rotation {
    fn from(rotation: LogRotation) -> Self {
        match rotation {
            LogRotation::Daily => Rotation::DAILY,
            LogRotation::Hourly => Rotation::HOURLY,
            LogRotation::Never => Rotation::NEVER,
        }
    }
}

impl LogRotation {
    fn parse(raw: &str) -> Self {
        match raw.to_lowercase().as_str() {
            "hourly" => LogRotation::Hourly,
            "never" => LogRotation::Never,
            _ => LogRotation::Daily,
        }
    }
}

/// Logging configuration for the whole server.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub log_dir: PathBuf,
    pub console_output: bool,
    pub console_level: Level,
    pub file_logging: bool,
    pub file_level: Level,
    pub rotation: LogRotation,
}

fn default_log_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(format!("{}/imobi/logs", home))
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: default_log_dir(),
            console_output: true,
            console_level: Level::INFO,
            file_logging: false,
            file_level: Level::INFO,
            rotation: LogRotation::Daily,
        }
    }
}

impl LoggingConfig {
    /// Build from application configuration. `IMOBI_LOG_DIR`,
    /// `IMOBI_LOG_LEVEL` and `IMOBI_LOG_ROTATION` win over configured values.
    pub fn from_config(
        log_dir: Option<String>,
        console_output: bool,
        file_logging: bool,
        level: String,
    ) -> Self {
        let log_dir = std::env::var("IMOBI_LOG_DIR")
            .ok()
            .or(log_dir)
            .map(PathBuf::from)
            .unwrap_or_else(default_log_dir);

        let level = std::env::var("IMOBI_LOG_LEVEL")
            .unwrap_or(level)
            .parse()
            .unwrap_or(Level::INFO);

        let rotation = std::env::var("IMOBI_LOG_ROTATION")
            .map(|v| LogRotation::parse(&v))
            .unwrap_or(LogRotation::Daily);

        Self {
            log_dir,
            console_output,
            console_level: level,
            file_logging,
            file_level: level,
            rotation,
        }
    }
}

/// Keeps the non-blocking file writers alive; dropping it flushes them.
pub struct LoggingGuard {
    _file_guards: Vec<WorkerGuard>,
}

/// Install the global subscriber.
///
/// `RUST_LOG` overrides the configured level for the console and the root
/// file. Component files take everything their targets emit.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<LoggingGuard> {
    if config.file_logging {
        std::fs::create_dir_all(&config.log_dir)?;
    }

    let mut guards: Vec<WorkerGuard> = Vec::new();
    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    if config.console_output {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.console_level.to_string()));
        layers.push(Box::new(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_filter(filter),
        ));
    }

    if config.file_logging {
        let root_appender =
            RollingFileAppender::new(config.rotation.into(), &config.log_dir, ROOT_LOG_FILE);
        let (root_nb, root_guard) = tracing_appender::non_blocking(root_appender);
        guards.push(root_guard);

        let root_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.file_level.to_string()));
        layers.push(Box::new(
            fmt::layer()
                .with_writer(root_nb)
                .with_target(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
                .with_filter(root_filter),
        ));

        for component in COMPONENT_LOGS {
            let appender = RollingFileAppender::new(
                config.rotation.into(),
                &config.log_dir,
                component.file_name,
            );
            let (nb, guard) = tracing_appender::non_blocking(appender);
            guards.push(guard);

            let targets = component
                .targets
                .iter()
                .fold(Targets::new(), |targets, target| {
                    targets.with_target(*target, LevelFilter::TRACE)
                });

            layers.push(Box::new(
                fmt::layer()
                    .with_writer(nb)
                    .with_target(true)
                    .with_ansi(false)
                    .with_filter(targets),
            ));
        }
    }

    Registry::default()
        .with(layers)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    if config.file_logging {
        tracing::info!(
            log_dir = %config.log_dir.display(),
            component_files = COMPONENT_LOGS.len(),
            "File logging initialized"
        );
    }

    Ok(LoggingGuard {
        _file_guards: guards,
    })
}
