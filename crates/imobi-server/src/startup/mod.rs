pub mod http;
pub mod logging;

pub use http::{configure_app, http_server};
pub use logging::{LoggingConfig, LoggingGuard, init_logging};
