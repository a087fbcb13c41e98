//! imobi Common - Shared error types and utilities
//!
//! This crate provides the foundational types used across all imobi components:
//! - Error types and error codes
//! - String helpers shared by the listing filter, content services and stores

pub mod error;
pub mod utils;

// Re-exports for convenience
pub use error::{AppError, ErrorCode, ImobiError};
pub use utils::{parse_flag, sanitize_key, split_list};

/// City used when a search does not name one
pub const DEFAULT_CITY: &str = "Piracicaba";

/// Origin tag stored with every lead captured by the public site
pub const ORGANIC_ORIGIN: &str = "organic";
