//! imobi Persistence - Relational entities and persistence helpers
//!
//! This crate provides:
//! - SeaORM entity definitions for site content, leads and admin users
//! - Schema bootstrap from the entity definitions
//! - Paging and bulk-operation result types
//! - Per-item bulk status/delete helpers shared by every admin resource

pub mod bulk;
pub mod entity;
pub mod model;
pub mod schema;
pub mod traits;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export entity prelude
pub use entity::prelude::*;

pub use model::{BulkFailure, BulkOutcome, Page};
pub use schema::create_schema;
pub use traits::{KeyedEntity, StatusEntity};
