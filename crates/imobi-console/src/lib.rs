//! imobi Console - Admin JSON API
//!
//! Every back-office table is exposed under `/admin/api` through the same
//! generic scope. All endpoints require a verified admin session.

pub mod guard;
pub mod model;
pub mod resource;
pub mod route;
pub mod submission;

pub use imobi_auth::SessionContext;
pub use route::routes;
