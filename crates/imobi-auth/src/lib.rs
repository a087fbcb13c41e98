//! imobi Auth - Admin sessions and users
//!
//! Admin requests carry a signed session token (HS256 JWT) in the `session`
//! cookie. Tokens are verified on every request; users live in `usuarios`
//! with bcrypt password hashes.

pub mod model;
pub mod service;

pub use model::{SessionClaims, SessionContext};
