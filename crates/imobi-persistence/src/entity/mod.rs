//! SeaORM entity definitions
//!
//! One module per table. Content tables share the `ordem`/`status` pair used by
//! the admin console for ordering and bulk activation.

pub mod banner;
pub mod broker;
pub mod chamada;
pub mod content_page;
pub mod form_submission;
pub mod prelude;
pub mod site_config;
pub mod slide;
pub mod user;
