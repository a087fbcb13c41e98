//! imobi server
//!
//! Public real-estate site, listing proxy API, lead forms and the admin
//! back office, served from one actix-web application.

pub mod api;
pub mod error;
pub mod middleware;
pub mod model;
pub mod site;
pub mod startup;
