//! Public site rendered on the server

pub mod format;
pub mod pages;
pub mod render;

pub use pages::{configure, not_found};
