//! imobi Listing - Property inventory backed by the Vista listing API
//!
//! This crate provides:
//! - The listing model with lenient decoding of the API's fields
//! - Search filter parsing and the upstream query built from it
//! - Titles and pagination for search pages
//! - The listing API client and the document store that mirrors it
//! - Full sync, category and city refresh, and similar-listing lookup

pub mod filter;
pub mod model;
pub mod pagination;
pub mod similar;
pub mod source;
pub mod store;
pub mod sync;
pub mod title;

pub use filter::{Pesquisa, SearchFilter, SortKey};
pub use model::{Action, Categories, City, Listing, Modality};
pub use similar::find_similar;
pub use source::{ListingSource, SearchPage, vista::VistaClient};
pub use store::{
    ListingStore, memory::MemoryListingStore, mongo::MongoListingStore,
};
pub use sync::{SyncReport, sync_listings};
