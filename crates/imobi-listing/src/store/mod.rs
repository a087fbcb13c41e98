//! Document store mirroring the listing API

pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::model::{Categories, City, Listing};

/// Key of the singleton categories document
pub const CATEGORIES_ID: &str = "tipos";

/// Candidate selection for similar listings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateQuery {
    pub cidade: Option<String>,
    pub finalidade: Option<String>,
    pub categoria: Option<String>,
    /// Accepted `Status` values
    pub statuses: Vec<String>,
    pub exclude_code: Option<String>,
    pub limit: usize,
}

impl CandidateQuery {
    pub fn matches(&self, listing: &Listing) -> bool {
        listing.cidade == self.cidade
            && listing.finalidade == self.finalidade
            && listing.categoria == self.categoria
            && listing
                .status
                .as_ref()
                .is_some_and(|s| self.statuses.contains(s))
            && self.exclude_code.as_deref() != Some(listing.codigo.as_str())
    }
}

#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn find_listing(&self, code: &str) -> anyhow::Result<Option<Listing>>;

    async fn find_candidates(&self, query: &CandidateQuery) -> anyhow::Result<Vec<Listing>>;

    /// Replace the stored document for this code, creating it when missing
    async fn upsert_listing(&self, listing: &Listing) -> anyhow::Result<()>;

    async fn list_cities(&self) -> anyhow::Result<Vec<City>>;

    async fn upsert_city(&self, city: &City) -> anyhow::Result<()>;

    async fn categories(&self) -> anyhow::Result<Option<Categories>>;

    async fn save_categories(&self, categories: &Categories) -> anyhow::Result<()>;

    async fn health_check(&self) -> anyhow::Result<()>;
}
