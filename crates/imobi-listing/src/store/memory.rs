//! In-process listing store, used when no document database is configured

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;

use super::{CandidateQuery, ListingStore};
use crate::model::{Categories, City, Listing};

#[derive(Default)]
pub struct MemoryListingStore {
    listings: DashMap<String, Listing>,
    cities: DashMap<String, City>,
    categories: RwLock<Option<Categories>>,
}

impl MemoryListingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

#[async_trait]
impl ListingStore for MemoryListingStore {
    async fn find_listing(&self, code: &str) -> anyhow::Result<Option<Listing>> {
        Ok(self.listings.get(code).map(|entry| entry.value().clone()))
    }

    async fn find_candidates(&self, query: &CandidateQuery) -> anyhow::Result<Vec<Listing>> {
        let mut candidates: Vec<Listing> = self
            .listings
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        candidates.sort_by(|a, b| a.codigo.cmp(&b.codigo));
        candidates.truncate(query.limit);

        Ok(candidates)
    }

    async fn upsert_listing(&self, listing: &Listing) -> anyhow::Result<()> {
        self.listings
            .insert(listing.codigo.clone(), listing.clone());
        Ok(())
    }

    async fn list_cities(&self) -> anyhow::Result<Vec<City>> {
        let mut cities: Vec<City> = self.cities.iter().map(|e| e.value().clone()).collect();
        cities.sort_by(|a, b| a.nome.cmp(&b.nome));
        Ok(cities)
    }

    async fn upsert_city(&self, city: &City) -> anyhow::Result<()> {
        self.cities.insert(city.id.clone(), city.clone());
        Ok(())
    }

    async fn categories(&self) -> anyhow::Result<Option<Categories>> {
        Ok(self.categories.read().clone())
    }

    async fn save_categories(&self, categories: &Categories) -> anyhow::Result<()> {
        *self.categories.write() = Some(categories.clone());
        Ok(())
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
