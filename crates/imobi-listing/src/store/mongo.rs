//! MongoDB listing store
//!
//! Collections: `imoveis` (one document per listing, unique on `Codigo`),
//! `cidades` (keyed by sanitized city name) and `categorias` (the single
//! `tipos` document).

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{CATEGORIES_ID, CandidateQuery, ListingStore};
use crate::model::{Categories, City, Listing};

const LISTINGS: &str = "imoveis";
const CITIES: &str = "cidades";
const CATEGORIES: &str = "categorias";

#[derive(Serialize, Deserialize)]
struct CategoriesDocument {
    #[serde(rename = "_id")]
    id: String,
    #[serde(flatten)]
    categories: Categories,
}

pub struct MongoListingStore {
    database: Database,
}

fn optional(value: &Option<String>) -> Bson {
    value
        .as_ref()
        .map(|v| Bson::String(v.clone()))
        .unwrap_or(Bson::Null)
}

impl MongoListingStore {
    /// Connect and make sure the listing code index exists
    pub async fn connect(uri: &str, database: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self {
            database: client.database(database),
        };

        store
            .listings()
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "Codigo": 1 })
                    .options(IndexOptions::builder().unique(true).build())
                    .build(),
            )
            .await?;

        info!(database, "Connected to document store");

        Ok(store)
    }

    fn listings(&self) -> Collection<Listing> {
        self.database.collection(LISTINGS)
    }

    fn cities(&self) -> Collection<City> {
        self.database.collection(CITIES)
    }

    fn category_docs(&self) -> Collection<CategoriesDocument> {
        self.database.collection(CATEGORIES)
    }

    fn candidate_filter(query: &CandidateQuery) -> Document {
        let mut filter = doc! {
            "Cidade": optional(&query.cidade),
            "Finalidade": optional(&query.finalidade),
            "Categoria": optional(&query.categoria),
            "Status": { "$in": query.statuses.clone() },
        };
        if let Some(code) = &query.exclude_code {
            filter.insert("Codigo", doc! { "$ne": code.clone() });
        }
        filter
    }
}

#[async_trait]
impl ListingStore for MongoListingStore {
    async fn find_listing(&self, code: &str) -> anyhow::Result<Option<Listing>> {
        let listing = self
            .listings()
            .find_one(doc! { "Codigo": code })
            .projection(doc! { "_id": 0 })
            .await?;

        Ok(listing)
    }

    async fn find_candidates(&self, query: &CandidateQuery) -> anyhow::Result<Vec<Listing>> {
        let cursor = self
            .listings()
            .find(Self::candidate_filter(query))
            .projection(doc! { "_id": 0 })
            .limit(query.limit as i64)
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn upsert_listing(&self, listing: &Listing) -> anyhow::Result<()> {
        self.listings()
            .replace_one(doc! { "Codigo": listing.codigo.as_str() }, listing)
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn list_cities(&self) -> anyhow::Result<Vec<City>> {
        let cursor = self
            .cities()
            .find(doc! {})
            .sort(doc! { "nome": 1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    async fn upsert_city(&self, city: &City) -> anyhow::Result<()> {
        self.cities()
            .replace_one(doc! { "_id": city.id.as_str() }, city)
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn categories(&self) -> anyhow::Result<Option<Categories>> {
        let document = self
            .category_docs()
            .find_one(doc! { "_id": CATEGORIES_ID })
            .await?;

        Ok(document.map(|d| d.categories))
    }

    async fn save_categories(&self, categories: &Categories) -> anyhow::Result<()> {
        let document = CategoriesDocument {
            id: CATEGORIES_ID.to_string(),
            categories: categories.clone(),
        };

        self.category_docs()
            .replace_one(doc! { "_id": CATEGORIES_ID }, &document)
            .upsert(true)
            .await?;

        Ok(())
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
