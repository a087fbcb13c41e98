//! Listing API access

pub mod vista;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::filter::Pesquisa;
use crate::model::Listing;

/// One page of search results
#[derive(Clone, Debug, Default, Serialize)]
pub struct SearchPage {
    /// Listings in the order the API keyed them
    pub listings: Vec<Listing>,
    pub total: u64,
    pub paginas: u32,
    pub pagina: u32,
    pub quantidade: u32,
}

#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn search(&self, pesquisa: &Pesquisa) -> anyhow::Result<SearchPage>;

    /// Full record for one listing, `None` when the API does not know the code
    async fn detail(&self, code: &str) -> anyhow::Result<Option<Listing>>;

    /// Distinct values of `field` among listings matching `filter`
    async fn content(&self, field: &str, filter: Map<String, Value>) -> anyhow::Result<Vec<String>>;
}
