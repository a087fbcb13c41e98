//! Mirror the listing API into the document store

use std::collections::BTreeMap;

use imobi_common::sanitize_key;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::{info, warn};

use crate::filter::Pesquisa;
use crate::model::{Categories, City, Listing, Modality};
use crate::source::ListingSource;
use crate::store::ListingStore;

/// Outcome of a full listing sync. Failed pages and failed upserts are listed
/// so the caller can tell an incomplete mirror from a complete one.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    /// Distinct listing codes fetched
    pub listings: usize,
    pub pages: u32,
    pub failed_pages: Vec<u32>,
    pub upserted: usize,
    pub failed_upserts: Vec<String>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failed_pages.is_empty() && self.failed_upserts.is_empty()
    }
}

/// Fetch every page sequentially, merge by code and upsert each listing.
///
/// Page 1 decides the page count; its failure aborts the sync. Later pages
/// that fail are skipped and reported.
pub async fn fetch_all(
    source: &dyn ListingSource,
    page_size: u32,
) -> anyhow::Result<(BTreeMap<String, Listing>, u32, Vec<u32>)> {
    let pesquisa = Pesquisa::all(page_size);
    let first = source.search(&pesquisa.clone().with_page(1)).await?;
    let pages = first.paginas.max(1);

    let mut merged = BTreeMap::new();
    for listing in first.listings {
        merged.insert(listing.codigo.clone(), listing);
    }

    let mut failed_pages = Vec::new();
    for page in 2..=pages {
        match source.search(&pesquisa.clone().with_page(page)).await {
            Ok(result) => {
                for listing in result.listings {
                    merged.insert(listing.codigo.clone(), listing);
                }
            }
            Err(e) => {
                warn!(page, error = %e, "Listing page fetch failed, skipping");
                failed_pages.push(page);
            }
        }
    }

    Ok((merged, pages, failed_pages))
}

pub async fn sync_listings(
    source: &dyn ListingSource,
    store: &dyn ListingStore,
    page_size: u32,
) -> anyhow::Result<SyncReport> {
    let (merged, pages, failed_pages) = fetch_all(source, page_size).await?;

    let mut report = SyncReport {
        listings: merged.len(),
        pages,
        failed_pages,
        ..Default::default()
    };

    for (code, listing) in &merged {
        match store.upsert_listing(listing).await {
            Ok(()) => report.upserted += 1,
            Err(e) => {
                warn!(code = %code, error = %e, "Listing upsert failed");
                report.failed_upserts.push(code.clone());
            }
        }
    }

    info!(
        listings = report.listings,
        pages = report.pages,
        failed_pages = report.failed_pages.len(),
        upserted = report.upserted,
        failed_upserts = report.failed_upserts.len(),
        "Listing sync finished"
    );

    Ok(report)
}

fn status_filter(modality: Modality) -> Map<String, Value> {
    let mut filter = Map::new();
    filter.insert("Status".to_string(), json!(modality.statuses()));
    filter
}

/// Fetch sale and rental categories in parallel and store the `tipos` document
pub async fn refresh_categories(
    source: &dyn ListingSource,
    store: &dyn ListingStore,
) -> anyhow::Result<Categories> {
    let (venda, aluguel) = futures::try_join!(
        source.content("Categoria", status_filter(Modality::Venda)),
        source.content("Categoria", status_filter(Modality::Aluguel)),
    )?;

    let categories = Categories { venda, aluguel };
    store.save_categories(&categories).await?;

    info!(
        venda = categories.venda.len(),
        aluguel = categories.aluguel.len(),
        "Categories refreshed"
    );

    Ok(categories)
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRefreshReport {
    pub updated: Vec<String>,
    pub failed: Vec<String>,
}

/// Fetch city names, then each city's neighbourhoods, one city at a time
pub async fn refresh_cities(
    source: &dyn ListingSource,
    store: &dyn ListingStore,
) -> anyhow::Result<CityRefreshReport> {
    let names = source.content("Cidade", Map::new()).await?;
    let mut report = CityRefreshReport::default();

    for nome in names {
        let mut filter = Map::new();
        filter.insert("Cidade".to_string(), Value::from(nome.clone()));

        let result = match source.content("Bairro", filter).await {
            Ok(bairros) => {
                let city = City {
                    id: sanitize_key(&nome),
                    nome: nome.clone(),
                    bairros,
                    atualizado_em: chrono::Utc::now(),
                };
                store.upsert_city(&city).await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => report.updated.push(nome),
            Err(e) => {
                warn!(city = %nome, error = %e, "City refresh failed");
                report.failed.push(nome);
            }
        }
    }

    info!(
        updated = report.updated.len(),
        failed = report.failed.len(),
        "Cities refreshed"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use imobi_common::ImobiError;

    use super::*;
    use crate::source::SearchPage;
    use crate::store::memory::MemoryListingStore;

    /// Serves fixed pages and records which ones were requested
    struct FakeSource {
        pages: Vec<Vec<&'static str>>,
        failing_page: Option<u32>,
        requested: Mutex<Vec<u32>>,
        content_calls: AtomicUsize,
    }

    impl FakeSource {
        fn new(pages: Vec<Vec<&'static str>>) -> Self {
            Self {
                pages,
                failing_page: None,
                requested: Mutex::new(Vec::new()),
                content_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ListingSource for FakeSource {
        async fn search(&self, pesquisa: &Pesquisa) -> anyhow::Result<SearchPage> {
            let page = pesquisa.paginacao.pagina;
            self.requested.lock().unwrap().push(page);
            if self.failing_page == Some(page) {
                return Err(ImobiError::Upstream("boom".to_string()).into());
            }

            let listings = self.pages[(page - 1) as usize]
                .iter()
                .map(|code| Listing {
                    codigo: code.to_string(),
                    titulo_site: Some(format!("page {}", page)),
                    ..Default::default()
                })
                .collect();

            Ok(SearchPage {
                listings,
                total: 0,
                paginas: self.pages.len() as u32,
                pagina: page,
                quantidade: 50,
            })
        }

        async fn detail(&self, _code: &str) -> anyhow::Result<Option<Listing>> {
            Ok(None)
        }

        async fn content(&self, field: &str, filter: Map<String, Value>) -> anyhow::Result<Vec<String>> {
            self.content_calls.fetch_add(1, Ordering::SeqCst);
            match field {
                "Categoria" if filter["Status"][0] == "VENDA" => Ok(vec!["Casa".to_string()]),
                "Categoria" => Ok(vec!["Sala".to_string()]),
                "Cidade" => Ok(vec!["Piracicaba".to_string(), "São Pedro".to_string()]),
                "Bairro" if filter["Cidade"] == "São Pedro" => {
                    Err(ImobiError::Upstream("timeout".to_string()).into())
                }
                "Bairro" => Ok(vec!["Centro".to_string()]),
                _ => Ok(vec![]),
            }
        }
    }

    #[tokio::test]
    async fn test_fetches_remaining_pages_and_merges_by_code() {
        let source = FakeSource::new(vec![vec!["1", "2"], vec!["2", "3"], vec!["4"]]);
        let store = MemoryListingStore::new();

        let report = sync_listings(&source, &store, 50).await.unwrap();

        assert_eq!(*source.requested.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(report.pages, 3);
        assert_eq!(report.listings, 4);
        assert_eq!(report.upserted, 4);
        assert!(report.is_complete());

        let overwritten = store.find_listing("2").await.unwrap().unwrap();
        assert_eq!(overwritten.titulo_site.as_deref(), Some("page 2"));
    }

    #[tokio::test]
    async fn test_failed_page_is_reported() {
        let mut source = FakeSource::new(vec![vec!["1"], vec!["2"], vec!["3"]]);
        source.failing_page = Some(2);
        let store = MemoryListingStore::new();

        let report = sync_listings(&source, &store, 50).await.unwrap();

        assert_eq!(report.failed_pages, vec![2]);
        assert_eq!(report.listings, 2);
        assert!(!report.is_complete());
        assert!(store.find_listing("2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_first_page_failure_aborts() {
        let mut source = FakeSource::new(vec![vec!["1"], vec!["2"]]);
        source.failing_page = Some(1);
        let store = MemoryListingStore::new();

        assert!(sync_listings(&source, &store, 50).await.is_err());
        assert_eq!(*source.requested.lock().unwrap(), vec![1]);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_categories() {
        let source = FakeSource::new(vec![]);
        let store = MemoryListingStore::new();

        let categories = refresh_categories(&source, &store).await.unwrap();

        assert_eq!(source.content_calls.load(Ordering::SeqCst), 2);
        assert_eq!(categories.venda, vec!["Casa"]);
        assert_eq!(categories.aluguel, vec!["Sala"]);
        assert_eq!(store.categories().await.unwrap(), Some(categories));
    }

    #[tokio::test]
    async fn test_refresh_cities_reports_failures() {
        let source = FakeSource::new(vec![]);
        let store = MemoryListingStore::new();

        let report = refresh_cities(&source, &store).await.unwrap();

        assert_eq!(report.updated, vec!["Piracicaba"]);
        assert_eq!(report.failed, vec!["São Pedro"]);
        let cities = store.list_cities().await.unwrap();
        assert_eq!(cities.len(), 1);
        assert_eq!(cities[0].id, "piracicaba");
        assert_eq!(cities[0].bairros, vec!["Centro"]);
    }
}
