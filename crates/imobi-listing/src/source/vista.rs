//! HTTP client for the Vista listing API

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use imobi_common::ImobiError;
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use super::{ListingSource, SearchPage};
use crate::filter::{LISTING_FIELDS, Pesquisa};
use crate::model::{Listing, count};

/// Keys of a search response that describe pagination instead of a listing
const PAGINATION_KEYS: [&str; 4] = ["total", "paginas", "pagina", "quantidade"];

pub struct VistaClient {
    client: Client,
    base_url: String,
    key: String,
}

impl VistaClient {
    pub fn new(base_url: &str, key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<(StatusCode, String)> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "Calling listing API");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("key", self.key.as_str())])
            .query(query)
            .send()
            .await
            .map_err(|e| ImobiError::Upstream(format!("{}: {}", path, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImobiError::Upstream(format!("{}: {}", path, e)))?;

        Ok((status, body))
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> anyhow::Result<Value> {
        let (status, body) = self.get(path, query).await?;
        if !status.is_success() {
            return Err(upstream_status(path, status, &body).into());
        }
        parse_body(path, &body)
    }
}

fn upstream_status(path: &str, status: StatusCode, body: &str) -> ImobiError {
    let excerpt: String = body.chars().take(200).collect();
    ImobiError::Upstream(format!("{} returned {}: {}", path, status, excerpt))
}

fn parse_body(path: &str, body: &str) -> anyhow::Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| ImobiError::Upstream(format!("{} returned invalid JSON: {}", path, e)).into())
}

/// Split a search response into listings and pagination metadata.
/// Entries that do not parse as a listing are skipped.
pub fn parse_search_page(body: Value) -> anyhow::Result<SearchPage> {
    let Value::Object(map) = body else {
        return Err(ImobiError::Upstream("search response is not an object".to_string()).into());
    };

    let mut page = SearchPage {
        total: count(map.get("total")).unwrap_or_default(),
        paginas: count(map.get("paginas")).unwrap_or(1) as u32,
        pagina: count(map.get("pagina")).unwrap_or(1) as u32,
        quantidade: count(map.get("quantidade")).unwrap_or_default() as u32,
        ..Default::default()
    };

    for (key, value) in map {
        if PAGINATION_KEYS.contains(&key.as_str()) || !value.is_object() {
            continue;
        }
        match serde_json::from_value::<Listing>(value) {
            Ok(listing) => page.listings.push(listing),
            Err(e) => warn!(key = %key, error = %e, "Skipping malformed listing"),
        }
    }

    if page.total == 0 {
        page.total = page.listings.len() as u64;
    }

    Ok(page)
}

/// Distinct non-empty strings under `field` in a content response
pub fn parse_content(field: &str, body: &Value) -> Vec<String> {
    let values: Vec<&Value> = match body.get(field) {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    };

    let mut out: Vec<String> = values
        .into_iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();
    out.sort();
    out.dedup();
    out
}

fn detail_fields() -> Vec<Value> {
    let mut fields: Vec<Value> = LISTING_FIELDS.iter().map(|f| Value::from(*f)).collect();
    fields.push(json!({"Foto": ["Foto", "FotoPequena", "Destaque"]}));
    fields
}

#[async_trait]
impl ListingSource for VistaClient {
    async fn search(&self, pesquisa: &Pesquisa) -> anyhow::Result<SearchPage> {
        let body = self
            .get_json(
                "imoveis/listar",
                &[
                    ("pesquisa", serde_json::to_string(pesquisa)?),
                    ("showtotal", "1".to_string()),
                ],
            )
            .await?;

        parse_search_page(body)
    }

    async fn detail(&self, code: &str) -> anyhow::Result<Option<Listing>> {
        let pesquisa = json!({ "fields": detail_fields() });
        let path = "imoveis/detalhes";
        let (status, body) = self
            .get(
                path,
                &[("imovel", code.to_string()), ("pesquisa", pesquisa.to_string())],
            )
            .await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            // The API answers 400 with a message for unknown codes
            if status == StatusCode::BAD_REQUEST && body.contains("encontrado") {
                return Ok(None);
            }
            return Err(upstream_status(path, status, &body).into());
        }

        let value = parse_body(path, &body)?;
        if value.get("Codigo").is_none() {
            return Ok(None);
        }

        let listing = serde_json::from_value(value)
            .map_err(|e| ImobiError::Upstream(format!("{} returned a malformed listing: {}", path, e)))?;

        Ok(Some(listing))
    }

    async fn content(&self, field: &str, filter: Map<String, Value>) -> anyhow::Result<Vec<String>> {
        let mut pesquisa = json!({ "fields": [field] });
        if !filter.is_empty() {
            pesquisa["filter"] = Value::Object(filter);
        }

        let body = self
            .get_json("imoveis/listarConteudo", &[("pesquisa", pesquisa.to_string())])
            .await?;

        Ok(parse_content(field, &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_page() {
        let page = parse_search_page(json!({
            "101": {"Codigo": "101", "ValorVenda": "250000"},
            "102": {"Codigo": 102, "ValorLocacao": 1800},
            "103": {"ValorVenda": "1"},
            "total": "3",
            "paginas": 2,
            "pagina": "1",
            "quantidade": 50
        }))
        .unwrap();

        assert_eq!(page.total, 3);
        assert_eq!(page.paginas, 2);
        assert_eq!(page.pagina, 1);
        assert_eq!(page.quantidade, 50);
        let codes: Vec<_> = page.listings.iter().map(|l| l.codigo.as_str()).collect();
        assert_eq!(codes, vec!["101", "102"]);
    }

    #[test]
    fn test_parse_search_page_keeps_response_order() {
        let body: Value = serde_json::from_str(
            r#"{"930": {"Codigo": "930"}, "12": {"Codigo": "12"}, "455": {"Codigo": "455"},
                "total": 3, "paginas": 1, "pagina": 1, "quantidade": 3}"#,
        )
        .unwrap();
        let page = parse_search_page(body).unwrap();

        let codes: Vec<_> = page.listings.iter().map(|l| l.codigo.as_str()).collect();
        assert_eq!(codes, vec!["930", "12", "455"]);
    }

    #[test]
    fn test_parse_search_page_rejects_non_object() {
        assert!(parse_search_page(json!([])).is_err());
    }

    #[test]
    fn test_parse_content() {
        let body = json!({"Categoria": ["Casa", " Apartamento ", "", "Casa"]});
        assert_eq!(parse_content("Categoria", &body), vec!["Apartamento", "Casa"]);
        assert!(parse_content("Bairro", &body).is_empty());
    }

    #[test]
    fn test_client_trims_base_url() {
        let client =
            VistaClient::new("https://sandbox-rest.vistahost.com.br/", "key", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url, "https://sandbox-rest.vistahost.com.br");
    }
}
