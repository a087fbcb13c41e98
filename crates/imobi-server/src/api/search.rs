//! Search endpoint backing the results page

use std::collections::HashMap;

use actix_web::{HttpResponse, get, web};
use imobi_console::model::ApiResult;
use imobi_listing::title::{search_description, search_title};
use imobi_listing::{SearchFilter, SearchPage};
use serde::Serialize;

use crate::error::AppError;
use crate::model::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub titulo: String,
    pub descricao: String,
    pub filtro: SearchFilter,
    #[serde(flatten)]
    pub page: SearchPage,
}

/// Parse the filter and run it against the listing API
pub async fn run_search(
    state: &AppState,
    params: &HashMap<String, String>,
) -> anyhow::Result<SearchResult> {
    let mut filter = SearchFilter::parse(params);
    if params.get("cidade").is_none_or(|c| c.trim().is_empty()) {
        filter.cidade = state.configuration.site_default_city();
    }

    let pesquisa = filter.to_pesquisa(state.configuration.site_page_size());
    let page = state.source().search(&pesquisa).await?;

    Ok(SearchResult {
        titulo: search_title(&filter),
        descricao: search_description(&filter, page.total),
        filtro: filter,
        page,
    })
}

#[get("/busca")]
async fn search(
    state: web::Data<AppState>,
    params: web::Query<HashMap<String, String>>,
) -> Result<HttpResponse, AppError> {
    let result = run_search(&state, &params).await?;
    Ok(ApiResult::http_success(result))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(search);
}
