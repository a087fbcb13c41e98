//! Listing proxy endpoints under `/api/vista`
//!
//! Reads are served from the listing store. The POST endpoints pull fresh
//! data from the listing API into the store and require an admin session.

use std::str::FromStr;

use actix_web::{HttpRequest, HttpResponse, Scope, get, http::StatusCode, post, web};
use imobi_common::ImobiError;
use imobi_console::model::ApiResult;
use imobi_listing::{Listing, Modality, find_similar, sync, sync_listings};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::session::require_admin;
use crate::model::AppState;

#[get("/categorias")]
async fn categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = state.store().categories().await?.unwrap_or_default();
    Ok(ApiResult::http_success(categories))
}

#[post("/categorias")]
async fn refresh_categories(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let username = require_admin(&req)?;
    info!(%username, "Category refresh requested");

    let refreshed = sync::refresh_categories(state.source(), state.store()).await?;
    Ok(ApiResult::http_success(refreshed))
}

#[get("/cidades")]
async fn cities(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let cities = state.store().list_cities().await?;
    Ok(ApiResult::http_success(cities))
}

#[post("/cidades")]
async fn refresh_cities(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let username = require_admin(&req)?;
    info!(%username, "City refresh requested");

    let report = sync::refresh_cities(state.source(), state.store()).await?;
    let status = if report.failed.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok(HttpResponse::build(status).json(ApiResult::success(report)))
}

/// Full sync; 207 when some pages or upserts failed
#[post("/imoveis")]
async fn sync_all(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let username = require_admin(&req)?;
    info!(%username, "Listing sync requested");

    let report = sync_listings(
        state.source(),
        state.store(),
        state.configuration.vista_page_size(),
    )
    .await?;

    let status = if report.is_complete() {
        StatusCode::OK
    } else {
        StatusCode::MULTI_STATUS
    };
    Ok(HttpResponse::build(status).json(ApiResult::success(report)))
}

/// Stored listing, else the listing API's detail (stored on the way out)
pub async fn load_listing(state: &AppState, code: &str) -> anyhow::Result<Option<Listing>> {
    if let Some(found) = state.store().find_listing(code).await? {
        return Ok(Some(found));
    }

    let Some(found) = state.source().detail(code).await? else {
        return Ok(None);
    };
    if let Err(e) = state.store().upsert_listing(&found).await {
        warn!(code, error = %e, "Fetched listing could not be stored");
    }

    Ok(Some(found))
}

#[get("/imoveis/{codigo}")]
async fn listing(
    state: web::Data<AppState>,
    codigo: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let code = codigo.into_inner();
    let listing = load_listing(&state, &code)
        .await?
        .ok_or_else(|| ImobiError::not_found(format!("listing {}", code)))?;

    Ok(ApiResult::http_success(listing))
}

#[derive(Debug, Deserialize)]
struct SimilarQuery {
    modalidade: Option<String>,
}

#[get("/imoveis/{codigo}/semelhante")]
async fn similar(
    state: web::Data<AppState>,
    codigo: web::Path<String>,
    query: web::Query<SimilarQuery>,
) -> Result<HttpResponse, AppError> {
    let modality = query
        .modalidade
        .as_deref()
        .filter(|m| !m.trim().is_empty())
        .map(Modality::from_str)
        .transpose()?;

    let listings = find_similar(state.store(), &codigo, modality).await?;
    Ok(ApiResult::http_success(listings))
}

pub fn routes() -> Scope {
    web::scope("/vista")
        .service(categories)
        .service(refresh_categories)
        .service(cities)
        .service(refresh_cities)
        .service(sync_all)
        .service(similar)
        .service(listing)
}
