//! Server-rendered public pages

use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, get, http::StatusCode, web};
use imobi_common::{AppError, ImobiError};
use imobi_content::{banner, broker, chamada, page, site_config, slide};
use imobi_listing::title::listing_title;
use imobi_listing::{Categories, SearchFilter, find_similar};
use tracing::{error, warn};

use super::render::{self, Chrome, PageMeta, esc};
use crate::api::search::run_search;
use crate::api::vista::load_listing;
use crate::model::AppState;

fn html(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// Header and footer data; a failing lookup only costs its section
async fn chrome(state: &AppState) -> Chrome {
    let db = &state.database_connection;
    let config = site_config::get(db).await.unwrap_or_else(|e| {
        warn!(error = %e, "Site configuration unavailable");
        None
    });
    let pages = page::list_published(db).await.unwrap_or_else(|e| {
        warn!(error = %e, "Content pages unavailable");
        Vec::new()
    });

    Chrome {
        site_name: state.configuration.site_name(),
        base_url: state.configuration.site_base_url(),
        config,
        pages,
    }
}

async fn error_page(state: &AppState, status: StatusCode, path: &str) -> HttpResponse {
    let chrome = chrome(state).await;
    let meta = PageMeta {
        title: status.canonical_reason().unwrap_or("Erro").to_string(),
        description: String::new(),
        path: path.to_string(),
    };
    let body = render::error_body(status.as_u16());
    html(status, render::layout(&chrome, &meta, &body))
}

/// Error page for a failed service call, using the error's HTTP status
async fn failure_page(state: &AppState, err: anyhow::Error, path: &str) -> HttpResponse {
    let err = AppError::from(err);
    let (_, status) = err.code_and_status();
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(path, error = %err, "Page failed");
    }
    error_page(state, status, path).await
}

/// Filter lists for the search box
async fn search_options(state: &AppState) -> (Categories, Vec<imobi_listing::City>) {
    let categories = match state.store().categories().await {
        Ok(categories) => categories.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Categories unavailable");
            Categories::default()
        }
    };
    let cities = state.store().list_cities().await.unwrap_or_else(|e| {
        warn!(error = %e, "Cities unavailable");
        Vec::new()
    });
    (categories, cities)
}

#[get("/")]
async fn home(state: web::Data<AppState>) -> HttpResponse {
    let db = &state.database_connection;
    let content = futures::try_join!(
        banner::list_active(db),
        slide::list_active(db),
        chamada::list_active(db),
    );
    let (banners, slides, chamadas) = match content {
        Ok(content) => content,
        Err(e) => return failure_page(&state, e, "/").await,
    };

    let chrome = chrome(&state).await;
    let (categories, cities) = search_options(&state).await;
    let mut filter = SearchFilter::default();
    filter.cidade = state.configuration.site_default_city();

    let body = [
        render::slides(&slides),
        render::search_form(&filter, &categories, &cities),
        render::banners(&banners),
        render::chamadas(&chamadas),
    ]
    .concat();
    let meta = PageMeta {
        title: String::new(),
        description: format!(
            "Imóveis à venda e para alugar em {}",
            state.configuration.site_default_city()
        ),
        path: "/".to_string(),
    };

    html(StatusCode::OK, render::layout(&chrome, &meta, &body))
}

#[get("/busca")]
async fn search(
    state: web::Data<AppState>,
    params: web::Query<HashMap<String, String>>,
) -> HttpResponse {
    let result = match run_search(&state, &params).await {
        Ok(result) => result,
        Err(e) => return failure_page(&state, e, "/busca").await,
    };

    let chrome = chrome(&state).await;
    let (categories, cities) = search_options(&state).await;
    let modality = result.filtro.modality();

    let body = format!(
        r#"{}<h1>{}</h1><p class="summary">{}</p>{}{}"#,
        render::search_form(&result.filtro, &categories, &cities),
        esc(&result.titulo),
        esc(&result.descricao),
        render::listing_grid(&result.page.listings, modality),
        render::pagination(&result.filtro, result.page.paginas),
    );
    let meta = PageMeta {
        title: result.titulo.clone(),
        description: result.descricao.clone(),
        path: format!("/busca?{}", result.filtro.to_query_string(result.filtro.pagina)),
    };

    html(StatusCode::OK, render::layout(&chrome, &meta, &body))
}

#[get("/imovel/{codigo}")]
async fn listing(
    req: HttpRequest,
    state: web::Data<AppState>,
    codigo: web::Path<String>,
) -> HttpResponse {
    let path = req.path().to_string();
    let listing = match load_listing(&state, &codigo).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return error_page(&state, StatusCode::NOT_FOUND, &path).await,
        Err(e) => return failure_page(&state, e, &path).await,
    };

    let modality = listing.inferred_modality();
    let similar = match find_similar(state.store(), &listing.codigo, Some(modality)).await {
        Ok(similar) => similar,
        Err(e) => {
            warn!(code = %listing.codigo, error = %e, "Similar listings unavailable");
            Vec::new()
        }
    };

    let sent = req.query_string().contains("enviado=1");
    let body = [
        render::listing_detail(&listing, modality, sent),
        render::similar_section(&similar, modality),
    ]
    .concat();

    let chrome = chrome(&state).await;
    let meta = PageMeta {
        title: listing_title(&listing),
        description: listing
            .descricao_web
            .as_deref()
            .map(|d| d.chars().take(160).collect())
            .unwrap_or_else(|| listing_title(&listing)),
        path,
    };

    html(StatusCode::OK, render::layout(&chrome, &meta, &body))
}

#[get("/pagina/{slug}")]
async fn content_page(
    req: HttpRequest,
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> HttpResponse {
    let page = match page::find_published_by_slug(&state.database_connection, &slug).await {
        Ok(Some(page)) => page,
        Ok(None) => return error_page(&state, StatusCode::NOT_FOUND, req.path()).await,
        Err(e) => return failure_page(&state, e, req.path()).await,
    };

    let chrome = chrome(&state).await;
    let meta = PageMeta {
        title: page.titulo.clone(),
        description: page.subtitulo.clone().unwrap_or_default(),
        path: req.path().to_string(),
    };

    html(
        StatusCode::OK,
        render::layout(&chrome, &meta, &render::content_page(&page)),
    )
}

#[get("/corretores")]
async fn brokers(state: web::Data<AppState>) -> HttpResponse {
    let brokers = match broker::list_active(&state.database_connection).await {
        Ok(brokers) => brokers,
        Err(e) => return failure_page(&state, e, "/corretores").await,
    };

    let chrome = chrome(&state).await;
    let meta = PageMeta {
        title: "Corretores".to_string(),
        description: "Fale com um dos nossos corretores".to_string(),
        path: "/corretores".to_string(),
    };

    html(
        StatusCode::OK,
        render::layout(&chrome, &meta, &render::brokers(&brokers)),
    )
}

/// Default service for unmatched paths
pub async fn not_found(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if req.path().starts_with("/api/") || req.path().starts_with("/admin/") {
        let err = crate::error::AppError::from(ImobiError::not_found(format!(
            "route {}",
            req.path()
        )));
        return actix_web::ResponseError::error_response(&err);
    }
    error_page(&state, StatusCode::NOT_FOUND, req.path()).await
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home)
        .service(search)
        .service(listing)
        .service(content_page)
        .service(brokers);
}
