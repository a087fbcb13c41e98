//! Captured leads

use actix_web::{HttpRequest, HttpResponse, Scope, get, post, web};
use imobi_content::{FormKind, lead};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::model::{ApiResult, BulkResult, IdsForm};
use crate::secured;

const DEFAULT_PAGE_SIZE: u64 = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParam {
    pub tipo: Option<String>,
    pub page_no: Option<u64>,
    pub page_size: Option<u64>,
}

#[get("")]
async fn search(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    params: web::Query<SearchParam>,
) -> HttpResponse {
    secured!(&req);

    let kind = match params.tipo.as_deref().filter(|t| !t.is_empty()) {
        Some(tipo) => match tipo.parse::<FormKind>() {
            Ok(kind) => Some(kind),
            Err(err) => return ApiResult::http_error(err.into()),
        },
        None => None,
    };

    let result = lead::search_page(
        &db,
        kind,
        params.page_no.unwrap_or(1),
        params.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    )
    .await;

    match result {
        Ok(page) => ApiResult::http_success(page),
        Err(err) => ApiResult::http_error(err),
    }
}

#[get("/{id}")]
async fn find(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> HttpResponse {
    secured!(&req);

    match lead::find(&db, id.into_inner()).await {
        Ok(submission) => ApiResult::http_success(submission),
        Err(err) => ApiResult::http_error(err),
    }
}

#[post("/delete")]
async fn delete(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    form: web::Json<IdsForm>,
) -> HttpResponse {
    secured!(&req);

    BulkResult::http_response(lead::delete(&db, &form.ids).await)
}

pub fn routes() -> Scope {
    web::scope("/formularios")
        .service(delete)
        .service(search)
        .service(find)
}
