//! Generic CRUD scope for every [`AdminResource`]

use actix_web::{HttpRequest, HttpResponse, Scope, web};
use imobi_content::AdminResource;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::model::{ApiResult, BulkResult, IdsForm};
use crate::secured;

async fn list<R: AdminResource>(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
) -> HttpResponse {
    secured!(&req);

    match R::list(&db).await {
        Ok(items) => ApiResult::http_success(items),
        Err(err) => ApiResult::http_error(err),
    }
}

async fn find<R: AdminResource>(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
) -> HttpResponse {
    secured!(&req);

    match R::find(&db, id.into_inner()).await {
        Ok(item) => ApiResult::http_success(item),
        Err(err) => ApiResult::http_error(err),
    }
}

async fn create<R: AdminResource>(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    form: web::Json<R::Form>,
) -> HttpResponse {
    let username = secured!(&req);

    match R::create(&db, form.into_inner()).await {
        Ok(item) => {
            info!(resource = R::NAME, %username, "Created from console");
            ApiResult::http_created(item)
        }
        Err(err) => ApiResult::http_error(err),
    }
}

async fn update<R: AdminResource>(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    id: web::Path<i32>,
    form: web::Json<R::Form>,
) -> HttpResponse {
    let username = secured!(&req);
    let id = id.into_inner();

    match R::update(&db, id, form.into_inner()).await {
        Ok(item) => {
            info!(resource = R::NAME, id, %username, "Updated from console");
            ApiResult::http_success(item)
        }
        Err(err) => ApiResult::http_error(err),
    }
}

async fn activate<R: AdminResource>(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    form: web::Json<IdsForm>,
) -> HttpResponse {
    secured!(&req);

    BulkResult::http_response(R::set_status(&db, &form.ids, true).await)
}

async fn deactivate<R: AdminResource>(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    form: web::Json<IdsForm>,
) -> HttpResponse {
    secured!(&req);

    BulkResult::http_response(R::set_status(&db, &form.ids, false).await)
}

async fn delete<R: AdminResource>(
    req: HttpRequest,
    db: web::Data<DatabaseConnection>,
    form: web::Json<IdsForm>,
) -> HttpResponse {
    let username = secured!(&req);

    let outcome = R::delete(&db, &form.ids).await;
    info!(
        resource = R::NAME,
        %username,
        deleted = outcome.succeeded.len(),
        "Deleted from console"
    );

    BulkResult::http_response(outcome)
}

/// `GET ""`, `POST ""`, `GET|PUT "/{id}"` and the bulk actions for `R`
pub fn scope<R: AdminResource>(path: &str) -> Scope {
    web::scope(path)
        .service(web::resource("/activate").route(web::post().to(activate::<R>)))
        .service(web::resource("/deactivate").route(web::post().to(deactivate::<R>)))
        .service(web::resource("/delete").route(web::post().to(delete::<R>)))
        .service(
            web::resource("")
                .route(web::get().to(list::<R>))
                .route(web::post().to(create::<R>)),
        )
        .service(
            web::resource("/{id}")
                .route(web::get().to(find::<R>))
                .route(web::put().to(update::<R>)),
        )
}
