//! Public lead capture

use std::str::FromStr;
use std::sync::Arc;

use actix_web::dev::HttpServiceFactory;
use actix_web::{HttpResponse, http::header, post, web};
use imobi_content::{FormKind, LeadForm, lead};
use imobi_console::model::ApiResult;
use serde::Serialize;

use crate::error::AppError;
use crate::middleware::rate_limit::{RateLimiter, RateLimiterState};
use crate::model::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Submitted {
    id: i32,
    tipo: String,
}

/// Site-relative URL to return to after an HTML form post
fn return_path(url: Option<&str>) -> String {
    let path = url
        .filter(|u| u.starts_with('/') && !u.starts_with("//"))
        .unwrap_or("/");
    let separator = if path.contains('?') { '&' } else { '?' };
    format!("{}{}enviado=1", path, separator)
}

/// JSON bodies get `201` with the new id; HTML form posts are redirected
/// back to the page they came from
#[post("/{tipo}")]
async fn submit(
    state: web::Data<AppState>,
    tipo: web::Path<String>,
    form: web::Either<web::Json<LeadForm>, web::Form<LeadForm>>,
) -> Result<HttpResponse, AppError> {
    let kind = FormKind::from_str(&tipo)?;

    match form {
        web::Either::Left(json) => {
            let model = lead::submit(&state.database_connection, kind, json.into_inner()).await?;
            Ok(ApiResult::http_created(Submitted {
                id: model.id,
                tipo: model.tipo,
            }))
        }
        web::Either::Right(form) => {
            let form = form.into_inner();
            let location = return_path(form.url.as_deref());
            lead::submit(&state.database_connection, kind, form).await?;
            Ok(HttpResponse::SeeOther()
                .insert_header((header::LOCATION, location))
                .finish())
        }
    }
}

/// Lead routes, limited per client by `limiter`
pub fn routes(limiter: Arc<RateLimiterState>) -> impl HttpServiceFactory {
    web::scope("/formularios")
        .wrap(RateLimiter::new(limiter))
        .service(submit)
}
