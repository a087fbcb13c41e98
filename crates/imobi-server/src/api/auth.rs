//! Admin login, logout and session lookup

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{HttpMessage, HttpRequest, HttpResponse, Scope, get, post, web};
use imobi_auth::model::{LoginForm, MAX_PASSWORD_LENGTH, SESSION_COOKIE};
use imobi_auth::service::{token, user};
use imobi_common::ImobiError;
use imobi_console::model::ApiResult;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::middleware::session::require_admin;
use crate::model::AppState;

const INVALID_CREDENTIALS: &str = "invalid username or password";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    username: String,
    expires_in: i64,
}

fn session_cookie(state: &AppState, value: String, max_age: CookieDuration) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.configuration.session_secure_cookie())
        .max_age(max_age)
        .finish()
}

/// Accepts JSON or an HTML form post
#[post("/login")]
async fn login(
    state: web::Data<AppState>,
    form: web::Either<web::Json<LoginForm>, web::Form<LoginForm>>,
) -> Result<HttpResponse, AppError> {
    let form = match form {
        web::Either::Left(json) => json.into_inner(),
        web::Either::Right(form) => form.into_inner(),
    };

    if form.username.trim().is_empty()
        || form.password.is_empty()
        || form.password.len() > MAX_PASSWORD_LENGTH
    {
        return Err(ImobiError::Auth(INVALID_CREDENTIALS.to_string()).into());
    }

    let username =
        user::verify_credentials(&state.database_connection, form.username.trim(), &form.password)
            .await?;
    let Some(username) = username else {
        warn!(username = %form.username, "Admin login failed");
        return Err(ImobiError::Auth(INVALID_CREDENTIALS.to_string()).into());
    };

    let ttl = state.configuration.session_ttl_seconds();
    let token = token::encode_session_token(&username, &state.session_secret, ttl)
        .map_err(|e| ImobiError::Internal(e.to_string()))?;

    info!(%username, "Admin logged in");

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&state, token, CookieDuration::seconds(ttl)))
        .json(ApiResult::success(SessionInfo {
            username,
            expires_in: ttl,
        })))
}

#[post("/logout")]
async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        token::evict_cached_token(cookie.value(), &state.session_secret);
    }
    if let Some(ctx) = req.extensions().get::<imobi_auth::SessionContext>()
        && ctx.is_authenticated()
    {
        info!(username = %ctx.username, "Admin logged out");
    }

    HttpResponse::Ok()
        .cookie(session_cookie(&state, String::new(), CookieDuration::ZERO))
        .json(ApiResult::success(true))
}

#[get("/session")]
async fn session(req: HttpRequest) -> Result<HttpResponse, AppError> {
    let username = require_admin(&req)?;
    Ok(ApiResult::http_success(username))
}

pub fn routes() -> Scope {
    web::scope("/admin")
        .service(login)
        .service(logout)
        .service(session)
}
