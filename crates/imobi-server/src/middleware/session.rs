//! Admin session middleware
//!
//! Reads the session token from the `session` cookie, falling back to an
//! `Authorization: Bearer` header, verifies it and attaches a
//! [`SessionContext`] to the request for `secured!` and [`require_admin`].

use actix_service::forward_ready;
use actix_utils::future::{Ready, ok};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web::Data,
};
use futures::future::LocalBoxFuture;
use imobi_auth::model::{AUTHORIZATION_HEADER, SESSION_COOKIE, TOKEN_PREFIX};
use imobi_auth::service::token::decode_session_token_cached;
use imobi_auth::SessionContext;
use imobi_common::ImobiError;
use tracing::{debug, error};

use crate::error::AppError;
use crate::model::AppState;

pub struct SessionAuth;

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionAuthMiddleware { service })
    }
}

pub struct SessionAuthMiddleware<S> {
    service: S,
}

/// Session token from the cookie, else from the bearer header
fn extract_token(req: &ServiceRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let value = cookie.value().trim();
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }

    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().strip_prefix(TOKEN_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

impl<S, B> Service<ServiceRequest> for SessionAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if Method::OPTIONS != *req.method() {
            let session = match extract_token(&req) {
                None => SessionContext::anonymous(),
                Some(token) => match req.app_data::<Data<AppState>>() {
                    Some(state) => {
                        match decode_session_token_cached(&token, &state.session_secret) {
                            Ok(claims) => SessionContext::authenticated(claims.sub),
                            Err(err) => {
                                debug!(path = req.path(), error = %err, "Rejected session token");
                                SessionContext::invalid(err.to_string())
                            }
                        }
                    }
                    None => {
                        error!("AppState not found in request app_data");
                        SessionContext::invalid("session verification unavailable")
                    }
                },
            };

            req.extensions_mut().insert(session);
        }

        let res = self.service.call(req);

        Box::pin(async move { res.await.map(ServiceResponse::map_into_left_body) })
    }
}

/// Username of the verified admin session, or an auth error
pub fn require_admin(req: &HttpRequest) -> Result<String, AppError> {
    let session = req.extensions().get::<SessionContext>().cloned();
    match session {
        Some(session) if session.is_authenticated() => Ok(session.username),
        Some(SessionContext {
            token_provided: true,
            error,
            ..
        }) => Err(ImobiError::Auth(error.unwrap_or_else(|| "invalid session".to_string())).into()),
        _ => Err(ImobiError::Auth("no session".to_string()).into()),
    }
}
