//! HTTP server setup

use std::sync::Arc;

use actix_web::{App, HttpServer, dev::Server, middleware::Logger, web};

use crate::{
    api,
    middleware::{rate_limit::RateLimiterState, session::SessionAuth},
    model::AppState,
    site,
};

/// Registers shared data and every route on an application.
///
/// The admin API scope is registered before the `/admin` auth scope so the
/// longer prefix wins.
pub fn configure_app(
    cfg: &mut web::ServiceConfig,
    app_state: AppState,
    limiter: Arc<RateLimiterState>,
) {
    cfg.app_data(web::Data::new(app_state.database_connection.clone()))
        .app_data(web::Data::new(app_state))
        .service(imobi_console::routes())
        .service(api::auth::routes())
        .service(api::health::routes())
        .service(api::route::routes(limiter))
        .configure(site::configure)
        .default_service(web::to(site::not_found));
}

/// Creates and binds the HTTP server.
pub fn http_server(
    app_state: AppState,
    limiter: Arc<RateLimiterState>,
    address: String,
    port: u16,
    workers: Option<usize>,
) -> Result<Server, std::io::Error> {
    let server = HttpServer::new(move || {
        let state = app_state.clone();
        let limiter = limiter.clone();
        App::new()
            .wrap(Logger::default())
            .wrap(SessionAuth)
            .configure(move |cfg| configure_app(cfg, state, limiter))
    });

    let server = match workers {
        Some(workers) => server.workers(workers),
        None => server,
    };

    Ok(server.bind((address, port))?.run())
}
