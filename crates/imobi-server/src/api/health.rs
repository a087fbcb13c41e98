//! Liveness and readiness probes

use actix_web::{HttpResponse, Scope, get, web};
use serde::Serialize;
use tracing::warn;

use crate::model::AppState;

const UP: &str = "UP";
const DOWN: &str = "DOWN";

#[derive(Debug, Serialize)]
struct Readiness {
    status: &'static str,
    database: &'static str,
    store: &'static str,
}

#[get("/liveness")]
async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": UP }))
}

#[get("/readiness")]
async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let database = match state.database_connection.ping().await {
        Ok(()) => UP,
        Err(e) => {
            warn!(error = %e, "Relational store not ready");
            DOWN
        }
    };
    let store = match state.store().health_check().await {
        Ok(()) => UP,
        Err(e) => {
            warn!(error = %e, "Listing store not ready");
            DOWN
        }
    };

    let ready = database == UP && store == UP;
    let body = Readiness {
        status: if ready { UP } else { DOWN },
        database,
        store,
    };

    if ready {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

pub fn routes() -> Scope {
    web::scope("/health").service(liveness).service(readiness)
}
