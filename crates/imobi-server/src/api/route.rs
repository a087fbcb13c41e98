//! Public JSON API under `/api`

use std::sync::Arc;

use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use super::{cloudinary, forms, search, vista};
use crate::middleware::rate_limit::RateLimiterState;

pub fn routes(limiter: Arc<RateLimiterState>) -> impl HttpServiceFactory {
    web::scope("/api")
        .service(vista::routes())
        .service(forms::routes(limiter))
        .configure(search::configure)
        .configure(cloudinary::configure)
}
