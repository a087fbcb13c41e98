// Per-client request limiting for the public lead forms.
// Each client IP gets a bucket that refills once per window.

use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    http::header::{HeaderName, HeaderValue},
};
use dashmap::DashMap;
use imobi_common::error::TOO_MANY_REQUESTS;
use imobi_console::model::ApiResult;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Requests allowed per window
    pub max_requests: u32,
    pub window_duration: Duration,
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_duration: Duration::from_secs(60),
            enabled: true,
        }
    }
}

struct TokenBucket {
    tokens: u32,
    last_refill: Instant,
}

impl TokenBucket {
    fn new(max_tokens: u32) -> Self {
        Self {
            tokens: max_tokens,
            last_refill: Instant::now(),
        }
    }

    fn try_consume(&mut self, config: &RateLimitConfig) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_refill) >= config.window_duration {
            self.tokens = config.max_requests;
            self.last_refill = now;
        }

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn retry_after(&self, config: &RateLimitConfig) -> u64 {
        config
            .window_duration
            .saturating_sub(self.last_refill.elapsed())
            .as_secs()
            .max(1)
    }
}

/// Buckets shared by every worker
pub struct RateLimiterState {
    buckets: DashMap<String, TokenBucket>,
    config: RateLimitConfig,
}

impl RateLimiterState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            buckets: DashMap::new(),
            config,
        }
    }

    /// `Ok(remaining)` when allowed, `Err(retry_after_seconds)` otherwise
    fn check(&self, key: &str) -> Result<u32, u64> {
        if !self.config.enabled {
            return Ok(self.config.max_requests);
        }

        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket::new(self.config.max_requests));

        if bucket.try_consume(&self.config) {
            Ok(bucket.tokens)
        } else {
            Err(bucket.retry_after(&self.config))
        }
    }

    /// Drop buckets idle for two windows
    pub fn cleanup(&self) {
        let now = Instant::now();
        self.buckets.retain(|_, bucket| {
            now.duration_since(bucket.last_refill) < self.config.window_duration * 2
        });
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Periodically evict idle buckets
pub fn start_cleanup_task(state: Arc<RateLimiterState>) -> tokio::task::JoinHandle<()> {
    let period = state.config.window_duration.max(Duration::from_secs(1)) * 2;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            state.cleanup();
        }
    })
}

/// Rate limiting middleware factory
pub struct RateLimiter {
    state: Arc<RateLimiterState>,
}

impl RateLimiter {
    pub fn new(state: Arc<RateLimiterState>) -> Self {
        Self { state }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimiterMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimiterMiddleware {
            service,
            state: self.state.clone(),
        }))
    }
}

pub struct RateLimiterMiddleware<S> {
    service: S,
    state: Arc<RateLimiterState>,
}

impl<S, B> Service<ServiceRequest> for RateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client_ip = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or("unknown")
            .to_string();

        match self.state.check(&client_ip) {
            Ok(remaining) => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    res.headers_mut().insert(
                        HeaderName::from_static("x-ratelimit-remaining"),
                        HeaderValue::from(remaining),
                    );
                    Ok(res.map_into_left_body())
                })
            }
            Err(retry_after) => {
                warn!(client = %client_ip, path = req.path(), "Rate limit exceeded");
                let response = HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
                    .insert_header(("Retry-After", retry_after.to_string()))
                    .insert_header(("X-RateLimit-Remaining", "0"))
                    .json(ApiResult {
                        code: TOO_MANY_REQUESTS.code,
                        message: TOO_MANY_REQUESTS.message.to_string(),
                        data: format!("retry after {} seconds", retry_after),
                    });
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
