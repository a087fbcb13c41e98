//! Signed upload parameters for the image host

use std::collections::BTreeMap;

use actix_web::{HttpRequest, HttpResponse, post, web};
use imobi_common::ImobiError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha1::{Digest, Sha1};
use tracing::info;

use crate::error::AppError;
use crate::middleware::session::require_admin;
use crate::model::AppState;

/// Parameters that are never part of the signature
const UNSIGNED_PARAMS: [&str; 4] = ["file", "cloud_name", "resource_type", "api_key"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest {
    pub params_to_sign: BTreeMap<String, Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_name: Option<String>,
}

fn param_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(param_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// Hex SHA-1 of `k1=v1&k2=v2…` (keys sorted) followed by the API secret
pub fn sign_params(params: &BTreeMap<String, Value>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .filter(|(key, _)| !UNSIGNED_PARAMS.contains(&key.as_str()))
        .filter_map(|(key, value)| param_value(value).map(|v| format!("{}={}", key, v)))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    const_hex::encode(hasher.finalize())
}

#[post("/sign-cloudinary-params")]
async fn sign(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<SignRequest>,
) -> Result<HttpResponse, AppError> {
    let username = require_admin(&req)?;
    let secret = state
        .configuration
        .cloudinary_api_secret()
        .ok_or_else(|| ImobiError::Internal("image hosting is not configured".to_string()))?;

    let signature = sign_params(&body.params_to_sign, &secret);
    info!(%username, params = body.params_to_sign.len(), "Upload parameters signed");

    Ok(HttpResponse::Ok().json(SignResponse {
        signature,
        api_key: state.configuration.cloudinary_api_key(),
        cloud_name: state.configuration.cloudinary_cloud_name(),
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sign);
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn params(value: Value) -> BTreeMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_sign_matches_known_digest() {
        // sha1("public_id=sample_image&timestamp=1315060510abcd")
        let signed = sign_params(
            &params(json!({"timestamp": 1315060510, "public_id": "sample_image"})),
            "abcd",
        );
        assert_eq!(signed, "b4ad47fb4e25c7bf5f92a20089f9db59bc302313");
    }

    #[test]
    fn test_sign_ignores_order_and_unsigned_params() {
        let a = sign_params(
            &params(json!({"timestamp": 1, "folder": "imoveis", "api_key": "k"})),
            "s",
        );
        let b = sign_params(
            &params(json!({"folder": "imoveis", "file": "x.jpg", "timestamp": 1})),
            "s",
        );
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
    }

    #[test]
    fn test_array_and_empty_values() {
        let with_empty = sign_params(
            &params(json!({"tags": ["a", "b"], "context": "", "timestamp": 2})),
            "s",
        );
        let without = sign_params(&params(json!({"tags": "a,b", "timestamp": 2})), "s");
        assert_eq!(with_empty, without);
    }
}
