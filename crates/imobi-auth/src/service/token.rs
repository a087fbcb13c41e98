//! Session token service

use std::sync::LazyLock;
use std::time::Duration;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use moka::sync::Cache;

use crate::model::SessionClaims;

/// Verified tokens keyed by `(secret, token)`, so repeated admin requests
/// skip signature checks
static TOKEN_CACHE: LazyLock<Cache<(String, String), SessionClaims>> = LazyLock::new(|| {
    Cache::builder()
        .max_capacity(10_000)
        .time_to_live(Duration::from_secs(300))
        .build()
});

/// Encode a session token for `sub` valid for `ttl_seconds`.
/// `secret` is base64 encoded.
pub fn encode_session_token(
    sub: &str,
    secret: &str,
    ttl_seconds: i64,
) -> jsonwebtoken::errors::Result<String> {
    let exp = chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(ttl_seconds))
        .unwrap_or_else(chrono::Utc::now)
        .timestamp();

    let claims = SessionClaims {
        sub: sub.to_string(),
        exp,
    };

    let encoding_key = EncodingKey::from_base64_secret(secret)?;
    encode(&Header::new(Algorithm::HS256), &claims, &encoding_key)
}

/// Verify signature and expiry
pub fn decode_session_token(
    token: &str,
    secret: &str,
) -> jsonwebtoken::errors::Result<SessionClaims> {
    let decoding_key = DecodingKey::from_base64_secret(secret)?;
    let data = decode::<SessionClaims>(token, &decoding_key, &Validation::new(Algorithm::HS256))?;
    Ok(data.claims)
}

/// [`decode_session_token`] backed by the token cache
pub fn decode_session_token_cached(
    token: &str,
    secret: &str,
) -> jsonwebtoken::errors::Result<SessionClaims> {
    let key = (secret.to_string(), token.to_string());
    if let Some(claims) = TOKEN_CACHE.get(&key) {
        if claims.exp > chrono::Utc::now().timestamp() {
            return Ok(claims);
        }
        TOKEN_CACHE.invalidate(&key);
    }

    let claims = decode_session_token(token, secret)?;
    TOKEN_CACHE.insert(key, claims.clone());

    Ok(claims)
}

/// Drop a token from the verification cache.
///
/// This is not a revocation: the token still verifies until its `exp`.
/// Logout relies on the browser discarding the expired cookie.
pub fn evict_cached_token(token: &str, secret: &str) {
    TOKEN_CACHE.invalidate(&(secret.to_string(), token.to_string()));
}

#[cfg(test)]
mod tests {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;

    use super::*;

    fn secret() -> String {
        STANDARD.encode("imobi-test-secret-key-with-32-bytes!")
    }

    #[test]
    fn test_encode_then_decode() {
        let token = encode_session_token("admin", &secret(), 3600).unwrap();
        let claims = decode_session_token(&token, &secret()).unwrap();

        assert_eq!(claims.sub, "admin");
        assert!(claims.exp > chrono::Utc::now().timestamp());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = encode_session_token("admin", &secret(), 3600).unwrap();
        let other = STANDARD.encode("another-secret-key-with-32-bytes!!!!");

        assert!(decode_session_token(&token, &other).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let token = encode_session_token("admin", &secret(), -3600).unwrap();

        assert!(decode_session_token(&token, &secret()).is_err());
        assert!(decode_session_token_cached(&token, &secret()).is_err());
    }

    #[test]
    fn test_tampered_token_is_rejected() {
        let token = encode_session_token("admin", &secret(), 3600).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = encode_session_token("intruder", &secret(), 3600).unwrap();
        let forged_payload = forged.split('.').nth(1).unwrap().to_string();
        parts[1] = &forged_payload;

        assert!(decode_session_token(&parts.join("."), &secret()).is_err());
    }

    #[test]
    fn test_cached_decode() {
        let token = encode_session_token("editor", &secret(), 3600).unwrap();

        assert_eq!(decode_session_token_cached(&token, &secret()).unwrap().sub, "editor");
        assert_eq!(decode_session_token_cached(&token, &secret()).unwrap().sub, "editor");

        evict_cached_token(&token, &secret());
        assert!(decode_session_token_cached(&token, &secret()).is_ok());
    }

    #[test]
    fn test_cache_is_scoped_to_the_secret() {
        let token = encode_session_token("admin", &secret(), 3600).unwrap();
        let other = STANDARD.encode("another-secret-key-with-32-bytes!!!!");

        assert!(decode_session_token_cached(&token, &secret()).is_ok());
        assert!(decode_session_token_cached(&token, &other).is_err());
    }
}
