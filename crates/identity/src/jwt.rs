//! JWT-backed identity provider.
//!
//! Signature verification (HS256) is mandatory. The predecessor system fell
//! back to extracting the user claim from tokens that failed verification;
//! that behavior survives only behind the explicit `allow_unverified` flag.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use moka::future::Cache;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use tracker_core::{Error, Result};

use crate::{IdentityConfig, IdentityProvider};

/// Cache TTL for resolved tokens (30 seconds).
const TOKEN_CACHE_TTL: Duration = Duration::from_secs(30);

/// Maximum cache entries.
const TOKEN_CACHE_MAX_CAPACITY: u64 = 10_000;

/// Claim keys checked in order when picking the user identifier.
const USER_CLAIM_KEYS: [&str; 5] = ["sub", "username", "email", "user_id", "userId"];

/// HS256 JWT verifier with a short-lived token cache.
#[derive(Clone)]
pub struct JwtIdentity {
    decoding_key: DecodingKey,
    allow_unverified: bool,
    cache: Cache<String, String>,
}

impl JwtIdentity {
    pub fn new(config: &IdentityConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            allow_unverified: config.allow_unverified,
            cache: Cache::builder()
                .max_capacity(TOKEN_CACHE_MAX_CAPACITY)
                .time_to_live(TOKEN_CACHE_TTL)
                .build(),
        }
    }

    fn verify(&self, token: &str) -> Result<Value> {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp is validated when present but not demanded; external issuers
        // do not always set it.
        validation.required_spec_claims.clear();

        match decode::<Value>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if self.allow_unverified => {
                warn!(error = %e, "token failed verification, extracting claims unverified");
                self.decode_unverified(token)
            }
            Err(e) => Err(Error::unauthorized(format!("could not validate credentials: {e}"))),
        }
    }

    fn decode_unverified(&self, token: &str) -> Result<Value> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.insecure_disable_signature_validation();

        decode::<Value>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| Error::unauthorized(format!("could not decode token: {e}")))
    }
}

/// Pick the user identifier out of a claim set: well-known keys first, then
/// the first string-valued claim.
pub fn user_from_claims(claims: &Value) -> Result<String> {
    let object = claims
        .as_object()
        .ok_or_else(|| Error::unauthorized("token payload is not an object"))?;

    for key in USER_CLAIM_KEYS {
        if let Some(value) = object.get(key) {
            return Ok(match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
    }

    for value in object.values() {
        if let Value::String(s) = value {
            return Ok(s.clone());
        }
    }

    Err(Error::unauthorized("no user identifier found in token payload"))
}

#[async_trait]
impl IdentityProvider for JwtIdentity {
    async fn authenticate(&self, token: &str) -> Result<String> {
        if token.is_empty() {
            return Err(Error::unauthorized("bearer token is required"));
        }

        if let Some(user) = self.cache.get(token).await {
            debug!("token cache hit");
            return Ok(user);
        }

        let claims = self.verify(token)?;
        let user = user_from_claims(&claims)?;

        self.cache.insert(token.to_string(), user.clone()).await;
        Ok(user)
    }
}
