//! Identity provider seam: bearer token in, user identifier out.
//!
//! The tracker never designs an authentication scheme of its own; handlers
//! call through this trait and treat the token as opaque.

pub mod jwt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tracker_core::Result;

pub use jwt::JwtIdentity;

/// Resolves a bearer token to a user identifier string.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, token: &str) -> Result<String>;
}

/// Identity provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// HS256 shared secret.
    pub secret: String,
    /// Accept tokens whose signature does not verify, extracting the user
    /// claim anyway. Off by default; only enable for tokens signed by an
    /// external system whose key is not distributed here.
    #[serde(default)]
    pub allow_unverified: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            secret: "change-this-secret".to_string(),
            allow_unverified: false,
        }
    }
}

/// Fixed-identity provider for tests and local development.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    user: String,
}

impl StaticIdentity {
    pub fn new(user: impl Into<String>) -> Self {
        Self { user: user.into() }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn authenticate(&self, _token: &str) -> Result<String> {
        Ok(self.user.clone())
    }
}
