//! Resolution of the calling user.
//!
//! Authentication itself happens upstream; the API only reads the identity
//! the auth layer attached to the request.
use axum::http::{HeaderMap, HeaderName};
use upvotes_shared::types::Actor;

use crate::errors::ConfigError;

/// Resolves the `Actor` making a request.
pub trait IdentityProvider: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Actor;
}

/// Trusts a header set by the authenticating proxy.
///
/// A missing, empty or non-UTF-8 header resolves to `Actor::Anonymous`.
#[derive(Debug, Clone)]
pub struct TrustedHeaderIdentity {
    header: HeaderName,
}

impl TrustedHeaderIdentity {
    pub fn new(header: &str) -> Result<Self, ConfigError> {
        let header = HeaderName::try_from(header.to_lowercase())
            .map_err(|_| ConfigError::invalid("IDENTITY_HEADER", header))?;
        Ok(Self { header })
    }
}

impl IdentityProvider for TrustedHeaderIdentity {
    fn resolve(&self, headers: &HeaderMap) -> Actor {
        headers
            .get(&self.header)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(Actor::authenticated)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_resolves_actor_from_header() {
        let identity = TrustedHeaderIdentity::new("X-Actor-Id").unwrap();
        let mut headers = HeaderMap::new();
        headers.insert("x-actor-id", HeaderValue::from_static(" user-1 "));

        assert_eq!(identity.resolve(&headers), Actor::authenticated("user-1"));
    }

    #[test]
    fn test_missing_or_empty_header_is_anonymous() {
        let identity = TrustedHeaderIdentity::new("x-actor-id").unwrap();
        assert_eq!(identity.resolve(&HeaderMap::new()), Actor::Anonymous);

        let mut headers = HeaderMap::new();
        headers.insert("x-actor-id", HeaderValue::from_static(""));
        assert_eq!(identity.resolve(&headers), Actor::Anonymous);
    }

    #[test]
    fn test_invalid_header_name_is_a_config_error() {
        assert!(TrustedHeaderIdentity::new("bad header").is_err());
    }
}
