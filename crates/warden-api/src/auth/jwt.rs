// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer token codec.

use std::sync::Arc;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Claims, Principal, Role};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// TokenError
// =============================================================================

/// Token decode failures.
///
/// These carry the internal failure detail. The authentication gate logs
/// the variant and collapses all of them to a generic 401 for the caller,
/// so the token format cannot be probed from the outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is structurally unparseable, names an unknown role, or
    /// carries no roles at all.
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the token contents.
    #[error("invalid token signature")]
    InvalidSignature,

    /// The token is past its expiry.
    #[error("expired token")]
    Expired,
}

impl TokenError {
    /// Returns the error kind as a string, for internal logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::InvalidSignature => "invalid_signature",
            TokenError::Expired => "expired",
        }
    }
}

// =============================================================================
// TokenConfig
// =============================================================================

/// Token codec configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Secret key for signing tokens. Never logged or serialized.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token issuer.
    pub issuer: String,
    /// Token lifetime in seconds.
    pub ttl_secs: i64,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the operator
            issuer: "warden".to_string(),
            ttl_secs: 3600,
            leeway_secs: 30,
        }
    }
}

impl TokenConfig {
    /// Creates a new configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the token lifetime.
    pub fn with_ttl_secs(mut self, ttl_secs: i64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("Token signing secret is not configured"));
        }
        if self.secret.len() < 32 {
            tracing::warn!("Token signing secret is shorter than recommended (32 bytes)");
        }
        Ok(())
    }
}

// =============================================================================
// TokenCodec
// =============================================================================

/// Creates and verifies signed bearer tokens.
///
/// Pure over its input plus the immutable signing key; safe for unlimited
/// concurrent use.
#[derive(Clone)]
pub struct TokenCodec {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenCodec {
    /// Creates a new codec from the given configuration.
    pub fn new(config: TokenConfig) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.leeway = config.leeway_secs;
        validation.validate_aud = false;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Issues a signed token for an identity with the configured lifetime.
    pub fn issue(&self, identity: &str, roles: &[Role]) -> ApiResult<String> {
        self.issue_with_ttl(identity, roles, self.config.ttl_secs)
    }

    /// Issues a signed token with an explicit lifetime in seconds.
    pub fn issue_with_ttl(&self, identity: &str, roles: &[Role], ttl_secs: i64) -> ApiResult<String> {
        let claims = Claims::new(identity, roles, ttl_secs).with_issuer(&self.config.issuer);
        let header = Header::new(Algorithm::HS256);

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))
    }

    /// Verifies a token and resolves it to a [`Principal`].
    ///
    /// Signature integrity is checked first, then expiry. Role strings are
    /// taken verbatim from the token; unknown role names and empty role
    /// sets fail as [`TokenError::Malformed`].
    pub fn decode(&self, token: &str) -> Result<Principal, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;

        let roles = claims
            .roles
            .iter()
            .map(|r| Role::parse(r).ok_or(TokenError::Malformed))
            .collect::<Result<Vec<Role>, TokenError>>()?;

        if roles.is_empty() {
            return Err(TokenError::Malformed);
        }

        Ok(Principal::new(claims.sub, roles))
    }

    /// Returns the configured token lifetime in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.config.ttl_secs
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("issuer", &self.config.issuer)
            .field("ttl_secs", &self.config.ttl_secs)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(TokenConfig::new(
            "test-secret-key-that-is-long-enough-for-testing",
        ))
        .unwrap()
    }

    #[test]
    fn test_issue_and_decode() {
        let codec = test_codec();

        let token = codec.issue("bond", &[Role::FieldAgent, Role::Hr]).unwrap();
        let principal = codec.decode(&token).unwrap();

        assert_eq!(principal.identity, "bond");
        assert_eq!(principal.roles, vec![Role::FieldAgent, Role::Hr]);
    }

    #[test]
    fn test_expired_token() {
        let codec = TokenCodec::new(
            TokenConfig::new("test-secret-key-that-is-long-enough-for-testing")
                .with_ttl_secs(3600),
        )
        .unwrap();

        // Past expiry beyond the leeway window
        let token = codec.issue_with_ttl("bond", &[Role::Hr], -120).unwrap();

        assert_eq!(codec.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_signature() {
        let codec = test_codec();
        let token = codec.issue("bond", &[Role::Hr]).unwrap();

        // Flip the signature segment
        let mut parts: Vec<&str> = token.split('.').collect();
        let tampered_sig = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";
        parts[2] = tampered_sig;
        let tampered = parts.join(".");

        assert_eq!(codec.decode(&tampered), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let codec_a = TokenCodec::new(TokenConfig::new("secret-one-for-testing-purposes-ok")).unwrap();
        let codec_b = TokenCodec::new(TokenConfig::new("secret-two-for-testing-purposes-ok")).unwrap();

        let token = codec_a.issue("bond", &[Role::Hr]).unwrap();

        assert_eq!(codec_b.decode(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_structurally_invalid_token() {
        let codec = test_codec();
        assert_eq!(codec.decode("not.a.token"), Err(TokenError::Malformed));
        assert_eq!(codec.decode(""), Err(TokenError::Malformed));
    }

    #[test]
    fn test_unknown_role_rejected() {
        let codec = test_codec();

        // Forge claims with a role outside the closed set, signed correctly
        let claims = serde_json::json!({
            "sub": "bond",
            "exp": chrono::Utc::now().timestamp() + 3600,
            "iat": chrono::Utc::now().timestamp(),
            "iss": "warden",
            "roles": ["SUPERVILLAIN"],
        });
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret("test-secret-key-that-is-long-enough-for-testing".as_bytes()),
        )
        .unwrap();

        assert_eq!(codec.decode(&token), Err(TokenError::Malformed));
    }

    #[test]
    fn test_empty_roles_rejected() {
        let codec = test_codec();
        let token = codec.issue("bond", &[]).unwrap();

        assert_eq!(codec.decode(&token), Err(TokenError::Malformed));
    }
}
