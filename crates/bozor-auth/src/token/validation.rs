//! Offline access token validation.
//!
//! The gate checks the access token before spending a network round trip on
//! it. The check is purely structural: three dot-separated base64url
//! segments, a JSON header with an `alg`, a JSON payload with an `exp`
//! claim that lies in the future. Signatures are the backend's business;
//! the client has no key to verify them with.

use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;

/// Errors produced by local token validation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token is not a well-formed JWT.
    #[error("Malformed token: {message}")]
    Malformed {
        /// What was wrong with it.
        message: String,
    },

    /// The payload has no usable `exp` claim.
    #[error("Token has no expiry")]
    MissingExpiry,

    /// The token is not an access token (e.g. a refresh token in the wrong slot).
    #[error("Unexpected token type: {token_type}")]
    WrongType {
        /// The `token_type` claim that was found.
        token_type: String,
    },

    /// The token's `exp` lies in the past.
    #[error("Token expired at {expired_at}")]
    Expired {
        /// When the token expired.
        expired_at: OffsetDateTime,
    },
}

impl TokenError {
    fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Header {
    alg: String,
}

#[derive(Debug, Deserialize)]
struct Claims {
    exp: Option<i64>,
    sub: Option<String>,
    user_id: Option<serde_json::Value>,
    token_type: Option<String>,
}

/// What can be read from an access token without verifying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenInfo {
    /// Signing algorithm named in the header.
    pub algorithm: String,
    /// `sub` claim, or the `user_id` claim rendered as a string.
    pub subject: Option<String>,
    /// Expiry instant.
    pub expires_at: OffsetDateTime,
}

impl AccessTokenInfo {
    /// Returns `true` if the token is expired at `now`, allowing `leeway`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime, leeway: Duration) -> bool {
        self.expires_at <= now - leeway
    }
}

/// Decodes the token's header and payload without checking expiry.
pub fn inspect_access_token(token: &str) -> Result<AccessTokenInfo, TokenError> {
    let mut parts = token.trim().split('.');
    let (Some(header), Some(payload), Some(signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(TokenError::malformed("expected three segments"));
    };
    if signature.is_empty() {
        return Err(TokenError::malformed("empty signature segment"));
    }

    let header: Header = decode_segment(header, "header")?;
    let claims: Claims = decode_segment(payload, "payload")?;

    if let Some(token_type) = claims.token_type
        && token_type != "access"
    {
        return Err(TokenError::WrongType { token_type });
    }

    let exp = claims.exp.ok_or(TokenError::MissingExpiry)?;
    let expires_at =
        OffsetDateTime::from_unix_timestamp(exp).map_err(|_| TokenError::MissingExpiry)?;

    let subject = claims.sub.or_else(|| {
        claims.user_id.map(|id| match id {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        })
    });

    Ok(AccessTokenInfo {
        algorithm: header.alg,
        subject,
        expires_at,
    })
}

/// Validates the token against the current clock.
pub fn validate_access_token(
    token: &str,
    leeway: Duration,
) -> Result<AccessTokenInfo, TokenError> {
    validate_access_token_at(token, leeway, OffsetDateTime::now_utc())
}

/// Validates the token against an explicit clock reading.
pub fn validate_access_token_at(
    token: &str,
    leeway: Duration,
    now: OffsetDateTime,
) -> Result<AccessTokenInfo, TokenError> {
    let info = inspect_access_token(token)?;
    if info.is_expired_at(now, leeway) {
        return Err(TokenError::Expired {
            expired_at: info.expires_at,
        });
    }
    Ok(info)
}

fn decode_segment<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T, TokenError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|e| TokenError::malformed(format!("{what} is not base64url: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| TokenError::malformed(format!("{what} is not valid JSON: {e}")))
}

#[cfg(test)]
mod tests {
    use jsonwebtoken::{EncodingKey, Header as JwtHeader, encode};
    use serde_json::json;

    use super::*;

    fn mint(claims: serde_json::Value) -> String {
        encode(
            &JwtHeader::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    #[test]
    fn test_valid_token() {
        let exp = now().unix_timestamp() + 300;
        let token = mint(json!({ "exp": exp, "user_id": 42, "token_type": "access" }));

        let info = validate_access_token(&token, Duration::ZERO).unwrap();
        assert_eq!(info.algorithm, "HS256");
        assert_eq!(info.subject.as_deref(), Some("42"));
        assert_eq!(info.expires_at.unix_timestamp(), exp);
    }

    #[test]
    fn test_expired_token() {
        let exp = now().unix_timestamp() - 10;
        let token = mint(json!({ "exp": exp, "sub": "u1" }));

        let err = validate_access_token(&token, Duration::ZERO).unwrap_err();
        assert!(matches!(err, TokenError::Expired { .. }));

        // Leeway covers small clock skew
        assert!(validate_access_token(&token, Duration::from_secs(60)).is_ok());
    }

    #[test]
    fn test_expiry_boundary() {
        let token = mint(json!({ "exp": 1_700_000_000 }));
        let at = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();

        assert!(validate_access_token_at(&token, Duration::ZERO, at).is_err());
        assert!(
            validate_access_token_at(&token, Duration::ZERO, at - Duration::from_secs(1)).is_ok()
        );
    }

    #[test]
    fn test_missing_expiry() {
        let token = mint(json!({ "sub": "u1" }));
        assert_eq!(
            inspect_access_token(&token).unwrap_err(),
            TokenError::MissingExpiry
        );
    }

    #[test]
    fn test_refresh_token_in_access_slot() {
        let exp = now().unix_timestamp() + 300;
        let token = mint(json!({ "exp": exp, "token_type": "refresh" }));
        assert!(matches!(
            inspect_access_token(&token),
            Err(TokenError::WrongType { .. })
        ));
    }

    #[test]
    fn test_malformed_tokens() {
        for token in ["", "abc", "a.b", "a.b.c.d", "!!!.???.sig"] {
            assert!(
                matches!(
                    inspect_access_token(token),
                    Err(TokenError::Malformed { .. })
                ),
                "{token:?} should be malformed"
            );
        }

        // Valid base64 but not JSON
        let garbage = format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(b"{\"alg\":\"HS256\"}"),
            URL_SAFE_NO_PAD.encode(b"not json")
        );
        assert!(matches!(
            inspect_access_token(&garbage),
            Err(TokenError::Malformed { .. })
        ));
    }
}
