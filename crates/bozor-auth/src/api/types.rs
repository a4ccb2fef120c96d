//! Wire types for the refresh and status endpoints.

use serde::{Deserialize, Deserializer, Serialize};

use crate::storage::AuthorizationSnapshot;

/// Request body for `POST /auth/refresh/`.
#[derive(Debug, Serialize)]
pub struct RefreshRequest<'a> {
    /// The refresh token being exchanged.
    pub refresh: &'a str,
}

/// Successful response from `POST /auth/refresh/`.
#[derive(Clone, Deserialize)]
pub struct RefreshedTokens {
    /// Newly minted access token.
    pub access: String,
    /// Rotated refresh token, when the backend rotates them.
    #[serde(default)]
    pub refresh: Option<String>,
}

impl std::fmt::Debug for RefreshedTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshedTokens")
            .field("access", &"<redacted>")
            .field("rotated", &self.refresh.is_some())
            .finish()
    }
}

/// Response from `GET /companies/my_status/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyStatus {
    /// Backend role string, e.g. `sotuvchi`.
    pub user_role: String,
    /// Whether the account owns a company.
    #[serde(deserialize_with = "deserialize_flag")]
    pub has_company: bool,
}

impl CompanyStatus {
    /// Converts the response into a cacheable snapshot. The role is kept
    /// exactly as the server reported it.
    #[must_use]
    pub fn to_snapshot(&self) -> AuthorizationSnapshot {
        AuthorizationSnapshot::new(self.user_role.clone(), self.has_company)
    }
}

/// Accepts `true`/`false`, `0`/`1`, and their string spellings.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    match &value {
        serde_json::Value::Bool(b) => Ok(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(D::Error::custom(format!("invalid company flag: {value}"))),
        },
        serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" => Ok(false),
            _ => Err(D::Error::custom(format!("invalid company flag: {value}"))),
        },
        _ => Err(D::Error::custom(format!("invalid company flag: {value}"))),
    }
}
