//! `reqwest` client for the backend auth endpoints.

use async_trait::async_trait;

use super::AuthApi;
use super::types::{CompanyStatus, RefreshRequest, RefreshedTokens};
use crate::AuthResult;
use crate::config::GateConfig;
use crate::error::AuthError;

/// HTTP implementation of [`AuthApi`].
///
/// Every request is bounded by [`GateConfig::request_timeout`]; a timeout is
/// reported the same way as any other transport failure.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: reqwest::Client,
    refresh_url: String,
    status_url: String,
}

impl HttpAuthApi {
    /// Builds a client for the backend described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the config is invalid or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &GateConfig) -> AuthResult<Self> {
        config
            .validate()
            .map_err(|e| AuthError::configuration(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            refresh_url: config.refresh_url(),
            status_url: config.status_url(),
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn refresh(&self, refresh_token: &str) -> AuthResult<RefreshedTokens> {
        let resp = self
            .http
            .post(&self.refresh_url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await
            .map_err(|e| AuthError::refresh_rejected(transport_message(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::refresh_rejected(format!("HTTP {status}")));
        }

        let tokens: RefreshedTokens = resp
            .json()
            .await
            .map_err(|e| AuthError::refresh_rejected(format!("invalid response body: {e}")))?;
        if tokens.access.trim().is_empty() {
            return Err(AuthError::refresh_rejected("empty access token"));
        }

        tracing::debug!(rotated = tokens.refresh.is_some(), "Access token refreshed");
        Ok(tokens)
    }

    async fn company_status(&self, access_token: &str) -> AuthResult<CompanyStatus> {
        let resp = self
            .http
            .get(&self.status_url)
            .bearer_auth(access_token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| AuthError::status_query_failed(transport_message(&e)))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::status_query_failed(format!("HTTP {status}")));
        }

        let body: CompanyStatus = resp
            .json()
            .await
            .map_err(|e| AuthError::status_query_failed(format!("invalid response body: {e}")))?;

        tracing::debug!(
            user_role = %body.user_role,
            has_company = body.has_company,
            "Company status fetched"
        );
        Ok(body)
    }
}

fn transport_message(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        format!("request failed: {err}")
    }
}
