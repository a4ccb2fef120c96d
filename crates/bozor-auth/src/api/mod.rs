//! Backend endpoints the gate depends on.
//!
//! - [`AuthApi`] - trait over the refresh and company status calls
//! - [`HttpAuthApi`] - `reqwest` implementation against the REST backend
//! - [`RefreshedTokens`], [`CompanyStatus`] - response schemas, validated at
//!   the boundary

pub mod http;
pub mod types;

use async_trait::async_trait;

use crate::AuthResult;

pub use http::HttpAuthApi;
pub use types::{CompanyStatus, RefreshedTokens};

/// Outbound calls made by the gate.
///
/// Implementations must map every failure (transport, timeout, non-2xx,
/// schema mismatch) to the matching [`crate::AuthError`] variant:
/// `RefreshRejected` for [`AuthApi::refresh`] and `StatusQueryFailed` for
/// [`AuthApi::company_status`].
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> AuthResult<RefreshedTokens>;

    /// Fetches the authoritative role and company flag for the session.
    async fn company_status(&self, access_token: &str) -> AuthResult<CompanyStatus>;
}
