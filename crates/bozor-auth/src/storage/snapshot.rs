//! Cached authorization snapshot.
//!
//! The snapshot lets the gate skip the status query when the last known
//! role and company flag already satisfy a view's requirement. It is never
//! trusted over a fresh server answer.

use super::{SessionStore, keys};
use crate::AuthResult;

/// Last known role and company flag for the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationSnapshot {
    /// Backend role string exactly as the server sent it. `None` if never
    /// cached. Comparisons normalize it, storage does not.
    pub role: Option<String>,
    /// Whether the account has completed company onboarding.
    pub has_company: bool,
}

impl AuthorizationSnapshot {
    /// Creates a snapshot holding `role` verbatim.
    pub fn new(role: impl Into<String>, has_company: bool) -> Self {
        Self {
            role: Some(role.into()),
            has_company,
        }
    }

    /// Reads the snapshot from `store`. Missing keys read as "no role" and
    /// "no company".
    pub async fn load(store: &dyn SessionStore) -> AuthResult<Self> {
        let role = store.get(keys::USER_ROLE).await?;
        let has_company = store.get(keys::HAS_COMPANY).await?.as_deref() == Some("1");
        Ok(Self { role, has_company })
    }

    /// Writes the snapshot to `store`.
    pub async fn persist(&self, store: &dyn SessionStore) -> AuthResult<()> {
        match &self.role {
            Some(role) => store.set(keys::USER_ROLE, role).await?,
            None => store.remove(keys::USER_ROLE).await?,
        }
        store
            .set(keys::HAS_COMPANY, if self.has_company { "1" } else { "0" })
            .await
    }
}
