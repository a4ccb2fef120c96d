//! Session lifecycle helpers.
//!
//! Login itself happens elsewhere; these helpers only move the resulting
//! credentials in and out of a [`SessionStore`].

use super::{SessionStore, keys};
use crate::AuthResult;

/// Access/refresh token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionTokens {
    /// Short-lived bearer access token.
    pub access: String,
    /// Longer-lived refresh token.
    pub refresh: String,
}

impl SessionTokens {
    /// Creates a token pair.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

// Tokens never end up in logs.
impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

/// Namespace for session lifecycle operations.
pub struct Session;

impl Session {
    /// Persists a freshly issued token pair.
    ///
    /// The cached authorization snapshot is dropped because it belonged to
    /// whoever was logged in before.
    pub async fn login(store: &dyn SessionStore, tokens: &SessionTokens) -> AuthResult<()> {
        store.set(keys::ACCESS, &tokens.access).await?;
        store.set(keys::REFRESH, &tokens.refresh).await?;
        Self::invalidate_snapshot(store).await?;
        tracing::debug!("Session credentials stored");
        Ok(())
    }

    /// Removes credentials and the cached snapshot.
    pub async fn logout(store: &dyn SessionStore) -> AuthResult<()> {
        store.remove(keys::ACCESS).await?;
        store.remove(keys::REFRESH).await?;
        Self::invalidate_snapshot(store).await?;
        tracing::debug!("Session cleared");
        Ok(())
    }

    /// Removes only the cached role/company snapshot, forcing the next gate
    /// evaluation to consult the backend.
    pub async fn invalidate_snapshot(store: &dyn SessionStore) -> AuthResult<()> {
        store.remove(keys::USER_ROLE).await?;
        store.remove(keys::HAS_COMPANY).await
    }

    /// Reads the stored token pair, or `None` if either token is missing.
    pub async fn tokens(store: &dyn SessionStore) -> AuthResult<Option<SessionTokens>> {
        let access = non_empty(store.get(keys::ACCESS).await?);
        let refresh = non_empty(store.get(keys::REFRESH).await?);
        Ok(match (access, refresh) {
            (Some(access), Some(refresh)) => Some(SessionTokens { access, refresh }),
            _ => None,
        })
    }

    /// Returns `true` if an access token is present.
    pub async fn has_access_token(store: &dyn SessionStore) -> AuthResult<bool> {
        Ok(non_empty(store.get(keys::ACCESS).await?).is_some())
    }
}

/// Browser storage hands back empty strings as readily as missing keys.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySessionStore;

    #[tokio::test]
    async fn test_login_and_logout() {
        let store = MemorySessionStore::with_entries([
            (keys::USER_ROLE, "sotuvchi"),
            (keys::HAS_COMPANY, "1"),
        ]);

        Session::login(&store, &SessionTokens::new("a", "r")).await.unwrap();
        assert_eq!(
            Session::tokens(&store).await.unwrap(),
            Some(SessionTokens::new("a", "r"))
        );
        assert_eq!(store.get(keys::USER_ROLE).await.unwrap(), None);
        assert!(Session::has_access_token(&store).await.unwrap());

        Session::logout(&store).await.unwrap();
        assert!(store.snapshot().is_empty());
        assert!(!Session::has_access_token(&store).await.unwrap());
    }

    #[tokio::test]
    async fn test_tokens_requires_both() {
        let store = MemorySessionStore::with_entries([(keys::ACCESS, "a")]);
        assert_eq!(Session::tokens(&store).await.unwrap(), None);

        store.set(keys::REFRESH, "").await.unwrap();
        assert_eq!(Session::tokens(&store).await.unwrap(), None);
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let tokens = SessionTokens::new("secret-access", "secret-refresh");
        let debug = format!("{tokens:?}");
        assert!(!debug.contains("secret"));
    }
}
