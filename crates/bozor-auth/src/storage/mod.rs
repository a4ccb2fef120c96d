//! Session storage for credentials and the cached authorization snapshot.
//!
//! The gate never talks to a concrete storage engine. It goes through
//! [`SessionStore`], a small string key/value interface, so the same logic
//! runs against an in-memory map in tests and a JSON file in the CLI.
//!
//! # Keys
//!
//! | Key | Value |
//! |-----|-------|
//! | [`keys::ACCESS`] | bearer access token |
//! | [`keys::REFRESH`] | bearer refresh token |
//! | [`keys::USER_ROLE`] | last authoritative backend role string |
//! | [`keys::HAS_COMPANY`] | `"1"` or `"0"` |
//!
//! Writes are last-write-wins. Several gates may share one store and nothing
//! coordinates them beyond what each backend needs to stay memory-safe.

pub mod file;
pub mod memory;
pub mod session;
pub mod snapshot;

use async_trait::async_trait;

use crate::AuthResult;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;
pub use session::{Session, SessionTokens};
pub use snapshot::AuthorizationSnapshot;

/// Well-known storage keys.
pub mod keys {
    /// Current bearer access token.
    pub const ACCESS: &str = "access";
    /// Current bearer refresh token.
    pub const REFRESH: &str = "refresh";
    /// Last known authoritative role string.
    pub const USER_ROLE: &str = "user_role";
    /// String-encoded company flag, `"1"` or `"0"`.
    pub const HAS_COMPANY: &str = "has_company";
}

/// Durable string key/value storage used by the gate.
///
/// # Example Implementation
///
/// ```ignore
/// use bozor_auth::storage::SessionStore;
/// use bozor_auth::AuthResult;
///
/// struct CookieStore { /* ... */ }
///
/// #[async_trait::async_trait]
/// impl SessionStore for CookieStore {
///     async fn get(&self, key: &str) -> AuthResult<Option<String>> {
///         Ok(self.jar.get(key).map(|c| c.value().to_string()))
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    async fn get(&self, key: &str) -> AuthResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    async fn set(&self, key: &str, value: &str) -> AuthResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    async fn remove(&self, key: &str) -> AuthResult<()>;
}
