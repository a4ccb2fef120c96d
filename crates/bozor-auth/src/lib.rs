//! # bozor-auth
//!
//! Session authorization gate for the Bozor marketplace client.
//!
//! Protected views (seller dashboards, buyer request pages and the like) ask
//! the gate whether the current session may render them. The gate checks the
//! stored credentials, refreshes the access token, and reconciles the cached
//! role/company snapshot with the backend before answering with either
//! "render" or "redirect".
//!
//! ## Modules
//!
//! - [`config`] - Backend URL, timeouts and redirect routes
//! - [`error`] - Error taxonomy collapsed by the gate into redirects
//! - [`storage`] - Session store trait, implementations and snapshot
//! - [`token`] - Offline access token validation
//! - [`api`] - Refresh and company status endpoints
//! - [`gate`] - The gate itself and its mount driver
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use bozor_auth::prelude::*;
//!
//! let store = Arc::new(MemorySessionStore::new());
//! let gate = Arc::new(AuthorizationGate::from_config(store, GateConfig::default())?);
//!
//! let view = ProtectedView::mount(gate, Requirement::new(Role::Seller));
//! match view.resolved().await {
//!     RenderState::Content => { /* show the dashboard */ }
//!     RenderState::Redirect(route) => { /* navigate to route */ }
//!     RenderState::Loading => unreachable!(),
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod gate;
pub mod storage;
pub mod token;

pub use api::{AuthApi, CompanyStatus, HttpAuthApi, RefreshedTokens};
pub use config::{ConfigError, GateConfig, RedirectRoutes};
pub use error::{AuthError, ErrorCategory};
pub use gate::{
    AuthorizationGate, Decision, GateState, ProtectedView, Redirect, RenderState, Requirement,
    RequirementCheck, Role, TransitionObserver, UnknownRole,
};
pub use storage::{
    AuthorizationSnapshot, FileSessionStore, MemorySessionStore, Session, SessionStore,
    SessionTokens,
};
pub use token::{AccessTokenInfo, TokenError, inspect_access_token, validate_access_token};

/// Type alias for gate and storage results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use bozor_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::api::{AuthApi, HttpAuthApi};
    pub use crate::config::{GateConfig, RedirectRoutes};
    pub use crate::error::AuthError;
    pub use crate::gate::{
        AuthorizationGate, Decision, ProtectedView, Redirect, RenderState, Requirement, Role,
    };
    pub use crate::storage::{
        FileSessionStore, MemorySessionStore, Session, SessionStore, SessionTokens,
    };
}
