//! Session authorization gate.
//!
//! Decides whether the current session may see a protected view. The gate
//! fails closed: any error, timeout or missing piece of state ends in a
//! redirect, never in access and never in an error surfaced to the caller.

use std::sync::Arc;
use std::time::Duration;

use crate::AuthResult;
use crate::api::{AuthApi, HttpAuthApi};
use crate::config::GateConfig;
use crate::error::AuthError;
use crate::storage::{AuthorizationSnapshot, Session, SessionStore, keys};
use crate::token::validate_access_token;

use super::role::Requirement;
use super::state::{Decision, GateState, Redirect};

/// Callback invoked on every state transition.
pub type TransitionObserver = Arc<dyn Fn(&GateState) + Send + Sync>;

/// Evaluates [`Requirement`]s against the session held in a [`SessionStore`].
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(FileSessionStore::new("session.json"));
/// let gate = AuthorizationGate::from_config(store, GateConfig::load(None)?)?;
///
/// match gate.evaluate(Requirement::new(Role::Seller)).await {
///     Decision::Allow => render_dashboard(),
///     Decision::Deny(redirect) => navigate(redirect.route(&gate.config().routes)),
/// }
/// ```
#[derive(Clone)]
pub struct AuthorizationGate {
    store: Arc<dyn SessionStore>,
    api: Arc<dyn AuthApi>,
    config: GateConfig,
    observer: Option<TransitionObserver>,
}

impl AuthorizationGate {
    /// Creates a gate over an explicit API implementation.
    pub fn new(store: Arc<dyn SessionStore>, api: Arc<dyn AuthApi>, config: GateConfig) -> Self {
        Self {
            store,
            api,
            config,
            observer: None,
        }
    }

    /// Creates a gate that talks to the backend over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if `config` is invalid.
    pub fn from_config(store: Arc<dyn SessionStore>, config: GateConfig) -> AuthResult<Self> {
        let api = HttpAuthApi::new(&config)?;
        Ok(Self::new(store, Arc::new(api), config))
    }

    /// Registers a callback for state transitions.
    #[must_use]
    pub fn with_observer(mut self, observer: TransitionObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The gate's configuration.
    #[must_use]
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// The session store the gate reads from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Runs one evaluation and returns its decision.
    ///
    /// Never fails: every error is logged and turned into a denial.
    pub async fn evaluate(&self, requirement: Requirement) -> Decision {
        self.transition(GateState::Init);

        let allowed = match tokio::time::timeout(self.evaluation_budget(), self.authorize(requirement))
            .await
        {
            Ok(Ok(allowed)) => allowed,
            Ok(Err(err)) => {
                tracing::warn!(
                    category = %err.category(),
                    error = %err,
                    role = %requirement.role,
                    "Authorization failed, denying"
                );
                false
            }
            Err(_) => {
                tracing::warn!(
                    budget_ms = self.evaluation_budget().as_millis() as u64,
                    role = %requirement.role,
                    "Authorization timed out, denying"
                );
                false
            }
        };

        let decision = if allowed {
            Decision::Allow
        } else {
            Decision::Deny(self.redirect_target().await)
        };
        self.transition(GateState::Decided(decision));
        decision
    }

    /// Worst case: refresh and status query each hit the request timeout,
    /// with the same again for store I/O.
    fn evaluation_budget(&self) -> Duration {
        self.config.request_timeout.saturating_mul(3)
    }

    async fn authorize(&self, requirement: Requirement) -> AuthResult<bool> {
        let store = self.store.as_ref();

        self.transition(GateState::CheckingLocalTokens);
        let access = self.read_credential(keys::ACCESS).await?;
        let refresh = self.read_credential(keys::REFRESH).await?;
        validate_access_token(&access, self.config.token_leeway)
            .map_err(|e| AuthError::invalid_access_token(e.to_string()))?;

        self.transition(GateState::RefreshingToken);
        let refreshed = self.api.refresh(&refresh).await?;
        if let Err(err) = store.set(keys::ACCESS, &refreshed.access).await {
            tracing::warn!(error = %err, "Failed to store refreshed access token");
        }
        if let Some(rotated) = &refreshed.refresh
            && let Err(err) = store.set(keys::REFRESH, rotated).await
        {
            tracing::warn!(error = %err, "Failed to store rotated refresh token");
        }
        let access = refreshed.access;

        self.transition(GateState::ResolvingAuthorization);
        let cached = AuthorizationSnapshot::load(store).await.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Cached snapshot unreadable, asking the server");
            AuthorizationSnapshot::default()
        });
        if requirement.check(&cached).allows() {
            tracing::debug!(role = %requirement.role, "Requirement satisfied by cached snapshot");
            return Ok(true);
        }

        let status = self.api.company_status(&access).await?;
        let fresh = status.to_snapshot();
        if let Err(err) = fresh.persist(store).await {
            tracing::warn!(error = %err, "Failed to cache authorization snapshot");
        }

        let check = requirement.check(&fresh);
        tracing::debug!(
            role = %requirement.role,
            require_company = requirement.require_company,
            role_matches = check.role_matches,
            company_matches = check.company_matches,
            "Requirement checked against server status"
        );
        Ok(check.allows())
    }

    async fn read_credential(&self, key: &'static str) -> AuthResult<String> {
        self.store
            .get(key)
            .await?
            .filter(|v| !v.is_empty())
            .ok_or_else(|| AuthError::missing_credentials(key))
    }

    /// Sessions that still hold an access token are sent to onboarding,
    /// everyone else to login.
    async fn redirect_target(&self) -> Redirect {
        match Session::has_access_token(self.store.as_ref()).await {
            Ok(true) => Redirect::CompanyOnboarding,
            Ok(false) => Redirect::Login,
            Err(err) => {
                tracing::warn!(error = %err, "Session store unreadable, redirecting to login");
                Redirect::Login
            }
        }
    }

    fn transition(&self, state: GateState) {
        tracing::trace!(state = %state, "Gate transition");
        if let Some(observer) = &self.observer {
            (**observer)(&state);
        }
    }
}
