//! Gate states and render outcomes.
//!
//! An evaluation only moves forward:
//!
//! ```text
//! Init -> CheckingLocalTokens -> RefreshingToken -> ResolvingAuthorization -> Decided
//! ```
//!
//! Any step may jump straight to `Decided(Deny(..))`.

use std::fmt;

use crate::config::RedirectRoutes;

/// Where a denied session is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// Authenticated but missing the role or company; finish onboarding.
    CompanyOnboarding,
    /// Not authenticated at all.
    Login,
}

impl Redirect {
    /// Resolves the logical target to a configured route.
    #[must_use]
    pub fn route<'a>(&self, routes: &'a RedirectRoutes) -> &'a str {
        match self {
            Self::CompanyOnboarding => &routes.company_onboarding,
            Self::Login => &routes.login,
        }
    }
}

/// Final result of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Render the protected content.
    Allow,
    /// Redirect instead.
    Deny(Redirect),
}

impl Decision {
    /// Returns `true` for [`Decision::Allow`].
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    /// The redirect target, if denied.
    #[must_use]
    pub fn redirect(&self) -> Option<Redirect> {
        match self {
            Self::Allow => None,
            Self::Deny(redirect) => Some(*redirect),
        }
    }
}

/// Progress of a single evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Evaluation created, nothing read yet.
    Init,
    /// Reading and validating stored tokens.
    CheckingLocalTokens,
    /// Waiting on the refresh endpoint.
    RefreshingToken,
    /// Comparing the snapshot (and possibly the server) against the requirement.
    ResolvingAuthorization,
    /// Terminal.
    Decided(Decision),
}

impl GateState {
    /// Returns `true` once a decision is reached.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Decided(_))
    }

    fn ordinal(&self) -> u8 {
        match self {
            Self::Init => 0,
            Self::CheckingLocalTokens => 1,
            Self::RefreshingToken => 2,
            Self::ResolvingAuthorization => 3,
            Self::Decided(_) => 4,
        }
    }

    /// Returns `true` if moving from `self` to `next` goes forward.
    #[must_use]
    pub fn can_transition_to(&self, next: &GateState) -> bool {
        !self.is_terminal() && next.ordinal() > self.ordinal()
    }
}

impl fmt::Display for GateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::CheckingLocalTokens => write!(f, "checking_local_tokens"),
            Self::RefreshingToken => write!(f, "refreshing_token"),
            Self::ResolvingAuthorization => write!(f, "resolving_authorization"),
            Self::Decided(Decision::Allow) => write!(f, "decided(allow)"),
            Self::Decided(Decision::Deny(_)) => write!(f, "decided(deny)"),
        }
    }
}

/// What a protected view should show right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    /// Evaluation in flight.
    Loading,
    /// Access granted.
    Content,
    /// Access denied; navigate to this route.
    Redirect(String),
}

impl RenderState {
    /// Maps a decision to what should be rendered.
    #[must_use]
    pub fn from_decision(decision: Decision, routes: &RedirectRoutes) -> Self {
        match decision {
            Decision::Allow => Self::Content,
            Decision::Deny(redirect) => Self::Redirect(redirect.route(routes).to_string()),
        }
    }

    /// Returns `true` while the evaluation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
