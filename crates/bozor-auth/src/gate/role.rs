//! Account roles and view requirements.

use std::fmt;
use std::str::FromStr;

use crate::storage::AuthorizationSnapshot;

/// Coarse-grained account type gating which views a session may reach.
///
/// Views name roles by their enumeration value (`BUYER`, `SELLER`); the
/// backend reports them as its own role constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    /// Purchasing account. The baseline role.
    #[default]
    Buyer,
    /// Selling account; typically needs a company before full access.
    Seller,
}

impl Role {
    /// All roles, in declaration order.
    pub const ALL: [Role; 2] = [Role::Buyer, Role::Seller];

    /// Role string the backend uses for this role.
    #[must_use]
    pub const fn backend_value(self) -> &'static str {
        match self {
            Self::Buyer => "sotib_oluvchi",
            Self::Seller => "sotuvchi",
        }
    }

    /// Enumeration value used by views.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "BUYER",
            Self::Seller => "SELLER",
        }
    }

    /// Maps a backend role string back to a [`Role`].
    #[must_use]
    pub fn from_backend(value: &str) -> Option<Self> {
        let value = normalize_role(value)?;
        Self::ALL.into_iter().find(|r| r.backend_value() == value)
    }

    /// Returns `true` if the (unnormalized) backend role string is this role.
    #[must_use]
    pub fn matches(self, backend_role: Option<&str>) -> bool {
        backend_role
            .and_then(normalize_role)
            .is_some_and(|r| r == self.backend_value())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role '{0}' (expected BUYER or SELLER)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(trimmed))
            .or_else(|| Self::from_backend(trimmed))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Trims and lower-cases a backend role string; blank roles become `None`.
fn normalize_role(role: &str) -> Option<String> {
    let role = role.trim();
    if role.is_empty() {
        None
    } else {
        Some(role.to_lowercase())
    }
}

/// What a protected view demands of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// Role the session must hold.
    pub role: Role,
    /// Whether company onboarding must be complete.
    pub require_company: bool,
}

impl Default for Requirement {
    fn default() -> Self {
        Self {
            role: Role::default(),
            require_company: true,
        }
    }
}

impl Requirement {
    /// Requires `role` and a company.
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            require_company: true,
        }
    }

    /// Drops the company requirement.
    #[must_use]
    pub fn without_company(mut self) -> Self {
        self.require_company = false;
        self
    }

    /// Sets whether a company is required.
    #[must_use]
    pub fn with_company(mut self, require: bool) -> Self {
        self.require_company = require;
        self
    }

    /// Evaluates both checks against `snapshot`.
    #[must_use]
    pub fn check(&self, snapshot: &AuthorizationSnapshot) -> RequirementCheck {
        RequirementCheck {
            role_matches: self.role.matches(snapshot.role.as_deref()),
            company_matches: snapshot.has_company || !self.require_company,
        }
    }
}

/// Outcome of checking a [`Requirement`] against a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementCheck {
    /// The session holds the required role.
    pub role_matches: bool,
    /// The company requirement is met or not required.
    pub company_matches: bool,
}

impl RequirementCheck {
    /// Returns `true` when both checks pass.
    #[must_use]
    pub fn allows(&self) -> bool {
        self.role_matches && self.company_matches
    }
}
