//! Local access token checks.
//!
//! - [`validation`] - Offline shape and expiry validation of access tokens

pub mod validation;

pub use validation::{
    AccessTokenInfo, TokenError, inspect_access_token, validate_access_token,
    validate_access_token_at,
};
