//! Session authorization gate.
//!
//! - [`role`] - Roles, requirements and the checks between them
//! - [`state`] - Evaluation states, decisions and render outcomes
//! - [`guard`] - The [`AuthorizationGate`] evaluator
//! - [`view`] - [`ProtectedView`], the mount/unmount driver

pub mod guard;
pub mod role;
pub mod state;
pub mod view;

pub use guard::{AuthorizationGate, TransitionObserver};
pub use role::{Requirement, RequirementCheck, Role, UnknownRole};
pub use state::{Decision, GateState, Redirect, RenderState};
pub use view::ProtectedView;
