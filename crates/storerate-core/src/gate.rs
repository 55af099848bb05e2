//! # Role Gate
//!
//! Maps the role string returned by a successful login to the view the
//! caller should open. A lookup, not a state machine.

use crate::model::Role;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Message shown when a login returns a role the application does not know.
pub const UNKNOWN_ROLE_MESSAGE: &str = "Unknown role. Please contact support.";

/// A client-side view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Signup,
    Admin,
    Owner,
    User,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::Admin => "/admin",
            Self::Owner => "/owner",
            Self::User => "/user",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("Unknown role '{0}'")]
    UnknownRole(String),
}

impl GateError {
    /// The message to put in front of the operator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownRole(_) => UNKNOWN_ROLE_MESSAGE,
        }
    }
}

/// The role-to-route lookup.
pub struct RoleGate;

impl RoleGate {
    /// Route for a parsed role.
    pub fn route(role: &Role) -> Result<Route, GateError> {
        match role {
            Role::Admin => Ok(Route::Admin),
            Role::Owner => Ok(Route::Owner),
            Role::User => Ok(Route::User),
            Role::Other(raw) => Err(GateError::UnknownRole(raw.clone())),
        }
    }

    /// Route for a raw role string.
    pub fn route_str(role: &str) -> Result<Route, GateError> {
        Self::route(&Role::parse(role))
    }
}

// =============================================================================
// TESTS
// =============================================================================
