//! # Data Model
//!
//! Plain records for users, stores and ratings. No record holds a reference
//! to another; relationships are expressed only through ids and are never
//! enforced.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a [`User`]. Assigned as `count + 1` at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

/// Identifier of a [`Store`]. Assigned as `count + 1` at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ROLE
// =============================================================================

/// Role attached to a user account.
///
/// Role strings are never rejected when a user is added. Anything other than
/// `admin`, `owner` or `user` is kept verbatim as [`Role::Other`] and only
/// refused later by the [`RoleGate`](crate::RoleGate).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Owner,
    User,
    Other(String),
}

impl Role {
    /// Parse a role string. Matching is exact and case-sensitive.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "admin" => Self::Admin,
            "owner" => Self::Owner,
            "user" => Self::User,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire form of the role.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
            Self::User => "user",
            Self::Other(raw) => raw,
        }
    }

    /// True for the three roles the application knows about.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// PASSWORD
// =============================================================================

/// An opaque password string. Never printed by `Debug`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Access the raw secret, e.g. to put it on the wire.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// A registered account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// Empty when the record came from an API that does not echo passwords.
    #[serde(default)]
    pub password: Password,
    pub address: String,
    pub role: Role,
}

/// A rateable store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub rating: f64,
}

/// One entry of the append-only ratings log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub store_id: StoreId,
    pub rating: f64,
}

impl Rating {
    pub fn new(store_id: StoreId, rating: f64) -> Self {
        Self { store_id, rating }
    }
}

// =============================================================================
// INPUTS
// =============================================================================

/// Input for adding a user. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: Password,
    pub address: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        address: impl Into<String>,
        role: impl Into<Role>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: Password::new(password),
            address: address.into(),
            role: role.into(),
        }
    }

    pub(crate) fn into_user(self, id: UserId) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password: self.password,
            address: self.address,
            role: self.role,
        }
    }
}

/// Input for adding a store.
///
/// `rating` is the raw text typed into the form; it is coerced when the
/// store is added (see [`coerce_rating`](crate::coerce_rating)).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub owner_id: Option<UserId>,
    pub rating: String,
}

impl NewStore {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            owner_id: None,
            rating: String::new(),
        }
    }

    #[must_use]
    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    #[must_use]
    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = rating.into();
        self
    }

    /// Rating after lenient coercion (unparsable input becomes 0).
    pub fn coerced_rating(&self) -> f64 {
        crate::input::coerce_rating(&self.rating)
    }

    pub(crate) fn into_store(self, id: StoreId, rating: f64) -> Store {
        Store {
            id,
            name: self.name,
            address: self.address,
            owner_id: self.owner_id,
            rating,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
