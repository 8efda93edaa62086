//! User accounts, token claims, and the ownership scope of chat sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Unique identifier for a user, wrapping a UUID v7 (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Create a new UserId using UUID v7.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A registered user.
///
/// The password hash is an Argon2 PHC string and never leaves the server:
/// it is skipped when serializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Unique, immutable login name (3-30 chars).
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

/// Payload carried inside a bearer token.
///
/// `iat` and `exp` are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub id: UserId,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

/// Who owns a chat session.
///
/// All unauthenticated callers share the `Guest` scope. Matching is exact:
/// guests only ever see guest sessions and users only their own. On the wire
/// an owner is `null` (guest) or the user's id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<UserId>", into = "Option<UserId>")]
pub enum Owner {
    Guest,
    User(UserId),
}

impl Owner {
    /// The owning user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Owner::Guest => None,
            Owner::User(id) => Some(*id),
        }
    }
}

impl From<Option<UserId>> for Owner {
    fn from(value: Option<UserId>) -> Self {
        match value {
            Some(id) => Owner::User(id),
            None => Owner::Guest,
        }
    }
}

impl From<Owner> for Option<UserId> {
    fn from(owner: Owner) -> Self {
        owner.user_id()
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Guest => write!(f, "guest"),
            Owner::User(id) => write!(f, "user:{id}"),
        }
    }
}
