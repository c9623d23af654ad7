//! User model

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{communication::email_addresses::EmailAddress, users::Role};

/// A member of the network
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    /// User UUID
    pub id: Uuid,

    /// User email address
    pub email: EmailAddress,

    /// Display name
    pub name: String,

    /// Role within the network
    pub role: Role,

    /// User created at date in UTC
    pub created_at: DateTime<Utc>,

    /// User last updated at date in UTC
    pub updated_at: DateTime<Utc>,
}

/// Create user request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewUser {
    id: Uuid,
    email: EmailAddress,
    name: String,
    role: Role,
}

impl NewUser {
    /// Create a new user request
    pub fn new(id: Uuid, email: EmailAddress, name: &str, role: Role) -> Self {
        Self {
            id,
            email,
            name: name.trim().to_string(),
            role,
        }
    }

    /// Get the new user's ID
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Get the new user's email address
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Get the new user's display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the new user's role
    pub fn role(&self) -> Role {
        self.role
    }
}
