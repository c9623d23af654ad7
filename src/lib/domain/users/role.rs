//! Member roles

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// The role a member holds in the network
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Currently enrolled student
    Student,

    /// Graduate
    Alumni,

    /// Donor to the institution
    Donor,

    /// Network administrator
    Admin,
}

/// Raised when a role string is not one of the known roles
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown role \"{0}\"")]
pub struct UnknownRoleError(pub String);

impl Role {
    /// The stored representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Alumni => "alumni",
            Self::Donor => "donor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "alumni" => Ok(Self::Alumni),
            "donor" => Ok(Self::Donor),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownRoleError(s.to_string())),
        }
    }
}
