//! Recipient filters

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{communication::campaigns::errors::UnknownFilterError, users::Role};

/// Which members a campaign is sent to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecipientFilter {
    /// Members with the student role
    Student,

    /// Members with the alumni role
    Alumni,

    /// Members with the donor role
    Donor,

    /// Every member, whatever their role
    #[default]
    All,
}

impl RecipientFilter {
    /// The role a member must hold to match, `None` for [`RecipientFilter::All`]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Student => Some(Role::Student),
            Self::Alumni => Some(Role::Alumni),
            Self::Donor => Some(Role::Donor),
            Self::All => None,
        }
    }

    /// The stored representation of the filter
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Alumni => "alumni",
            Self::Donor => "donor",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RecipientFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecipientFilter {
    type Err = UnknownFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "alumni" => Ok(Self::Alumni),
            "donor" => Ok(Self::Donor),
            "all" => Ok(Self::All),
            _ => Err(UnknownFilterError(s.to_string())),
        }
    }
}
