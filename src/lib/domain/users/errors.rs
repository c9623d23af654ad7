//! Error types for the member directory

use thiserror::Error;
use uuid::Uuid;

use crate::domain::communication::email_addresses::EmailAddress;

/// Errors that can occur when creating a user
#[derive(Debug, Error)]
pub enum CreateUserError {
    /// User with email already exists
    #[error("user already exists with email address {email}")]
    DuplicateUser {
        /// The conflicting email address
        email: EmailAddress,
    },

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when getting a user
#[derive(Debug, Error)]
pub enum GetUserByIdError {
    /// User not found
    #[error("user {0} not found")]
    UserNotFound(Uuid),

    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when looking up recipient addresses
#[derive(Debug, Error)]
pub enum FindRecipientsError {
    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}
