//! API error-handling module

use std::fmt;

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{
    communication::{
        campaigns::errors::{ListCampaignsError, UnknownCampaignTypeError, UnknownFilterError},
        email_addresses::EmailAddressError,
    },
    users::{
        errors::{CreateUserError, GetUserByIdError},
        UnknownRoleError,
    },
};

/// An error response
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// The error message
    #[schema(example = "Internal server error")]
    pub error: String,
}

/// An error raised in the API
#[derive(Debug, Deserialize, ToSchema)]
pub struct ApiError {
    /// The status code
    #[schema(example = 500, value_type = u16)]
    #[serde(with = "http_serde::status_code")]
    pub status: StatusCode,

    /// The error message
    #[schema(example = "Internal server error")]
    pub message: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: &str) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    /// Create a new not found error
    pub fn new_404(message: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Create a new conflict error
    pub fn new_409(message: &str) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    /// Create a new unprocessable entity error
    pub fn new_422(message: &str) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, message)
    }

    /// Create new internal server error
    pub fn new_500(message: &str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        unknown_error(&err)
    }
}

impl From<EmailAddressError> for ApiError {
    fn from(err: EmailAddressError) -> Self {
        match err {
            EmailAddressError::EmptyEmailAddress => {
                ApiError::new_422("Please provide an email address")
            }
            EmailAddressError::InvalidEmailAddress => {
                ApiError::new_422("Please provide a valid email address")
            }
        }
    }
}

impl From<UnknownRoleError> for ApiError {
    fn from(err: UnknownRoleError) -> Self {
        ApiError::new_422(&format!(
            "Unknown role \"{}\", expected one of: student, alumni, donor, admin",
            err.0
        ))
    }
}

impl From<UnknownFilterError> for ApiError {
    fn from(err: UnknownFilterError) -> Self {
        ApiError::new_422(&format!(
            "Unknown recipient filter \"{}\", expected one of: student, alumni, donor, all",
            err.0
        ))
    }
}

impl From<UnknownCampaignTypeError> for ApiError {
    fn from(err: UnknownCampaignTypeError) -> Self {
        ApiError::new_422(&format!(
            "Unknown campaign type \"{}\", expected one of: quick_message, newsletter, announcement, event_invitation",
            err.0
        ))
    }
}

impl From<CreateUserError> for ApiError {
    fn from(err: CreateUserError) -> Self {
        match err {
            CreateUserError::DuplicateUser { email } => {
                ApiError::new_409(&format!("User with email \"{email}\" already exists"))
            }
            CreateUserError::UnknownError(err) => unknown_error(&err),
        }
    }
}

impl From<GetUserByIdError> for ApiError {
    fn from(err: GetUserByIdError) -> Self {
        match err {
            GetUserByIdError::UserNotFound(id) => {
                ApiError::new_404(&format!("User with id \"{id}\" not found"))
            }
            GetUserByIdError::UnknownError(err) => unknown_error(&err),
        }
    }
}

impl From<ListCampaignsError> for ApiError {
    fn from(err: ListCampaignsError) -> Self {
        match err {
            ListCampaignsError::UnknownError(err) => unknown_error(&err),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), &rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(rejection.status(), &rejection.body_text())
    }
}

/// Log the underlying error and hide it behind a generic message
fn unknown_error(err: &anyhow::Error) -> ApiError {
    error!("unexpected error: {err:?}");

    ApiError::new_500("An unknown error occurred, please try again")
}
