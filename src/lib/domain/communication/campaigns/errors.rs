//! Campaign errors

use css_inline::InlineError;
use thiserror::Error;

use crate::domain::{communication::campaigns::RecipientFilter, users::errors::FindRecipientsError};

/// Raised when a recipient filter is not one of the known filters
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown recipient filter \"{0}\"")]
pub struct UnknownFilterError(pub String);

/// Raised when a campaign type is not one of the known types
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown campaign type \"{0}\"")]
pub struct UnknownCampaignTypeError(pub String);

/// Errors that can occur while rendering the campaign email
#[derive(Debug, Error)]
pub enum RenderError {
    /// The HTML template could not be rendered
    #[error("template error: {0}")]
    Template(#[from] askama::Error),

    /// CSS could not be inlined into the rendered HTML
    #[error("css inlining error: {0}")]
    Inline(#[from] InlineError),
}

/// Errors that stop a campaign before any email is sent
#[derive(Debug, Error)]
pub enum CampaignError {
    /// No member matches the filter
    #[error("no recipients match the \"{0}\" filter")]
    NoRecipients(RecipientFilter),

    /// The member directory could not be queried
    #[error("could not look up recipients: {0}")]
    Recipients(#[from] FindRecipientsError),

    /// The campaign email could not be rendered
    #[error("could not render the campaign email: {0}")]
    Render(#[from] RenderError),
}

/// Errors that can occur when recording a campaign summary
#[derive(Debug, Error)]
pub enum RecordCampaignError {
    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}

/// Errors that can occur when listing past campaigns
#[derive(Debug, Error)]
pub enum ListCampaignsError {
    /// Unknown error
    #[error(transparent)]
    UnknownError(#[from] anyhow::Error),
}
