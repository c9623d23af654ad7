//! Campaign records

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::communication::campaigns::{
    errors::UnknownCampaignTypeError, CampaignRequest, DispatchReport, RecipientFilter,
};

/// The kind of campaign being sent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    /// A one-off message composed by an administrator
    #[default]
    QuickMessage,

    /// A periodic newsletter
    Newsletter,

    /// A general announcement
    Announcement,

    /// An invitation to an event
    EventInvitation,
}

impl CampaignType {
    /// The stored representation of the campaign type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::QuickMessage => "quick_message",
            Self::Newsletter => "newsletter",
            Self::Announcement => "announcement",
            Self::EventInvitation => "event_invitation",
        }
    }
}

impl fmt::Display for CampaignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignType {
    type Err = UnknownCampaignTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quick_message" => Ok(Self::QuickMessage),
            "newsletter" => Ok(Self::Newsletter),
            "announcement" => Ok(Self::Announcement),
            "event_invitation" => Ok(Self::EventInvitation),
            _ => Err(UnknownCampaignTypeError(s.to_string())),
        }
    }
}

/// Overall result of a campaign, derived from its send counts
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// No send failed
    Sent,

    /// No send succeeded
    Failed,

    /// Some sends succeeded and some failed
    Partial,
}

impl CampaignStatus {
    /// `Sent` iff nothing failed, `Failed` iff nothing was sent, `Partial` otherwise
    pub fn from_counts(total_sent: usize, total_failed: usize) -> Self {
        if total_failed == 0 {
            Self::Sent
        } else if total_sent == 0 {
            Self::Failed
        } else {
            Self::Partial
        }
    }

    /// The stored representation of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Failed => "failed",
            Self::Partial => "partial",
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sent" => Ok(Self::Sent),
            "failed" => Ok(Self::Failed),
            "partial" => Ok(Self::Partial),
            _ => Err(anyhow::anyhow!("unknown campaign status \"{s}\"")),
        }
    }
}

/// A recorded campaign
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Campaign {
    /// Campaign UUID
    pub id: Uuid,

    /// The filter recipients were selected with
    pub target_filter: RecipientFilter,

    /// Email subject
    pub subject: String,

    /// Email body, may contain HTML
    pub body: String,

    /// Kind of campaign
    pub campaign_type: CampaignType,

    /// Number of successful sends
    pub total_sent: usize,

    /// Number of failed sends
    pub total_failed: usize,

    /// Status derived from the counts
    pub status: CampaignStatus,

    /// The member who started the campaign, if known
    pub initiated_by: Option<Uuid>,

    /// When the campaign finished dispatching
    pub created_at: DateTime<Utc>,
}

/// The summary of a finished dispatch run, ready to be appended to the history
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCampaign {
    id: Uuid,
    target_filter: RecipientFilter,
    subject: String,
    body: String,
    campaign_type: CampaignType,
    total_sent: usize,
    total_failed: usize,
    status: CampaignStatus,
    initiated_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl NewCampaign {
    /// Summarise `report` for the campaign described by `request`
    pub fn new(request: &CampaignRequest, report: &DispatchReport) -> Self {
        Self {
            id: Uuid::now_v7(),
            target_filter: request.filter,
            subject: request.subject.clone(),
            body: request.body.clone(),
            campaign_type: request.campaign_type,
            total_sent: report.total_sent,
            total_failed: report.total_failed,
            status: report.status(),
            initiated_by: request.sent_by,
            created_at: Utc::now(),
        }
    }

    /// Campaign UUID
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// The filter recipients were selected with
    pub fn target_filter(&self) -> RecipientFilter {
        self.target_filter
    }

    /// Email subject
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Email body
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Kind of campaign
    pub fn campaign_type(&self) -> CampaignType {
        self.campaign_type
    }

    /// Number of successful sends
    pub fn total_sent(&self) -> usize {
        self.total_sent
    }

    /// Number of failed sends
    pub fn total_failed(&self) -> usize {
        self.total_failed
    }

    /// Status derived from the counts
    pub fn status(&self) -> CampaignStatus {
        self.status
    }

    /// The member who started the campaign
    pub fn initiated_by(&self) -> Option<&Uuid> {
        self.initiated_by.as_ref()
    }

    /// When the campaign finished dispatching
    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}
