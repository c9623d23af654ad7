//! Campaign service module

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::{
    communication::{
        campaigns::{
            errors::{CampaignError, ListCampaignsError},
            select_recipients, BatchDispatcher, Campaign, CampaignRenderer, CampaignRepository,
            CampaignType, DispatchReport, NewCampaign, RecipientFilter,
        },
        mailer::Mailer,
    },
    users::UserRepository,
};

/// Number of campaigns returned by the history when no limit is given
pub const DEFAULT_HISTORY_LIMIT: u32 = 20;

/// Largest number of campaigns the history returns at once
pub const MAX_HISTORY_LIMIT: u32 = 100;

/// A request to send a campaign
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CampaignRequest {
    /// Email subject
    pub subject: String,

    /// Email body, trusted HTML
    pub body: String,

    /// Which members receive the campaign
    pub filter: RecipientFilter,

    /// Kind of campaign
    pub campaign_type: CampaignType,

    /// The member starting the campaign, if known
    pub sent_by: Option<Uuid>,
}

/// How a campaign run ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CampaignOutcome {
    /// Dispatch ran; individual sends may still have failed
    Completed(DispatchReport),

    /// No member matched the filter, nothing was sent
    NoRecipients(RecipientFilter),

    /// The run stopped before dispatch
    Failed(String),
}

/// Campaign service
#[async_trait]
pub trait CampaignService: Clone + Send + Sync + 'static {
    /// Sends a campaign to every member matching the request's filter.
    ///
    /// # Arguments
    /// * `request` - The [`CampaignRequest`] to send.
    ///
    /// # Returns
    /// A [`CampaignOutcome`]. This never fails: errors are reported through the outcome.
    async fn send_campaign(&self, request: &CampaignRequest) -> CampaignOutcome;

    /// Lists past campaigns, newest first.
    ///
    /// # Arguments
    /// * `limit` - Maximum number of campaigns, clamped to `1..=MAX_HISTORY_LIMIT`.
    ///
    /// # Returns
    /// The campaigns, or a [`ListCampaignsError`] if the history could not be read.
    async fn list_campaigns(&self, limit: Option<u32>) -> Result<Vec<Campaign>, ListCampaignsError>;
}

#[cfg(test)]
mock! {
    pub CampaignService {}

    impl Clone for CampaignService {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl CampaignService for CampaignService {
        async fn send_campaign(&self, request: &CampaignRequest) -> CampaignOutcome;
        async fn list_campaigns(&self, limit: Option<u32>) -> Result<Vec<Campaign>, ListCampaignsError>;
    }
}

/// Campaign service implementation
#[derive(Debug, Clone)]
pub struct CampaignServiceImpl<U, C, M, T>
where
    U: UserRepository,
    C: CampaignRepository,
    M: Mailer,
    T: CampaignRenderer,
{
    users: Arc<U>,
    campaigns: Arc<C>,
    dispatcher: BatchDispatcher<M>,
    renderer: Arc<T>,
}

impl<U, C, M, T> CampaignServiceImpl<U, C, M, T>
where
    U: UserRepository,
    C: CampaignRepository,
    M: Mailer,
    T: CampaignRenderer,
{
    /// Create a new campaign service
    pub fn new(
        users: Arc<U>,
        campaigns: Arc<C>,
        dispatcher: BatchDispatcher<M>,
        renderer: Arc<T>,
    ) -> Self {
        Self {
            users,
            campaigns,
            dispatcher,
            renderer,
        }
    }

    async fn run(&self, request: &CampaignRequest) -> Result<DispatchReport, CampaignError> {
        let (recipients, email) = tokio::join!(
            select_recipients(self.users.as_ref(), request.filter),
            async { self.renderer.render(&request.subject, &request.body) },
        );

        let recipients = recipients?;
        let email = email?;

        info!(
            filter = %request.filter,
            recipients = recipients.len(),
            batch_size = self.dispatcher.batch_size(),
            "dispatching campaign"
        );

        let report = self
            .dispatcher
            .dispatch(&email, &request.subject, &recipients)
            .await;

        self.record(request, &report).await;

        Ok(report)
    }

    /// Append the campaign summary. Failures are logged, never returned.
    async fn record(&self, request: &CampaignRequest, report: &DispatchReport) {
        let campaign = NewCampaign::new(request, report);

        match self.campaigns.record_campaign(&campaign).await {
            Ok(id) => info!(
                campaign_id = %id,
                status = %campaign.status(),
                total_sent = campaign.total_sent(),
                total_failed = campaign.total_failed(),
                "campaign recorded"
            ),
            Err(err) => error!(
                error = %err,
                status = %campaign.status(),
                "could not record campaign summary"
            ),
        }
    }
}

#[async_trait]
impl<U, C, M, T> CampaignService for CampaignServiceImpl<U, C, M, T>
where
    U: UserRepository,
    C: CampaignRepository,
    M: Mailer,
    T: CampaignRenderer,
{
    async fn send_campaign(&self, request: &CampaignRequest) -> CampaignOutcome {
        match self.run(request).await {
            Ok(report) => CampaignOutcome::Completed(report),
            Err(CampaignError::NoRecipients(filter)) => {
                info!(%filter, "no recipients for campaign");

                CampaignOutcome::NoRecipients(filter)
            }
            Err(err) => {
                error!(error = %err, "campaign failed before dispatch");

                CampaignOutcome::Failed(err.to_string())
            }
        }
    }

    async fn list_campaigns(&self, limit: Option<u32>) -> Result<Vec<Campaign>, ListCampaignsError> {
        let limit = limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .clamp(1, MAX_HISTORY_LIMIT);

        self.campaigns.list_campaigns(limit).await
    }
}
