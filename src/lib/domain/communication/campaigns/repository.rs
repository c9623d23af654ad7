//! Campaign repository module

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::mock;

use crate::domain::communication::campaigns::{
    errors::{ListCampaignsError, RecordCampaignError},
    Campaign, NewCampaign,
};

/// Append-only campaign history
#[async_trait]
pub trait CampaignRepository: Clone + Send + Sync + 'static {
    /// Append a campaign summary
    async fn record_campaign(&self, campaign: &NewCampaign) -> Result<Uuid, RecordCampaignError>;

    /// The most recent campaigns, newest first
    async fn list_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, ListCampaignsError>;
}

#[cfg(test)]
mock! {
    pub CampaignRepository {}

    impl Clone for CampaignRepository {
        fn clone(&self) -> Self;
    }

    #[async_trait]
    impl CampaignRepository for CampaignRepository {
        async fn record_campaign(&self, campaign: &NewCampaign) -> Result<Uuid, RecordCampaignError>;
        async fn list_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, ListCampaignsError>;
    }
}
