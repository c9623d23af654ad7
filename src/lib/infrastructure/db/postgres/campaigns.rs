//! Postgres implementation of the CampaignRepository trait

use anyhow::{anyhow, Context, Error};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query_as, query_scalar, FromRow};
use uuid::Uuid;

use crate::{
    domain::communication::campaigns::{
        errors::{ListCampaignsError, RecordCampaignError},
        Campaign, CampaignRepository, NewCampaign,
    },
    infrastructure::db::postgres::PostgresDatabase,
};

#[derive(FromRow)]
struct CampaignRecord {
    id: Uuid,
    target_filter: String,
    subject: String,
    body: String,
    campaign_type: String,
    total_sent: i32,
    total_failed: i32,
    status: String,
    initiated_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CampaignRecord> for Campaign {
    type Error = Error;

    fn try_from(record: CampaignRecord) -> Result<Self, Self::Error> {
        Ok(Campaign {
            id: record.id,
            target_filter: record.target_filter.parse()?,
            subject: record.subject,
            body: record.body,
            campaign_type: record.campaign_type.parse()?,
            total_sent: usize::try_from(record.total_sent)?,
            total_failed: usize::try_from(record.total_failed)?,
            status: record.status.parse()?,
            initiated_by: record.initiated_by,
            created_at: record.created_at,
        })
    }
}

#[async_trait]
impl CampaignRepository for PostgresDatabase {
    #[mutants::skip]
    async fn record_campaign(&self, campaign: &NewCampaign) -> Result<Uuid, RecordCampaignError> {
        let total_sent = i32::try_from(campaign.total_sent()).context("total_sent out of range")?;
        let total_failed =
            i32::try_from(campaign.total_failed()).context("total_failed out of range")?;

        Ok(query_scalar::<_, Uuid>(
            r#"
            INSERT INTO campaigns (
                id, target_filter, subject, body, campaign_type,
                total_sent, total_failed, status, initiated_by, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(campaign.id())
        .bind(campaign.target_filter().as_str())
        .bind(campaign.subject())
        .bind(campaign.body())
        .bind(campaign.campaign_type().as_str())
        .bind(total_sent)
        .bind(total_failed)
        .bind(campaign.status().as_str())
        .bind(campaign.initiated_by())
        .bind(campaign.created_at())
        .fetch_one(&self.pool)
        .await
        .map_err(|err| anyhow!("Unknown database error: {:?}", err))?)
    }

    #[mutants::skip]
    async fn list_campaigns(&self, limit: u32) -> Result<Vec<Campaign>, ListCampaignsError> {
        let records = query_as::<_, CampaignRecord>(
            r#"
            SELECT
                id,
                target_filter,
                subject,
                body,
                campaign_type,
                total_sent,
                total_failed,
                status,
                initiated_by,
                created_at
            FROM campaigns
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|err| anyhow!("Unknown database error: {:?}", err))?;

        Ok(records
            .into_iter()
            .map(Campaign::try_from)
            .collect::<Result<Vec<_>, _>>()?)
    }
}
