//! Campaign history handler

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    domain::{
        communication::campaigns::{
            Campaign, CampaignService, CampaignStatus, CampaignType, RecipientFilter,
        },
        users::UserService,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Campaign history query parameters
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCampaignsParams {
    /// Maximum number of campaigns, between 1 and 100 (default 20)
    #[param(example = 20)]
    limit: Option<u32>,
}

/// A past campaign
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CampaignResponse {
    id: Uuid,
    target_filter: RecipientFilter,
    subject: String,
    body: String,
    #[serde(rename = "type")]
    campaign_type: CampaignType,
    total_sent: usize,
    total_failed: usize,
    status: CampaignStatus,
    initiated_by: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<Campaign> for CampaignResponse {
    fn from(campaign: Campaign) -> Self {
        Self {
            id: campaign.id,
            target_filter: campaign.target_filter,
            subject: campaign.subject,
            body: campaign.body,
            campaign_type: campaign.campaign_type,
            total_sent: campaign.total_sent,
            total_failed: campaign.total_failed,
            status: campaign.status,
            initiated_by: campaign.initiated_by,
            created_at: campaign.created_at,
        }
    }
}

/// List past campaigns, newest first
#[utoipa::path(
    get,
    operation_id = "list_campaigns",
    tag = "Campaigns",
    path = "/api/v1/campaigns",
    params(ListCampaignsParams),
    responses(
        (status = StatusCode::OK, description = "Campaign history", body = [CampaignResponse]),
        (status = StatusCode::BAD_REQUEST, description = "Invalid query", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error", body = ErrorResponse),
    )
)]
pub async fn handler<U: UserService, C: CampaignService>(
    State(state): State<AppState<U, C>>,
    params: Result<Query<ListCampaignsParams>, QueryRejection>,
) -> Result<Json<Vec<CampaignResponse>>, ApiError> {
    let Query(params) = params?;

    let campaigns = state
        .campaigns
        .list_campaigns(params.limit)
        .await?
        .into_iter()
        .map(CampaignResponse::from)
        .collect();

    Ok(Json(campaigns))
}
