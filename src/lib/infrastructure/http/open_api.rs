//! OpenAPI module

use utoipa::OpenApi;

use crate::{
    domain::{
        communication::campaigns::{CampaignStatus, CampaignType, RecipientFilter},
        users::Role,
    },
    infrastructure::http::{errors::ErrorResponse, handlers::v1::*},
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "AlumniHub"),
    paths(
        campaigns::send_campaign::handler,
        campaigns::list_campaigns::handler,
        users::create_user::handler,
        users::get_user_by_id::handler,
        uptime::handler
    ),
    components(schemas(
        campaigns::send_campaign::SendCampaignBody,
        campaigns::send_campaign::SendCampaignResponse,
        campaigns::send_campaign::DeliveryDetail,
        campaigns::list_campaigns::CampaignResponse,
        users::create_user::CreateUserBody,
        users::create_user::CreateUserResponse,
        users::get_user_by_id::GetUserByIdResponse,
        uptime::UptimeResponse,
        CampaignStatus,
        CampaignType,
        RecipientFilter,
        Role,
        ErrorResponse,
    ))
)]
pub struct ApiDocs;

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use testresult::TestResult;

    use crate::infrastructure::http::{router, state::tests::test_state};

    #[tokio::test]
    async fn test_openapi_document_lists_campaign_routes() -> TestResult {
        let state = test_state(None, None);

        let response = TestServer::new(router(state)?)?
            .get("/api/v1/openapi.json")
            .await;

        response.assert_status_ok();

        let json = response.json::<serde_json::Value>();

        assert!(json["paths"]["/api/v1/campaigns"]["post"].is_object());
        assert!(json["paths"]["/api/v1/campaigns"]["get"].is_object());
        assert!(json["components"]["schemas"]["SendCampaignResponse"].is_object());

        Ok(())
    }
}
