//! Send campaign handler

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    domain::{
        communication::campaigns::{
            CampaignOutcome, CampaignRequest, CampaignService, CampaignStatus, CampaignType,
            Delivery, DispatchOutcome, DispatchReport, RecipientFilter,
        },
        users::UserService,
    },
    infrastructure::http::{errors::ApiError, state::AppState},
};

/// Send campaign request body
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaignBody {
    /// Email subject
    #[schema(example = "Homecoming weekend")]
    subject: String,

    /// Email body, HTML inserted into the template as-is
    #[schema(example = "<p>Join us on campus this October.</p>")]
    body: String,

    /// Recipient filter: `student`, `alumni`, `donor` or `all` (default)
    #[schema(example = "alumni")]
    filter: Option<String>,

    /// Campaign type, defaults to `quick_message`
    #[serde(rename = "type")]
    #[schema(example = "announcement")]
    campaign_type: Option<String>,

    /// The member sending the campaign
    sent_by: Option<Uuid>,
}

impl TryFrom<SendCampaignBody> for CampaignRequest {
    type Error = ApiError;

    fn try_from(body: SendCampaignBody) -> Result<Self, Self::Error> {
        if body.subject.trim().is_empty() {
            return Err(ApiError::new_422("Please provide a subject"));
        }

        if body.body.trim().is_empty() {
            return Err(ApiError::new_422("Please provide a body"));
        }

        let filter = match body.filter.as_deref() {
            Some(filter) => filter.parse::<RecipientFilter>()?,
            None => RecipientFilter::default(),
        };

        let campaign_type = match body.campaign_type.as_deref() {
            Some(campaign_type) => campaign_type.parse::<CampaignType>()?,
            None => CampaignType::default(),
        };

        Ok(Self {
            subject: body.subject,
            body: body.body,
            filter,
            campaign_type,
            sent_by: body.sent_by,
        })
    }
}

/// Delivery result for one recipient
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryDetail {
    #[schema(example = "grad@example.com")]
    email: String,

    success: bool,

    /// Message-ID assigned by the mailer
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "<0192a7c4-3f1e-7d2a-9b41-5c0e8f6d2a11@alumnihub.org>")]
    message_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl From<&DispatchOutcome> for DeliveryDetail {
    fn from(outcome: &DispatchOutcome) -> Self {
        let (message_id, error) = match &outcome.delivery {
            Delivery::Sent { message_id } => (Some(message_id.clone()), None),
            Delivery::Failed { error } => (None, Some(error.clone())),
        };

        Self {
            email: outcome.email.to_string(),
            success: outcome.is_sent(),
            message_id,
            error,
        }
    }
}

/// Send campaign response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendCampaignResponse {
    /// Whether dispatch ran; see `status` for how it went
    success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "No recipients found for the selected filter")]
    message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<CampaignStatus>,

    #[schema(example = 20)]
    total_sent: usize,

    #[schema(example = 3)]
    total_failed: usize,

    #[schema(example = 3)]
    batches: usize,

    #[serde(default)]
    details: Vec<DeliveryDetail>,
}

impl SendCampaignResponse {
    fn not_sent(message: &str, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            error,
            status: None,
            total_sent: 0,
            total_failed: 0,
            batches: 0,
            details: Vec::new(),
        }
    }
}

impl From<DispatchReport> for SendCampaignResponse {
    fn from(report: DispatchReport) -> Self {
        Self {
            success: true,
            message: None,
            error: None,
            status: Some(report.status()),
            total_sent: report.total_sent,
            total_failed: report.total_failed,
            batches: report.batches,
            details: report.outcomes.iter().map(DeliveryDetail::from).collect(),
        }
    }
}

/// Map a campaign outcome to its response and status code
fn respond(outcome: CampaignOutcome) -> (StatusCode, SendCampaignResponse) {
    match outcome {
        CampaignOutcome::Completed(report) => (StatusCode::OK, report.into()),
        CampaignOutcome::NoRecipients(_) => (
            StatusCode::NOT_FOUND,
            SendCampaignResponse::not_sent("No recipients found for the selected filter", None),
        ),
        CampaignOutcome::Failed(error) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            SendCampaignResponse::not_sent("Failed to send bulk emails", Some(error)),
        ),
    }
}

/// Send a bulk email campaign
#[utoipa::path(
    post,
    operation_id = "send_campaign",
    tag = "Campaigns",
    path = "/api/v1/campaigns",
    request_body = SendCampaignBody,
    responses(
        (status = StatusCode::OK, description = "Dispatch completed, see status for partial or failed runs", body = SendCampaignResponse),
        (status = StatusCode::NOT_FOUND, description = "No members match the filter", body = SendCampaignResponse),
        (status = StatusCode::UNPROCESSABLE_ENTITY, description = "Unprocessable entity", body = ErrorResponse),
        (status = StatusCode::TOO_MANY_REQUESTS, description = "Too many requests"),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Campaign failed before dispatch", body = SendCampaignResponse),
    )
)]
pub async fn handler<U: UserService, C: CampaignService>(
    State(state): State<AppState<U, C>>,
    request: Result<Json<SendCampaignBody>, JsonRejection>,
) -> Result<(StatusCode, Json<SendCampaignResponse>), ApiError> {
    let Json(request) = request?;

    let request: CampaignRequest = request.try_into()?;

    let (status, response) = respond(state.campaigns.send_campaign(&request).await);

    Ok((status, Json(response)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use testresult::TestResult;
    use uuid::Uuid;

    use crate::{
        domain::communication::{
            campaigns::{
                tests::MockCampaignService, CampaignOutcome, CampaignStatus, CampaignType, Delivery,
                DispatchOutcome, DispatchReport, RecipientFilter,
            },
            email_addresses::EmailAddress,
        },
        infrastructure::http::{errors::ErrorResponse, router, state::tests::test_state},
    };

    use super::{SendCampaignBody, SendCampaignResponse};

    impl SendCampaignBody {
        fn new(subject: &str, body: &str) -> Self {
            Self {
                subject: subject.to_string(),
                body: body.to_string(),
                ..Self::default()
            }
        }

        fn with_filter(mut self, filter: &str) -> Self {
            self.filter = Some(filter.to_string());
            self
        }

        fn with_type(mut self, campaign_type: &str) -> Self {
            self.campaign_type = Some(campaign_type.to_string());
            self
        }
    }

    fn partial_report() -> DispatchReport {
        let outcomes = (0..23)
            .map(|n| DispatchOutcome {
                email: EmailAddress::new_unchecked(&format!("student{n}@example.com")),
                delivery: if n % 8 == 3 {
                    Delivery::Failed {
                        error: "could not send the email: 550 mailbox unavailable".to_string(),
                    }
                } else {
                    Delivery::Sent {
                        message_id: format!("<{n}@alumnihub.test>"),
                    }
                },
            })
            .collect();

        DispatchReport::new(outcomes, 3)
    }

    #[tokio::test]
    async fn test_send_campaign_partial() -> TestResult {
        let mut campaigns = MockCampaignService::new();
        let sender = Uuid::now_v7();

        campaigns
            .expect_send_campaign()
            .times(1)
            .withf(move |request| {
                request.filter == RecipientFilter::Student
                    && request.campaign_type == CampaignType::Announcement
                    && request.subject == "Homecoming"
                    && request.sent_by == Some(sender)
            })
            .returning(|_| CampaignOutcome::Completed(partial_report()));

        let state = test_state(None, Some(campaigns));

        let mut body = SendCampaignBody::new("Homecoming", "<p>See you there</p>")
            .with_filter("student")
            .with_type("announcement");
        body.sent_by = Some(sender);

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&body)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let json = response.json::<SendCampaignResponse>();

        assert!(json.success);
        assert_eq!(json.status, Some(CampaignStatus::Partial));
        assert_eq!(json.total_sent, 20);
        assert_eq!(json.total_failed, 3);
        assert_eq!(json.batches, 3);
        assert_eq!(json.details.len(), 23);
        assert!(!json.details[3].success);
        assert_eq!(
            json.details[0].message_id.as_deref(),
            Some("<0@alumnihub.test>")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_uses_camel_case_keys() -> TestResult {
        let mut campaigns = MockCampaignService::new();

        campaigns
            .expect_send_campaign()
            .returning(|_| CampaignOutcome::Completed(partial_report()));

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&serde_json::json!({ "subject": "Homecoming", "body": "<p>Hi</p>" }))
            .await;

        let json = response.json::<serde_json::Value>();

        assert_eq!(json["totalSent"], 20);
        assert_eq!(json["totalFailed"], 3);
        assert_eq!(json["status"], "partial");
        assert!(json["details"][1]["messageId"].is_string());
        assert!(json.get("message").is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_defaults_to_all_members() -> TestResult {
        let mut campaigns = MockCampaignService::new();

        campaigns
            .expect_send_campaign()
            .times(1)
            .withf(|request| {
                request.filter == RecipientFilter::All
                    && request.campaign_type == CampaignType::QuickMessage
                    && request.sent_by.is_none()
            })
            .returning(|_| CampaignOutcome::Completed(DispatchReport::new(Vec::new(), 0)));

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&SendCampaignBody::new("Hello", "<p>Hello</p>"))
            .await;

        response.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_no_recipients() -> TestResult {
        let mut campaigns = MockCampaignService::new();

        campaigns
            .expect_send_campaign()
            .returning(|_| CampaignOutcome::NoRecipients(RecipientFilter::Donor));

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&SendCampaignBody::new("Gala", "<p>Thank you</p>").with_filter("donor"))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let json = response.json::<SendCampaignResponse>();

        assert!(!json.success);
        assert_eq!(
            json.message.as_deref(),
            Some("No recipients found for the selected filter")
        );
        assert!(json.details.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_failure() -> TestResult {
        let mut campaigns = MockCampaignService::new();

        campaigns.expect_send_campaign().returning(|_| {
            CampaignOutcome::Failed("could not look up recipients: pool timed out".to_string())
        });

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&SendCampaignBody::new("Hello", "<p>Hello</p>"))
            .await;

        assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = response.json::<SendCampaignResponse>();

        assert!(!json.success);
        assert_eq!(json.message.as_deref(), Some("Failed to send bulk emails"));
        assert_eq!(
            json.error.as_deref(),
            Some("could not look up recipients: pool timed out")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_empty_subject() -> TestResult {
        let mut campaigns = MockCampaignService::new();
        campaigns.expect_send_campaign().times(0);

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&SendCampaignBody::new("   ", "<p>Hello</p>"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "Please provide a subject");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_unknown_filter() -> TestResult {
        let mut campaigns = MockCampaignService::new();
        campaigns.expect_send_campaign().times(0);

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&SendCampaignBody::new("Hello", "<p>Hello</p>").with_filter("faculty"))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_unknown_type() -> TestResult {
        let mut campaigns = MockCampaignService::new();
        campaigns.expect_send_campaign().times(0);

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&SendCampaignBody::new("Hello", "<p>Hello</p>").with_type("webinar"))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json.error.starts_with("Unknown campaign type \"webinar\""));

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_blank_body() -> TestResult {
        let mut campaigns = MockCampaignService::new();
        campaigns.expect_send_campaign().times(0);

        let state = test_state(None, Some(campaigns));

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&SendCampaignBody::new("Hello", "  \n "))
            .await;

        let json = response.json::<ErrorResponse>();

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json.error, "Please provide a body");

        Ok(())
    }

    #[tokio::test]
    async fn test_send_campaign_malformed_json() -> TestResult {
        let state = test_state(None, None);

        let response = TestServer::new(router(state)?)?
            .post("/api/v1/campaigns")
            .json(&serde_json::json!({ "subject": "Hello" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        Ok(())
    }
}
