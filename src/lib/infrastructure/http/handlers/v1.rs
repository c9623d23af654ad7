//! Version 1 of the API

use axum::{
    routing::{get, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{
    domain::{communication::campaigns::CampaignService, users::UserService},
    infrastructure::http::{
        open_api::ApiDocs,
        rate_limit::{RateLimitConfig, RateLimitConfigError},
        state::AppState,
    },
};

pub mod campaigns;
pub mod stoplight;
pub mod uptime;
pub mod users;

/// Routes served under `/api/v1`; campaign dispatch sits behind `rate_limit`.
pub fn router<U, C>(
    rate_limit: &RateLimitConfig,
) -> Result<Router<AppState<U, C>>, RateLimitConfigError>
where
    U: UserService,
    C: CampaignService,
{
    let dispatch = rate_limit.limit(
        Router::new().route("/campaigns", post(campaigns::send_campaign::handler)),
    )?;

    Ok(Router::new()
        .route("/", get(stoplight::handler))
        .route("/openapi.json", get(Json(ApiDocs::openapi())))
        .route("/uptime", get(uptime::handler))
        .route("/users", post(users::create_user::handler))
        .route("/users/:id", get(users::get_user_by_id::handler))
        .route("/campaigns", get(campaigns::list_campaigns::handler))
        .merge(dispatch))
}
