//! Rate limiting for expensive endpoints

use std::{
    num::{NonZeroU32, NonZeroU64},
    sync::Arc,
};

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
    Json, Router,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::GlobalKeyExtractor, GovernorError,
    GovernorLayer,
};
use tracing::debug;

use super::errors::ApiError;

/// Global rate limit shared by every caller of a limited route
#[derive(Clone, Debug, PartialEq, Eq, Parser)]
pub struct RateLimitConfig {
    /// Seconds after which one request of the quota is replenished
    #[arg(long, env = "RATE_LIMIT_REPLENISH_SECONDS", default_value = "2")]
    pub replenish_seconds: NonZeroU64,

    /// The number of requests allowed in a burst
    #[arg(long, env = "RATE_LIMIT_BURST_SIZE", default_value = "5")]
    pub burst_size: NonZeroU32,
}

const DEFAULT_REPLENISH_SECONDS: NonZeroU64 = match NonZeroU64::new(2) {
    Some(seconds) => seconds,
    None => unreachable!(),
};

const DEFAULT_BURST_SIZE: NonZeroU32 = match NonZeroU32::new(5) {
    Some(size) => size,
    None => unreachable!(),
};

/// Raised when the limiter cannot be built from the configuration
#[derive(Debug, Error)]
#[error("invalid rate limit configuration: {0:?}")]
pub struct RateLimitConfigError(pub RateLimitConfig);

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            replenish_seconds: DEFAULT_REPLENISH_SECONDS,
            burst_size: DEFAULT_BURST_SIZE,
        }
    }
}

impl RateLimitConfig {
    /// Apply the limit to every route already added to `router`.
    ///
    /// Fails instead of returning the routes unlimited.
    pub fn limit<S>(&self, router: Router<S>) -> Result<Router<S>, RateLimitConfigError>
    where
        S: Clone + Send + Sync + 'static,
    {
        let config = GovernorConfigBuilder::default()
            .key_extractor(GlobalKeyExtractor)
            .per_second(self.replenish_seconds.get())
            .burst_size(self.burst_size.get())
            .error_handler(rate_limit_error_handler)
            .finish()
            .ok_or_else(|| RateLimitConfigError(self.clone()))?;

        Ok(router.route_layer(GovernorLayer {
            config: Arc::new(config),
        }))
    }
}

/// Body returned once the quota is exhausted
#[derive(Debug, Serialize, Deserialize)]
pub struct TooManyRequestsResponse {
    /// Seconds until the next request is accepted
    pub retry_after: u64,
}

/// Rate limit error handler
pub fn rate_limit_error_handler(err: GovernorError) -> Response<Body> {
    match err {
        GovernorError::TooManyRequests { wait_time, .. } => {
            debug!(retry_after = wait_time, "rate limit exceeded");

            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(TooManyRequestsResponse {
                    retry_after: wait_time,
                }),
            )
                .into_response()
        }
        _ => ApiError::new_500("Internal Server Error").into_response(),
    }
}
