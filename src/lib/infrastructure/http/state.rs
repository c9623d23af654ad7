//! Application state module

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    domain::{communication::campaigns::CampaignService, users::UserService},
    infrastructure::http::rate_limit::RateLimitConfig,
};

/// Application configuration
#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    /// Rate limit applied to campaign dispatch
    pub rate_limit: RateLimitConfig,
}

/// Global application state
#[derive(Clone)]
pub struct AppState<U: UserService, C: CampaignService> {
    /// The time the server started
    pub start_time: DateTime<Utc>,

    /// The application configuration
    pub config: AppConfig,

    /// User service
    pub users: Arc<U>,

    /// Campaign service
    pub campaigns: Arc<C>,
}

impl<U, C> AppState<U, C>
where
    U: UserService,
    C: CampaignService,
{
    /// Create a new application state
    pub fn new(config: AppConfig, users: U, campaigns: C) -> Self {
        Self {
            start_time: Utc::now(),
            config,
            users: Arc::new(users),
            campaigns: Arc::new(campaigns),
        }
    }
}

impl<U, C> fmt::Debug for AppState<U, C>
where
    U: UserService,
    C: CampaignService,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("start_time", &self.start_time)
            .field("config", &self.config)
            .field("users", &"UserService")
            .field("campaigns", &"CampaignService")
            .finish()
    }
}
