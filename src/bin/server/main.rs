#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! REST API for the AlumniHub campaign service

use std::{num::NonZeroUsize, sync::Arc};

use alumni_hub::{
    domain::{
        communication::campaigns::{
            BatchDispatcher, CampaignServiceImpl, HtmlCampaignRenderer, OrganizationDetails,
        },
        users::UserServiceImpl,
    },
    infrastructure::{
        db::postgres::{DatabaseConnectionDetails, PostgresDatabase},
        email::smtp::{SMTPConfig, SMTPMailer},
        http::{
            rate_limit::RateLimitConfig,
            state::{AppConfig, AppState},
            HttpServer, HttpServerConfig,
        },
    },
};
use anyhow::{anyhow, Result};
use clap::Parser;
use tracing::info;

/// Organization shown in campaign emails
#[derive(Debug, Clone, Parser)]
pub struct OrganizationConfig {
    /// The organization name
    #[arg(long = "organization-name", env = "ORGANIZATION_NAME", default_value = "AlumniHub")]
    pub name: String,

    /// The contact address in the email footer
    #[arg(long = "organization-contact-email", env = "ORGANIZATION_CONTACT_EMAIL")]
    pub contact_email: String,
}

/// Campaign dispatch settings
#[derive(Debug, Clone, Parser)]
pub struct CampaignConfig {
    /// Number of emails sent concurrently in one batch
    #[arg(long = "campaign-batch-size", env = "CAMPAIGN_BATCH_SIZE", default_value = "10")]
    pub batch_size: NonZeroUsize,
}

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The database connection details
    #[clap(flatten)]
    pub db: DatabaseConnectionDetails,

    /// The SMTP configuration
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The organization details
    #[clap(flatten)]
    pub organization: OrganizationConfig,

    /// The campaign settings
    #[clap(flatten)]
    pub campaign: CampaignConfig,

    /// The campaign dispatch rate limit
    #[clap(flatten)]
    pub rate_limit: RateLimitConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load environment: {}", e);

            return Err(e.into());
        }
    }

    tracing_subscriber::fmt::init();

    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow!("failed to install the rustls crypto provider"))?;

    let args = Args::parse();

    let postgres = Arc::new(PostgresDatabase::new(&args.db).await?);
    postgres.migrate().await?;

    let mailer = Arc::new(SMTPMailer::new(args.smtp)?);

    let renderer = Arc::new(HtmlCampaignRenderer::new(OrganizationDetails {
        name: args.organization.name,
        contact_email: args.organization.contact_email,
    }));

    let campaigns = CampaignServiceImpl::new(
        postgres.clone(),
        postgres.clone(),
        BatchDispatcher::new(mailer, args.campaign.batch_size),
        renderer,
    );

    let state = AppState::new(
        AppConfig {
            rate_limit: args.rate_limit,
        },
        UserServiceImpl::new(postgres),
        campaigns,
    );

    info!(batch_size = args.campaign.batch_size.get(), "starting AlumniHub");

    HttpServer::new(args.server.address(), &args.server, state)
        .await?
        .run()
        .await
}
