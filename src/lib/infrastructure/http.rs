//! HTTP Server

use std::{
    future,
    net::{IpAddr, SocketAddr},
    time::Duration,
};

use anyhow::{Context, Result};
use axum::{extract::Request, Router};
use axum_server::{tls_rustls::RustlsConfig, Handle};
use clap::Parser;
use tokio::signal;
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};
use tracing::{error, info, info_span};

use crate::domain::{communication::campaigns::CampaignService, users::UserService};

use handlers::{panic_handler, v1};
use rate_limit::RateLimitConfigError;
use state::AppState;

pub mod errors;
pub mod handlers;
pub mod open_api;
pub mod rate_limit;
pub mod state;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
pub struct HttpServerConfig {
    /// The address to bind, `::` for every IPv4 and IPv6 interface
    #[arg(long = "http-host", env = "HTTP_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// The port to listen on
    #[arg(long = "http-port", env = "HTTP_PORT", default_value = "3000")]
    pub port: u16,

    /// PEM certificate; HTTPS is served when both the certificate and key are set
    #[arg(long = "tls-cert-path", env = "TLS_CERT_PATH")]
    pub cert_path: Option<String>,

    /// PEM private key
    #[arg(long = "tls-key-path", env = "TLS_KEY_PATH")]
    pub key_path: Option<String>,
}

/// The application's HTTP server
#[derive(Debug)]
pub struct HttpServer {
    router: Router,
    address: SocketAddr,
    tls_config: Option<RustlsConfig>,
}

impl HttpServerConfig {
    /// The socket address the server binds to
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl HttpServer {
    /// Returns a new server bound to `address`, serving HTTPS when TLS is configured.
    pub async fn new<U, C>(
        address: SocketAddr,
        config: &HttpServerConfig,
        state: AppState<U, C>,
    ) -> Result<Self>
    where
        U: UserService,
        C: CampaignService,
    {
        let tls_config = match (&config.cert_path, &config.key_path) {
            (Some(cert_path), Some(key_path)) => Some(
                RustlsConfig::from_pem_file(cert_path, key_path)
                    .await
                    .context("failed to load TLS config")?,
            ),
            _ => None,
        };

        Ok(Self {
            router: router(state)?,
            address,
            tls_config,
        })
    }

    /// Runs the server until a shutdown signal is received.
    #[mutants::skip]
    pub async fn run(self) -> Result<()> {
        let handle = Handle::new();

        tokio::spawn(shutdown_signal(handle.clone()));

        let service = self.router.into_make_service();

        let result = match self.tls_config {
            Some(tls_config) => {
                info!("HTTPS server listening on {}", self.address);

                axum_server::bind_rustls(self.address, tls_config)
                    .handle(handle)
                    .serve(service)
                    .await
            }
            None => {
                info!("HTTP server listening on {}", self.address);

                axum_server::bind(self.address)
                    .handle(handle)
                    .serve(service)
                    .await
            }
        };

        result.context("server error")
    }
}

/// Create the application's router
pub fn router<U, C>(state: AppState<U, C>) -> Result<Router, RateLimitConfigError>
where
    U: UserService,
    C: CampaignService,
{
    let trace_layer = TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
        let uri = request.uri().to_string();
        info_span!("http_request", method = ?request.method(), uri)
    });

    Ok(Router::new()
        .nest("/api/v1", v1::router(&state.config.rate_limit)?)
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::custom(panic_handler))
        .layer(trace_layer)
        .with_state(state))
}

#[mutants::skip]
async fn shutdown_signal(handle: Handle) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(err) => {
                error!("failed to install SIGTERM handler: {err}");
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutting down gracefully");
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}
