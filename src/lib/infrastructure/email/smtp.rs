//! SMTP email service implementation

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use clap::{Parser, ValueEnum};
use lettre::{
    address::AddressError,
    message::{Mailbox, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tokio::sync::OnceCell;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::communication::{
    email_addresses::EmailAddress,
    mailer::{Mailer, MailerError},
};

/// How the connection to the SMTP server is secured
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SmtpTls {
    /// Plain connection, for local relays such as Mailpit
    None,

    /// Upgrade with STARTTLS when the server offers it
    Opportunistic,

    /// Require a STARTTLS upgrade
    #[default]
    Starttls,

    /// Connect over implicit TLS
    Wrapper,
}

/// SMTP configuration
#[derive(Clone, Debug, Parser)]
pub struct SMTPConfig {
    /// The SMTP host
    #[arg(long = "smtp-host", env = "SMTP_HOST")]
    pub host: String,

    /// The SMTP port
    #[arg(long = "smtp-port", env = "SMTP_PORT", default_value = "587")]
    pub port: u16,

    /// The SMTP username, credentials are skipped when empty
    #[arg(long = "smtp-user", env = "SMTP_USER", default_value = "")]
    pub username: String,

    /// The SMTP password
    #[arg(long = "smtp-password", env = "SMTP_PASSWORD", default_value = "")]
    pub password: String,

    /// The sender mailbox, e.g. `AlumniHub <noreply@example.com>`
    #[arg(long = "smtp-sender", env = "SMTP_SENDER")]
    pub sender: String,

    /// Verify the TLS certificate
    #[arg(
        long = "smtp-verify-tls",
        env = "SMTP_VERIFY_TLS",
        default_value = "true",
        action = clap::ArgAction::Set
    )]
    pub verify_tls: bool,

    /// Connection security
    #[arg(long = "smtp-tls", env = "SMTP_TLS", value_enum, default_value_t = SmtpTls::Starttls)]
    pub tls: SmtpTls,
}

/// SMTP mailer.
///
/// The pooled transport is built on the first send and shared by every clone
/// of the mailer; its connections are closed when the last clone is dropped.
#[derive(Clone)]
pub struct SMTPMailer {
    config: SMTPConfig,
    sender: Mailbox,
    transport: Arc<OnceCell<AsyncSmtpTransport<Tokio1Executor>>>,
}

impl SMTPMailer {
    /// Create a new SMTP mailer
    pub fn new(config: SMTPConfig) -> Result<Self, MailerError> {
        let sender = config.sender.parse::<Mailbox>()?;

        Ok(Self {
            config,
            sender,
            transport: Arc::new(OnceCell::new()),
        })
    }

    async fn transport(&self) -> Result<&AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        self.transport
            .get_or_try_init(|| async { self.build_transport() })
            .await
    }

    fn build_transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailerError> {
        let tls_parameters = || {
            TlsParameters::builder(self.config.host.clone())
                .dangerous_accept_invalid_certs(!self.config.verify_tls)
                .build()
                .map_err(|err| MailerError::UnknownError(err.into()))
        };

        let tls = match self.config.tls {
            SmtpTls::None => Tls::None,
            SmtpTls::Opportunistic => Tls::Opportunistic(tls_parameters()?),
            SmtpTls::Starttls => Tls::Required(tls_parameters()?),
            SmtpTls::Wrapper => Tls::Wrapper(tls_parameters()?),
        };

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&self.config.host)
            .port(self.config.port)
            .tls(tls);

        if !self.config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }

        info!(
            host = %self.config.host,
            port = self.config.port,
            tls = ?self.config.tls,
            "SMTP transport initialised"
        );

        Ok(builder.build())
    }

    fn message_id(&self) -> String {
        format!("<{}@{}>", Uuid::now_v7(), self.sender.email.domain())
    }
}

impl fmt::Debug for SMTPMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SMTPMailer")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("sender", &self.sender.to_string())
            .field("connected", &self.transport.initialized())
            .finish()
    }
}

#[async_trait]
impl Mailer for SMTPMailer {
    async fn send_email(
        &self,
        to: &EmailAddress,
        subject: &str,
        html: &str,
        plain: &str,
    ) -> Result<String, MailerError> {
        let message_id = self.message_id();

        let email = Message::builder()
            .from(self.sender.clone())
            .to(to.as_str().parse::<Mailbox>()?)
            .subject(subject)
            .message_id(Some(message_id.clone()))
            .multipart(MultiPart::alternative_plain_html(
                String::from(plain),
                String::from(html),
            ))
            .map_err(|err| MailerError::UnknownError(err.into()))?;

        self.transport()
            .await?
            .send(email)
            .await
            .map_err(|err| MailerError::SendError(err.to_string()))?;

        debug!(%to, %message_id, "email sent");

        Ok(message_id)
    }
}

impl From<AddressError> for MailerError {
    fn from(_err: AddressError) -> Self {
        MailerError::InvalidEmail
    }
}
