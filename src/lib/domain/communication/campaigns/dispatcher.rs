//! Batched campaign dispatch

use std::{num::NonZeroUsize, sync::Arc};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::communication::{
    campaigns::{CampaignStatus, RenderedEmail},
    email_addresses::EmailAddress,
    mailer::Mailer,
};

/// What happened to a single send
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the transport
    Sent {
        /// Identifier assigned to the message
        message_id: String,
    },

    /// Rejected by, or never handed to, the transport
    Failed {
        /// Why the send failed
        error: String,
    },
}

/// The outcome of sending the campaign to one recipient
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The recipient
    pub email: EmailAddress,

    /// The delivery result
    pub delivery: Delivery,
}

impl DispatchOutcome {
    /// Whether the send succeeded
    pub fn is_sent(&self) -> bool {
        matches!(self.delivery, Delivery::Sent { .. })
    }
}

/// Every outcome of a dispatch run plus its aggregate counts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchReport {
    /// Per-recipient outcomes, in recipient order
    pub outcomes: Vec<DispatchOutcome>,

    /// Number of successful sends
    pub total_sent: usize,

    /// Number of failed sends
    pub total_failed: usize,

    /// Number of batches dispatched
    pub batches: usize,
}

impl DispatchReport {
    /// Build a report, counting successes and failures in `outcomes`
    pub fn new(outcomes: Vec<DispatchOutcome>, batches: usize) -> Self {
        let total_sent = outcomes.iter().filter(|outcome| outcome.is_sent()).count();
        let total_failed = outcomes.len() - total_sent;

        Self {
            outcomes,
            total_sent,
            total_failed,
            batches,
        }
    }

    /// Status derived from the counts
    pub fn status(&self) -> CampaignStatus {
        CampaignStatus::from_counts(self.total_sent, self.total_failed)
    }
}

/// Sends a rendered email to recipients in sequential, fixed-size batches.
///
/// Sends within a batch run concurrently; a batch starts only once the
/// previous one has fully settled, which caps the number of simultaneous
/// connections to the mail transport at the batch size.
#[derive(Debug, Clone)]
pub struct BatchDispatcher<M>
where
    M: Mailer,
{
    mailer: Arc<M>,
    batch_size: NonZeroUsize,
}

impl<M> BatchDispatcher<M>
where
    M: Mailer,
{
    /// Number of concurrent sends per batch unless configured otherwise
    pub const DEFAULT_BATCH_SIZE: usize = 10;

    /// Create a new dispatcher
    pub fn new(mailer: Arc<M>, batch_size: NonZeroUsize) -> Self {
        Self { mailer, batch_size }
    }

    /// The configured batch size
    pub fn batch_size(&self) -> usize {
        self.batch_size.get()
    }

    /// Send `email` to every recipient, returning one outcome per recipient.
    ///
    /// Never fails as a whole: a failed send is recorded in its outcome and
    /// does not affect any other send.
    pub async fn dispatch(
        &self,
        email: &RenderedEmail,
        subject: &str,
        recipients: &[EmailAddress],
    ) -> DispatchReport {
        let mut outcomes = Vec::with_capacity(recipients.len());
        let mut batches = 0;

        for batch in recipients.chunks(self.batch_size.get()) {
            batches += 1;

            debug!(batch = batches, size = batch.len(), "dispatching batch");

            let sends = batch
                .iter()
                .map(|recipient| self.send_one(recipient, subject, email));

            outcomes.extend(join_all(sends).await);
        }

        DispatchReport::new(outcomes, batches)
    }

    async fn send_one(
        &self,
        recipient: &EmailAddress,
        subject: &str,
        email: &RenderedEmail,
    ) -> DispatchOutcome {
        let delivery = match self
            .mailer
            .send_email(recipient, subject, &email.html, &email.plain)
            .await
        {
            Ok(message_id) => Delivery::Sent { message_id },
            Err(err) => {
                warn!(%recipient, error = %err, "campaign email failed");

                Delivery::Failed {
                    error: err.to_string(),
                }
            }
        };

        DispatchOutcome {
            email: recipient.clone(),
            delivery,
        }
    }
}
