//! Operator broadcast: the auction-launch announcement sent to every
//! subscriber, gated by a shared secret.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::application::delivery::{Mailer, OutboundEmail};
use crate::application::stores::{StoreError, SubscriberStore};
use crate::presentation::views::{BroadcastEmailView, render_template};

/// Pause between sends so the mail provider's rate limit is never hit.
const SEND_PACING: Duration = Duration::from_millis(100);

pub const BROADCAST_SUBJECT: &str = "🎨 The Auction is NOW LIVE — WORLD's FIRST CANNED BTC";

#[derive(Debug, Error)]
pub enum BroadcastError {
    #[error("broadcast key rejected")]
    Unauthorized,
    #[error("subscriber list unavailable")]
    Store(#[source] StoreError),
}

#[derive(Debug, Clone, Serialize)]
pub struct DeliveryRecord {
    pub email: String,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BroadcastSummary {
    pub total: usize,
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug, Clone)]
pub struct BroadcastReport {
    pub summary: BroadcastSummary,
    pub details: Vec<DeliveryRecord>,
}

pub struct BroadcastService {
    store: Arc<dyn SubscriberStore>,
    mailer: Arc<dyn Mailer>,
    from: String,
    secret_key: String,
}

impl BroadcastService {
    pub fn new(
        store: Arc<dyn SubscriberStore>,
        mailer: Arc<dyn Mailer>,
        from: String,
        secret_key: String,
    ) -> Self {
        Self {
            store,
            mailer,
            from,
            secret_key,
        }
    }

    /// Constant-time comparison keeps the key unguessable via timing.
    pub fn authorize(&self, presented: &str) -> Result<(), BroadcastError> {
        let valid: bool = presented
            .as_bytes()
            .ct_eq(self.secret_key.as_bytes())
            .into();
        if valid && !self.secret_key.is_empty() {
            Ok(())
        } else {
            Err(BroadcastError::Unauthorized)
        }
    }

    pub async fn send_launch_announcement(
        &self,
        presented_key: &str,
    ) -> Result<BroadcastReport, BroadcastError> {
        self.authorize(presented_key)?;

        let recipients = self
            .store
            .list_recipients()
            .await
            .map_err(BroadcastError::Store)?;

        let mut details = Vec::with_capacity(recipients.len());
        let total = recipients.len();
        for (index, recipient) in recipients.iter().enumerate() {
            let record = match self.send_one(&recipient.email, recipient.name.as_deref()).await {
                Ok(()) => DeliveryRecord {
                    email: recipient.email.clone(),
                    status: "sent",
                    error: None,
                },
                Err(err) => DeliveryRecord {
                    email: recipient.email.clone(),
                    status: "failed",
                    error: Some(err.to_string()),
                },
            };
            details.push(record);
            if index + 1 < total {
                tokio::time::sleep(SEND_PACING).await;
            }
        }

        let sent = details.iter().filter(|r| r.status == "sent").count();
        let failed = details.len() - sent;
        tracing::info!(
            target: "zyborn::broadcast",
            total,
            sent,
            failed,
            "launch announcement finished"
        );

        Ok(BroadcastReport {
            summary: BroadcastSummary {
                total,
                sent,
                failed,
            },
            details,
        })
    }

    async fn send_one(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let greeting = match name.filter(|v| !v.is_empty()) {
            Some(name) => format!("Dear {name},"),
            None => "Dear Collector,".to_string(),
        };
        let html = render_template("email/broadcast", &BroadcastEmailView { greeting })?;
        self.mailer
            .send(OutboundEmail {
                from: self.from.clone(),
                to: email.to_string(),
                subject: BROADCAST_SUBJECT.to_string(),
                html,
            })
            .await?;
        Ok(())
    }
}
