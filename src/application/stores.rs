//! Persistence ports backed by the Supabase REST adapter in production and
//! by in-memory fakes in the integration tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::chips::{ChipRecord, ChipUid};
use crate::domain::email::EmailAddress;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store credentials are not configured")]
    NotConfigured,
    #[error("store request failed: {0}")]
    Unavailable(String),
    #[error("duplicate record violates unique constraint on `{constraint}`")]
    Duplicate { constraint: String },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn duplicate(constraint: impl Into<String>) -> Self {
        Self::Duplicate {
            constraint: constraint.into(),
        }
    }
}

/// A new row for the `email_subscribers` table (main capture forms).
#[derive(Debug, Clone, Serialize)]
pub struct NewSubscriber {
    pub email: String,
    pub full_name: Option<String>,
    pub role: Option<String>,
    pub interests: Vec<String>,
    pub source: String,
    pub form_location: String,
    pub subscribed_at: DateTime<Utc>,
}

/// A subscriber row as read back for broadcasts.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct BroadcastRecipient {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[async_trait]
pub trait SubscriberStore: Send + Sync {
    async fn insert(&self, subscriber: NewSubscriber) -> Result<(), StoreError>;
    async fn list_recipients(&self) -> Result<Vec<BroadcastRecipient>, StoreError>;
}

/// A new row for the `simple_subscribers` table (footer form).
#[derive(Debug, Clone, Serialize)]
pub struct NewFooterSubscriber {
    pub email: String,
    pub ip_hash: String,
    pub turnstile_score: Option<f64>,
    pub welcome_sent: bool,
}

#[async_trait]
pub trait FooterSubscriberStore: Send + Sync {
    /// Submissions from this hashed IP since the given instant.
    async fn recent_submissions(
        &self,
        ip_hash: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError>;

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, StoreError>;

    async fn insert(&self, subscriber: NewFooterSubscriber) -> Result<(), StoreError>;

    async fn mark_welcome_sent(&self, email: &EmailAddress) -> Result<(), StoreError>;
}

/// A new row for the `press_inquiries` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewPressInquiry {
    pub name: String,
    pub email: String,
    pub outlet: String,
    pub inquiry_type: String,
    pub message: String,
    pub source: String,
    pub submitted_at: DateTime<Utc>,
    pub status: String,
}

#[async_trait]
pub trait InquiryStore: Send + Sync {
    async fn insert(&self, inquiry: NewPressInquiry) -> Result<(), StoreError>;
}

/// A new row for the `bidder_verifications` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewVerification {
    pub full_name: String,
    pub birth_date: String,
    pub nationality: String,
    pub email: String,
    pub phone: String,
    pub submitted_at: DateTime<Utc>,
    pub source: String,
    pub status: String,
    pub call_booked: bool,
    pub verified: bool,
}

#[async_trait]
pub trait VerificationStore: Send + Sync {
    async fn insert(&self, verification: NewVerification) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ChipStore: Send + Sync {
    /// Look up a registered chip by UID. `None` means not registered.
    async fn find(&self, uid: &ChipUid) -> Result<Option<ChipRecord>, StoreError>;
}
