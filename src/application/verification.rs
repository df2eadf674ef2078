//! Bidder verification intake: one row per prospective bidder, queued for a
//! verification call.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::application::stores::{NewVerification, StoreError, VerificationStore};
use crate::domain::email::EmailAddress;

#[derive(Debug, Clone, Default)]
pub struct VerificationRequest {
    pub full_name: String,
    pub birth_date: String,
    pub nationality: String,
    pub email: String,
    pub phone: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("full name, birth date, nationality, email and phone are required")]
    MissingFields,
    #[error("a valid email address is required")]
    InvalidEmail,
    #[error("this email has already submitted a verification request")]
    Duplicate,
    #[error("verification store rejected the insert")]
    Store(#[source] StoreError),
}

pub struct VerificationService {
    store: Arc<dyn VerificationStore>,
}

impl VerificationService {
    pub fn new(store: Arc<dyn VerificationStore>) -> Self {
        Self { store }
    }

    pub async fn submit(
        &self,
        request: VerificationRequest,
        now: DateTime<Utc>,
    ) -> Result<(), VerificationError> {
        if request.full_name.is_empty()
            || request.birth_date.is_empty()
            || request.nationality.is_empty()
            || request.email.is_empty()
            || request.phone.is_empty()
        {
            return Err(VerificationError::MissingFields);
        }
        let email =
            EmailAddress::parse(&request.email).map_err(|_| VerificationError::InvalidEmail)?;

        let row = NewVerification {
            full_name: request.full_name,
            birth_date: request.birth_date,
            nationality: request.nationality,
            email: email.as_str().to_string(),
            phone: request.phone,
            submitted_at: request.submitted_at.unwrap_or(now),
            source: request
                .source
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "bidder-verification".to_string()),
            status: request
                .status
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "pending_call".to_string()),
            call_booked: false,
            verified: false,
        };

        match self.store.insert(row).await {
            Ok(()) => Ok(()),
            Err(StoreError::Duplicate { .. }) => Err(VerificationError::Duplicate),
            Err(err) => Err(VerificationError::Store(err)),
        }
    }
}
