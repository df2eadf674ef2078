//! NFC chip authentication lookups for the `/t/<uid>` certificate pages.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use thiserror::Error;

use crate::application::stores::{ChipStore, StoreError};
use crate::domain::chips::{ChipRecord, ChipUid};

#[derive(Debug, Clone)]
pub enum ChipLookup {
    /// Registered and active: show the certificate.
    Authenticated(ChipRecord),
    /// No registration record for this UID.
    Unregistered(ChipUid),
    /// Registered but deactivated by the studio.
    Deactivated,
}

#[derive(Debug, Error)]
pub enum ChipLookupError {
    #[error("chip identifier is not a valid 14-character hex UID")]
    InvalidUid,
    #[error("chip registry unavailable")]
    Store(#[source] StoreError),
}

pub struct ChipVerificationService {
    store: Arc<dyn ChipStore>,
}

impl ChipVerificationService {
    pub fn new(store: Arc<dyn ChipStore>) -> Self {
        Self { store }
    }

    pub async fn verify(&self, raw_uid: &str) -> Result<ChipLookup, ChipLookupError> {
        let uid = ChipUid::parse(raw_uid).map_err(|_| ChipLookupError::InvalidUid)?;
        match self.store.find(&uid).await.map_err(ChipLookupError::Store)? {
            None => Ok(ChipLookup::Unregistered(uid)),
            Some(record) if !record.is_active => Ok(ChipLookup::Deactivated),
            Some(record) => Ok(ChipLookup::Authenticated(record)),
        }
    }
}

/// Registration date as shown on the certificate: `24 Dec 2025` style, with
/// `N/A` when the record has no parseable timestamp.
pub fn format_registered_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.filter(|v| !v.is_empty()) else {
        return "N/A".to_string();
    };
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(date) => format!("{}", date.format("%-d %b %Y")),
        Err(_) => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeChips {
        record: Option<ChipRecord>,
    }

    #[async_trait]
    impl ChipStore for FakeChips {
        async fn find(&self, _uid: &ChipUid) -> Result<Option<ChipRecord>, StoreError> {
            Ok(self.record.clone())
        }
    }

    fn record(active: bool) -> ChipRecord {
        ChipRecord {
            uid: "04A1B2C3D4E5F6".to_string(),
            artwork_title: Some("Survival Rations".to_string()),
            edition_number: Some(7),
            registered_at: Some("2025-12-24T18:00:00Z".to_string()),
            is_active: active,
        }
    }

    #[tokio::test]
    async fn malformed_uid_is_rejected_before_lookup() {
        let svc = ChipVerificationService::new(Arc::new(FakeChips { record: None }));
        assert!(matches!(
            svc.verify("not-a-uid").await,
            Err(ChipLookupError::InvalidUid)
        ));
        assert!(matches!(
            svc.verify("04A1B2C3D4E5").await,
            Err(ChipLookupError::InvalidUid)
        ));
    }

    #[tokio::test]
    async fn lookup_covers_all_three_outcomes() {
        let svc = ChipVerificationService::new(Arc::new(FakeChips {
            record: Some(record(true)),
        }));
        assert!(matches!(
            svc.verify("04a1b2c3d4e5f6").await.unwrap(),
            ChipLookup::Authenticated(_)
        ));

        let svc = ChipVerificationService::new(Arc::new(FakeChips {
            record: Some(record(false)),
        }));
        assert!(matches!(
            svc.verify("04A1B2C3D4E5F6").await.unwrap(),
            ChipLookup::Deactivated
        ));

        let svc = ChipVerificationService::new(Arc::new(FakeChips { record: None }));
        let ChipLookup::Unregistered(uid) = svc.verify("04a1b2c3d4e5f6").await.unwrap() else {
            panic!("expected unregistered");
        };
        assert_eq!(uid.as_str(), "04A1B2C3D4E5F6");
    }

    #[test]
    fn registered_date_formats_like_the_certificate() {
        assert_eq!(
            format_registered_date(Some("2025-12-24T18:00:00Z")),
            "24 Dec 2025"
        );
        assert_eq!(format_registered_date(Some("2026-01-03")), "3 Jan 2026");
        assert_eq!(format_registered_date(None), "N/A");
        assert_eq!(format_registered_date(Some("soon")), "N/A");
    }
}
