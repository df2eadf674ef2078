//! Supabase PostgREST adapter implementing the persistence ports.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::application::stores::{
    BroadcastRecipient, ChipStore, FooterSubscriberStore, InquiryStore, NewFooterSubscriber,
    NewPressInquiry, NewSubscriber, NewVerification, StoreError, SubscriberStore,
    VerificationStore,
};
use crate::config::SupabaseSettings;
use crate::domain::chips::{ChipRecord, ChipUid};
use crate::domain::email::EmailAddress;

const SUBSCRIBERS_TABLE: &str = "email_subscribers";
const FOOTER_TABLE: &str = "simple_subscribers";
const INQUIRIES_TABLE: &str = "press_inquiries";
const VERIFICATIONS_TABLE: &str = "bidder_verifications";
const CHIPS_TABLE: &str = "nfc_chips";

#[derive(Clone)]
struct Credentials {
    base_url: String,
    service_role_key: String,
}

/// REST client over the project's PostgREST endpoint. Collapses to
/// `StoreError::NotConfigured` when the deployment has no credentials.
#[derive(Clone)]
pub struct SupabaseRest {
    client: Client,
    credentials: Option<Credentials>,
}

impl SupabaseRest {
    pub fn from_settings(client: Client, settings: &SupabaseSettings) -> Self {
        let credentials = match (settings.url.as_ref(), settings.service_role_key.as_ref()) {
            (Some(url), Some(key)) => Some(Credentials {
                base_url: url.trim_end_matches('/').to_string(),
                service_role_key: key.clone(),
            }),
            _ => None,
        };
        Self {
            client,
            credentials,
        }
    }

    fn credentials(&self) -> Result<&Credentials, StoreError> {
        self.credentials.as_ref().ok_or(StoreError::NotConfigured)
    }

    fn request(
        &self,
        method: reqwest::Method,
        table: &str,
    ) -> Result<RequestBuilder, StoreError> {
        let creds = self.credentials()?;
        let url = format!("{}/rest/v1/{table}", creds.base_url);
        Ok(self
            .client
            .request(method, url)
            .header("apikey", &creds.service_role_key)
            .bearer_auth(&creds.service_role_key))
    }

    async fn insert_row<T: serde::Serialize>(
        &self,
        table: &'static str,
        row: &T,
    ) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::POST, table)?
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|err| StoreError::unavailable(err.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if is_duplicate(status, &body) {
            return Err(StoreError::duplicate(table));
        }
        Err(StoreError::unavailable(format!(
            "{table} insert failed with {status}: {body}"
        )))
    }

    async fn select_rows<T: for<'de> Deserialize<'de>>(
        &self,
        table: &'static str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .request(reqwest::Method::GET, table)?
            .query(query)
            .send()
            .await
            .map_err(|err| StoreError::unavailable(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::unavailable(format!(
                "{table} select failed with {status}: {body}"
            )));
        }

        response
            .json()
            .await
            .map_err(|err| StoreError::unavailable(err.to_string()))
    }
}

/// PostgREST surfaces unique violations as a 409 carrying the Postgres
/// `23505` code; older proxies spell it out in the message instead.
fn is_duplicate(status: StatusCode, body: &str) -> bool {
    status == StatusCode::CONFLICT || body.contains("23505") || body.contains("duplicate")
}

#[async_trait]
impl SubscriberStore for SupabaseRest {
    async fn insert(&self, subscriber: NewSubscriber) -> Result<(), StoreError> {
        self.insert_row(SUBSCRIBERS_TABLE, &subscriber).await
    }

    async fn list_recipients(&self) -> Result<Vec<BroadcastRecipient>, StoreError> {
        self.select_rows(
            SUBSCRIBERS_TABLE,
            &[("select", "email,name".to_string())],
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct IdRow {
    #[serde(default)]
    #[allow(dead_code)]
    id: Option<i64>,
}

#[async_trait]
impl FooterSubscriberStore for SupabaseRest {
    async fn recent_submissions(
        &self,
        ip_hash: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let rows: Vec<IdRow> = self
            .select_rows(
                FOOTER_TABLE,
                &[
                    ("ip_hash", format!("eq.{ip_hash}")),
                    (
                        "subscribed_at",
                        format!("gte.{}", since.to_rfc3339_opts(SecondsFormat::Millis, true)),
                    ),
                    ("select", "id".to_string()),
                ],
            )
            .await?;
        Ok(rows.len() as u64)
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, StoreError> {
        let rows: Vec<IdRow> = self
            .select_rows(
                FOOTER_TABLE,
                &[
                    ("email", format!("eq.{}", email.as_str())),
                    ("select", "id".to_string()),
                ],
            )
            .await?;
        Ok(!rows.is_empty())
    }

    async fn insert(&self, subscriber: NewFooterSubscriber) -> Result<(), StoreError> {
        self.insert_row(FOOTER_TABLE, &subscriber).await
    }

    async fn mark_welcome_sent(&self, email: &EmailAddress) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::PATCH, FOOTER_TABLE)?
            .query(&[("email", format!("eq.{}", email.as_str()))])
            .header("Prefer", "return=minimal")
            .json(&json!({
                "welcome_sent": true,
                "welcome_sent_at": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            }))
            .send()
            .await
            .map_err(|err| StoreError::unavailable(err.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            Err(StoreError::unavailable(format!(
                "{FOOTER_TABLE} update failed with {status}"
            )))
        }
    }
}

#[async_trait]
impl InquiryStore for SupabaseRest {
    async fn insert(&self, inquiry: NewPressInquiry) -> Result<(), StoreError> {
        self.insert_row(INQUIRIES_TABLE, &inquiry).await
    }
}

#[async_trait]
impl VerificationStore for SupabaseRest {
    async fn insert(&self, verification: NewVerification) -> Result<(), StoreError> {
        self.insert_row(VERIFICATIONS_TABLE, &verification).await
    }
}

#[derive(Debug, Deserialize)]
struct ChipRow {
    uid: String,
    #[serde(default)]
    artwork_title: Option<String>,
    #[serde(default)]
    edition_number: Option<i64>,
    #[serde(default)]
    registered_at: Option<String>,
    #[serde(default)]
    is_active: bool,
}

#[async_trait]
impl ChipStore for SupabaseRest {
    async fn find(&self, uid: &ChipUid) -> Result<Option<ChipRecord>, StoreError> {
        let rows: Vec<ChipRow> = self
            .select_rows(
                CHIPS_TABLE,
                &[
                    ("uid", format!("eq.{}", uid.as_str())),
                    ("select", "*".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next().map(|row| ChipRecord {
            uid: row.uid,
            artwork_title: row.artwork_title,
            edition_number: row.edition_number,
            registered_at: row.registered_at,
            is_active: row.is_active,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_detection_covers_conflict_status_and_postgres_code() {
        assert!(is_duplicate(StatusCode::CONFLICT, ""));
        assert!(is_duplicate(
            StatusCode::BAD_REQUEST,
            r#"{"code":"23505","message":"unique violation"}"#
        ));
        assert!(is_duplicate(
            StatusCode::BAD_REQUEST,
            "duplicate key value violates unique constraint"
        ));
        assert!(!is_duplicate(StatusCode::BAD_REQUEST, "malformed payload"));
    }

    #[test]
    fn missing_credentials_collapse_to_not_configured() {
        let rest = SupabaseRest::from_settings(
            Client::new(),
            &SupabaseSettings {
                url: None,
                service_role_key: None,
            },
        );
        assert!(matches!(
            rest.credentials(),
            Err(StoreError::NotConfigured)
        ));
    }
}
