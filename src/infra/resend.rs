//! Resend adapter for transactional mail.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::application::delivery::{MailError, Mailer, OutboundEmail};

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

pub struct ResendMailer {
    client: Client,
    api_key: Option<String>,
}

impl ResendMailer {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.is_empty()),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        let api_key = self.api_key.as_ref().ok_or(MailError::NotConfigured)?;

        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(api_key)
            .json(&json!({
                "from": email.from,
                "to": [email.to],
                "subject": email.subject,
                "html": email.html,
            }))
            .send()
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected(format!("{status}: {body}")))
    }
}
