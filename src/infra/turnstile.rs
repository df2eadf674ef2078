//! Cloudflare Turnstile siteverify adapter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::application::delivery::{CaptchaError, CaptchaOutcome, CaptchaVerifier};

const SITEVERIFY_ENDPOINT: &str = "https://challenges.cloudflare.com/turnstile/v0/siteverify";

pub struct TurnstileVerifier {
    client: Client,
    secret_key: Option<String>,
}

impl TurnstileVerifier {
    pub fn new(client: Client, secret_key: Option<String>) -> Self {
        Self {
            client,
            secret_key: secret_key.filter(|key| !key.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default)]
    score: Option<f64>,
}

#[async_trait]
impl CaptchaVerifier for TurnstileVerifier {
    async fn verify(&self, token: &str) -> Result<CaptchaOutcome, CaptchaError> {
        // Without a secret no token can be checked; treat every submission
        // as unverified rather than waving it through.
        let Some(secret) = self.secret_key.as_ref() else {
            return Ok(CaptchaOutcome {
                success: false,
                score: None,
            });
        };

        let response = self
            .client
            .post(SITEVERIFY_ENDPOINT)
            .json(&json!({
                "secret": secret,
                "response": token,
            }))
            .send()
            .await
            .map_err(|err| CaptchaError::Transport(err.to_string()))?;

        let body: SiteverifyResponse = response
            .json()
            .await
            .map_err(|err| CaptchaError::Transport(err.to_string()))?;

        Ok(CaptchaOutcome {
            success: body.success,
            score: body.score,
        })
    }
}
