//! GitHub access-token exchange for the CMS OAuth flow.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::application::delivery::{OAuthError, TokenExchanger};

const ACCESS_TOKEN_ENDPOINT: &str = "https://github.com/login/oauth/access_token";

pub struct GitHubExchanger {
    client: Client,
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl GitHubExchanger {
    pub fn new(client: Client, client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            client,
            client_id: client_id.filter(|v| !v.is_empty()),
            client_secret: client_secret.filter(|v| !v.is_empty()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[async_trait]
impl TokenExchanger for GitHubExchanger {
    async fn exchange(&self, code: &str) -> Result<String, OAuthError> {
        let (client_id, client_secret) = match (&self.client_id, &self.client_secret) {
            (Some(id), Some(secret)) => (id, secret),
            _ => return Err(OAuthError::NotConfigured),
        };

        let response = self
            .client
            .post(ACCESS_TOKEN_ENDPOINT)
            .header("Accept", "application/json")
            .json(&json!({
                "client_id": client_id,
                "client_secret": client_secret,
                "code": code,
            }))
            .send()
            .await
            .map_err(|err| OAuthError::Transport(err.to_string()))?;

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|err| OAuthError::Transport(err.to_string()))?;

        if let Some(error) = body.error {
            return Err(OAuthError::Provider {
                description: body
                    .error_description
                    .unwrap_or_else(|| "Authorization failed".to_string()),
                error,
            });
        }

        body.access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| OAuthError::Transport("provider returned no access token".to_string()))
    }
}
