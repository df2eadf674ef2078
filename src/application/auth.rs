//! GitHub OAuth flow backing the CMS admin login popup.

use std::sync::Arc;

use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use crate::application::delivery::{OAuthError, TokenExchanger};

const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
const OAUTH_SCOPE: &str = "repo,user";

/// Query string GitHub redirects back with after the user authorizes (or
/// declines) the app.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Outcome of the callback leg, already shaped as the `postMessage` payload
/// the CMS popup protocol expects.
#[derive(Debug, Clone)]
pub enum CallbackOutcome {
    Success { payload: String },
    Failure { payload: String, description: String },
}

pub struct OAuthService {
    client_id: Option<String>,
    fallback_host: String,
    exchanger: Arc<dyn TokenExchanger>,
}

impl OAuthService {
    pub fn new(
        client_id: Option<String>,
        fallback_host: String,
        exchanger: Arc<dyn TokenExchanger>,
    ) -> Self {
        Self {
            client_id: client_id.filter(|id| !id.is_empty()),
            fallback_host,
            exchanger,
        }
    }

    /// GitHub authorize URL for the login redirect. The callback address is
    /// reconstructed from the proxy headers so the flow works behind the CDN
    /// as well as on the bare host.
    pub fn authorize_url(
        &self,
        forwarded_proto: Option<&str>,
        forwarded_host: Option<&str>,
        host: Option<&str>,
    ) -> Result<Url, OAuthError> {
        let client_id = self.client_id.as_deref().ok_or(OAuthError::NotConfigured)?;
        let proto = forwarded_proto.filter(|v| !v.is_empty()).unwrap_or("https");
        let host = forwarded_host
            .filter(|v| !v.is_empty())
            .or(host.filter(|v| !v.is_empty()))
            .unwrap_or(&self.fallback_host);
        let redirect_uri = format!("{proto}://{host}/api/auth/callback");

        let mut url = Url::parse(GITHUB_AUTHORIZE_URL).map_err(|_| OAuthError::NotConfigured)?;
        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", &redirect_uri)
            .append_pair("scope", OAUTH_SCOPE)
            .append_pair("state", &Uuid::new_v4().simple().to_string());
        Ok(url)
    }

    pub async fn complete_callback(&self, query: CallbackQuery) -> CallbackOutcome {
        if let Some(error) = query.error {
            let description = query
                .error_description
                .unwrap_or_else(|| "Authorization failed".to_string());
            return failure(&error, &description);
        }
        let Some(code) = query.code.filter(|c| !c.is_empty()) else {
            return failure("missing_code", "No authorization code received");
        };

        match self.exchanger.exchange(&code).await {
            Ok(token) => {
                let payload = serde_json::json!({
                    "token": token,
                    "provider": "github",
                })
                .to_string();
                CallbackOutcome::Success { payload }
            }
            Err(OAuthError::NotConfigured) => {
                failure("config_error", "OAuth not configured on server")
            }
            Err(OAuthError::Provider { error, description }) => failure(&error, &description),
            Err(OAuthError::Transport(_)) => {
                failure("server_error", "Authentication request failed")
            }
        }
    }
}

fn failure(error: &str, description: &str) -> CallbackOutcome {
    let payload = serde_json::json!({
        "error": error,
        "error_description": description,
    })
    .to_string();
    CallbackOutcome::Failure {
        payload,
        description: description.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FakeExchanger {
        result: Result<String, OAuthError>,
    }

    #[async_trait]
    impl TokenExchanger for FakeExchanger {
        async fn exchange(&self, _code: &str) -> Result<String, OAuthError> {
            match &self.result {
                Ok(token) => Ok(token.clone()),
                Err(OAuthError::NotConfigured) => Err(OAuthError::NotConfigured),
                Err(OAuthError::Provider { error, description }) => Err(OAuthError::Provider {
                    error: error.clone(),
                    description: description.clone(),
                }),
                Err(OAuthError::Transport(message)) => {
                    Err(OAuthError::Transport(message.clone()))
                }
            }
        }
    }

    fn service(result: Result<String, OAuthError>) -> OAuthService {
        OAuthService::new(
            Some("client-123".to_string()),
            "zyborn.com".to_string(),
            Arc::new(FakeExchanger { result }),
        )
    }

    #[test]
    fn authorize_url_prefers_forwarded_headers() {
        let svc = service(Ok("tok".to_string()));
        let url = svc
            .authorize_url(Some("http"), Some("preview.zyborn.com"), Some("internal"))
            .unwrap();
        assert_eq!(url.host_str(), Some("github.com"));
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(pairs.contains(&(
            "redirect_uri".to_string(),
            "http://preview.zyborn.com/api/auth/callback".to_string()
        )));
        assert!(pairs.contains(&("scope".to_string(), "repo,user".to_string())));
        assert!(pairs.iter().any(|(k, v)| k == "state" && !v.is_empty()));
    }

    #[test]
    fn authorize_url_falls_back_to_canonical_host() {
        let svc = service(Ok("tok".to_string()));
        let url = svc.authorize_url(None, None, None).unwrap();
        let redirect = url
            .query_pairs()
            .find(|(k, _)| k == "redirect_uri")
            .map(|(_, v)| v.to_string())
            .unwrap();
        assert_eq!(redirect, "https://zyborn.com/api/auth/callback");
    }

    #[test]
    fn missing_client_id_is_a_configuration_error() {
        let svc = OAuthService::new(
            None,
            "zyborn.com".to_string(),
            Arc::new(FakeExchanger {
                result: Ok("tok".to_string()),
            }),
        );
        assert!(matches!(
            svc.authorize_url(None, None, None),
            Err(OAuthError::NotConfigured)
        ));
    }

    #[tokio::test]
    async fn callback_exchanges_code_for_token_payload() {
        let svc = service(Ok("gho_abc".to_string()));
        let outcome = svc
            .complete_callback(CallbackQuery {
                code: Some("authcode".to_string()),
                ..CallbackQuery::default()
            })
            .await;
        let CallbackOutcome::Success { payload } = outcome else {
            panic!("expected success");
        };
        assert_eq!(payload, r#"{"provider":"github","token":"gho_abc"}"#);
    }

    #[tokio::test]
    async fn provider_denial_and_missing_code_become_error_payloads() {
        let svc = service(Ok("tok".to_string()));
        let outcome = svc
            .complete_callback(CallbackQuery {
                error: Some("access_denied".to_string()),
                error_description: None,
                code: None,
            })
            .await;
        let CallbackOutcome::Failure { payload, description } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(description, "Authorization failed");
        assert!(payload.contains("access_denied"));

        let outcome = svc.complete_callback(CallbackQuery::default()).await;
        let CallbackOutcome::Failure { description, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(description, "No authorization code received");
    }

    #[tokio::test]
    async fn transport_failure_reads_as_server_error() {
        let svc = service(Err(OAuthError::Transport("connect refused".to_string())));
        let outcome = svc
            .complete_callback(CallbackQuery {
                code: Some("authcode".to_string()),
                ..CallbackQuery::default()
            })
            .await;
        let CallbackOutcome::Failure { description, .. } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(description, "Authentication request failed");
    }
}
