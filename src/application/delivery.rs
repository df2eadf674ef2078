//! Outbound gateways: transactional mail, captcha verification, and the
//! GitHub token exchange behind the CMS login.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail delivery is not configured")]
    NotConfigured,
    #[error("mail provider rejected the request: {0}")]
    Rejected(String),
    #[error("mail request failed: {0}")]
    Transport(String),
}

/// One rendered message ready for the provider.
#[derive(Debug, Clone)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError>;
}

#[derive(Debug, Error)]
pub enum CaptchaError {
    #[error("captcha request failed: {0}")]
    Transport(String),
}

/// Outcome of a Turnstile siteverify call.
#[derive(Debug, Clone)]
pub struct CaptchaOutcome {
    pub success: bool,
    pub score: Option<f64>,
}

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<CaptchaOutcome, CaptchaError>;
}

#[derive(Debug, Error)]
pub enum OAuthError {
    #[error("oauth is not configured on the server")]
    NotConfigured,
    #[error("provider returned `{error}`: {description}")]
    Provider { error: String, description: String },
    #[error("token exchange failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait TokenExchanger: Send + Sync {
    /// Exchange an authorization code for an access token.
    async fn exchange(&self, code: &str) -> Result<String, OAuthError>;
}
