//! Subscription workflows for the two capture forms: the main landing-page
//! form and the hardened footer form with its bot checks.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::application::delivery::{Mailer, OutboundEmail};
use crate::application::stores::{
    FooterSubscriberStore, NewFooterSubscriber, NewSubscriber, StoreError, SubscriberStore,
};
use crate::domain::email::EmailAddress;
use crate::presentation::views::{FooterWelcomeEmailView, WelcomeEmailView, render_template};

/// How long a form must stay open before a footer submission is believable.
const MIN_FILL_TIME_MS: i64 = 2_000;
/// Footer submissions allowed per hashed IP per hour.
const RATE_LIMIT_PER_HOUR: u64 = 3;

#[derive(Debug, Clone, Default)]
pub struct SubscribeRequest {
    pub email: String,
    pub name: Option<String>,
    pub role: Option<String>,
    pub interests: Vec<String>,
    pub source: Option<String>,
    pub form_location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed,
    AlreadySubscribed,
}

#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("a valid email address is required")]
    InvalidEmail,
    #[error("subscriber store rejected the insert")]
    Store(#[source] StoreError),
}

pub struct SubscribeService {
    store: Arc<dyn SubscriberStore>,
    mailer: Arc<dyn Mailer>,
    from: String,
}

impl SubscribeService {
    pub fn new(store: Arc<dyn SubscriberStore>, mailer: Arc<dyn Mailer>, from: String) -> Self {
        Self {
            store,
            mailer,
            from,
        }
    }

    pub async fn subscribe(
        &self,
        request: SubscribeRequest,
        now: DateTime<Utc>,
    ) -> Result<SubscribeOutcome, SubscribeError> {
        let email = EmailAddress::parse(&request.email).map_err(|_| SubscribeError::InvalidEmail)?;

        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        let source = request.source.clone().unwrap_or_else(|| "landing_page".to_string());
        let form_location = request
            .form_location
            .clone()
            .or(request.source)
            .unwrap_or_else(|| "hero".to_string());

        let row = NewSubscriber {
            email: email.as_str().to_string(),
            full_name: name.clone(),
            role: request.role,
            interests: request.interests,
            source,
            form_location,
            subscribed_at: now,
        };

        match self.store.insert(row).await {
            Ok(()) => {}
            Err(StoreError::Duplicate { .. }) => return Ok(SubscribeOutcome::AlreadySubscribed),
            Err(err) => return Err(SubscribeError::Store(err)),
        }

        // Welcome email failures never fail the subscription.
        if let Err(err) = self.send_welcome(&email, name.as_deref()).await {
            tracing::warn!(
                target: "zyborn::subscribers",
                email = %email,
                error = %err,
                "welcome email not delivered"
            );
        }

        Ok(SubscribeOutcome::Subscribed)
    }

    async fn send_welcome(
        &self,
        email: &EmailAddress,
        name: Option<&str>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let greeting = match name {
            Some(name) => format!("Hello {name},"),
            None => "Hello,".to_string(),
        };
        let html = render_template("email/welcome", &WelcomeEmailView { greeting })?;
        self.mailer
            .send(OutboundEmail {
                from: self.from.clone(),
                to: email.as_str().to_string(),
                subject: "You're on the list — ZYBORN".to_string(),
                html,
            })
            .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FooterSubscribeRequest {
    pub email: Option<String>,
    /// Honeypot field; humans never see it, bots fill it.
    pub website: Option<String>,
    pub turnstile_token: Option<String>,
    /// Client-side form-open timestamp, milliseconds since the epoch.
    pub timestamp: Option<i64>,
    pub client_ip: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FooterOutcome {
    Subscribed,
    AlreadySubscribed,
    /// Bot signal tripped; caller reports a fake success.
    Discarded,
}

#[derive(Debug, Error)]
pub enum FooterError {
    #[error("turnstile token missing")]
    CaptchaRequired,
    #[error("turnstile verification failed")]
    CaptchaRejected,
    #[error("email is required")]
    MissingEmail,
    #[error("email address is invalid")]
    InvalidEmail,
    #[error("rate limit exceeded for this address")]
    RateLimited,
    #[error("footer subscription failed")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl FooterError {
    fn internal(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Internal(Box::new(err))
    }
}

/// Privacy-preserving rate-limit key: truncated SHA-256 of the client IP.
pub fn hash_ip(ip: &str) -> String {
    let digest = Sha256::digest(ip.as_bytes());
    hex::encode(digest)[..16].to_string()
}

pub struct FooterSubscribeService {
    store: Arc<dyn FooterSubscriberStore>,
    captcha: Arc<dyn crate::application::delivery::CaptchaVerifier>,
    mailer: Arc<dyn Mailer>,
    from: String,
}

impl FooterSubscribeService {
    pub fn new(
        store: Arc<dyn FooterSubscriberStore>,
        captcha: Arc<dyn crate::application::delivery::CaptchaVerifier>,
        mailer: Arc<dyn Mailer>,
        from: String,
    ) -> Self {
        Self {
            store,
            captcha,
            mailer,
            from,
        }
    }

    pub async fn subscribe(
        &self,
        request: FooterSubscribeRequest,
        now: DateTime<Utc>,
    ) -> Result<FooterOutcome, FooterError> {
        if request
            .website
            .as_deref()
            .is_some_and(|v| !v.trim().is_empty())
        {
            tracing::debug!(target: "zyborn::subscribers", "honeypot tripped");
            return Ok(FooterOutcome::Discarded);
        }

        if let Some(opened_at) = request.timestamp {
            let elapsed = now.timestamp_millis() - opened_at;
            if elapsed < MIN_FILL_TIME_MS {
                tracing::debug!(target: "zyborn::subscribers", elapsed, "form filled too fast");
                return Ok(FooterOutcome::Discarded);
            }
        }

        let token = request
            .turnstile_token
            .as_deref()
            .filter(|v| !v.is_empty())
            .ok_or(FooterError::CaptchaRequired)?;
        let captcha = self
            .captcha
            .verify(token)
            .await
            .map_err(FooterError::internal)?;
        if !captcha.success {
            return Err(FooterError::CaptchaRejected);
        }

        let raw_email = request.email.as_deref().ok_or(FooterError::MissingEmail)?;
        let email = EmailAddress::parse(raw_email).map_err(|_| FooterError::InvalidEmail)?;

        let ip_hash = hash_ip(&request.client_ip);
        let since = now - Duration::hours(1);
        let recent = self
            .store
            .recent_submissions(&ip_hash, since)
            .await
            .map_err(FooterError::internal)?;
        if recent >= RATE_LIMIT_PER_HOUR {
            return Err(FooterError::RateLimited);
        }

        if self
            .store
            .email_exists(&email)
            .await
            .map_err(FooterError::internal)?
        {
            return Ok(FooterOutcome::AlreadySubscribed);
        }

        self.store
            .insert(NewFooterSubscriber {
                email: email.as_str().to_string(),
                ip_hash,
                turnstile_score: captcha.score,
                welcome_sent: false,
            })
            .await
            .map_err(FooterError::internal)?;

        if let Err(err) = self.send_welcome(&email).await {
            tracing::warn!(
                target: "zyborn::subscribers",
                email = %email,
                error = %err,
                "footer welcome email not delivered"
            );
        }

        Ok(FooterOutcome::Subscribed)
    }

    async fn send_welcome(
        &self,
        email: &EmailAddress,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let html = render_template("email/footer_welcome", &FooterWelcomeEmailView)?;
        self.mailer
            .send(OutboundEmail {
                from: self.from.clone(),
                to: email.as_str().to_string(),
                subject: "Welcome to ZYBORN".to_string(),
                html,
            })
            .await?;
        if let Err(err) = self.store.mark_welcome_sent(email).await {
            tracing::warn!(
                target: "zyborn::subscribers",
                email = %email,
                error = %err,
                "welcome_sent flag not recorded"
            );
        }
        Ok(())
    }
}
