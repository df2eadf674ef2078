//! Press inquiry workflow: store the inquiry, notify the press team, and
//! auto-reply to the journalist.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;

use crate::application::delivery::{Mailer, OutboundEmail};
use crate::application::render::escape_html;
use crate::application::stores::{InquiryStore, NewPressInquiry};
use crate::domain::email::EmailAddress;
use crate::presentation::views::{
    PressAutoReplyEmailView, PressNotificationEmailView, render_template,
};

#[derive(Debug, Clone, Default)]
pub struct PressInquiryRequest {
    pub name: String,
    pub email: String,
    pub outlet: String,
    pub inquiry_type: Option<String>,
    pub message: String,
    pub source: Option<String>,
}

#[derive(Debug, Error)]
pub enum PressInquiryError {
    #[error("name, email, outlet and message are required")]
    MissingFields,
    #[error("a valid email address is required")]
    InvalidEmail,
}

pub struct PressInquiryService {
    store: Arc<dyn InquiryStore>,
    mailer: Arc<dyn Mailer>,
    from: String,
    team_address: String,
}

impl PressInquiryService {
    pub fn new(
        store: Arc<dyn InquiryStore>,
        mailer: Arc<dyn Mailer>,
        from: String,
        team_address: String,
    ) -> Self {
        Self {
            store,
            mailer,
            from,
            team_address,
        }
    }

    /// Storage and delivery failures are tolerated here: as long as the
    /// request itself is valid the submitter sees success, and the team
    /// still gets the inquiry through whichever channel survived.
    pub async fn submit(
        &self,
        request: PressInquiryRequest,
        now: DateTime<Utc>,
    ) -> Result<(), PressInquiryError> {
        if request.name.is_empty()
            || request.email.is_empty()
            || request.outlet.is_empty()
            || request.message.is_empty()
        {
            return Err(PressInquiryError::MissingFields);
        }
        let email =
            EmailAddress::parse(&request.email).map_err(|_| PressInquiryError::InvalidEmail)?;

        let inquiry_type = request
            .inquiry_type
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("other")
            .to_string();
        let source = request
            .source
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("press_page")
            .to_string();

        let row = NewPressInquiry {
            name: request.name.clone(),
            email: email.as_str().to_string(),
            outlet: request.outlet.clone(),
            inquiry_type: inquiry_type.clone(),
            message: request.message.clone(),
            source: source.clone(),
            submitted_at: now,
            status: "new".to_string(),
        };
        if let Err(err) = self.store.insert(row).await {
            tracing::error!(
                target: "zyborn::press",
                error = %err,
                "press inquiry not stored, continuing with email notification"
            );
        }

        let display_type = request
            .inquiry_type
            .as_deref()
            .filter(|v| !v.is_empty())
            .unwrap_or("General");

        if let Err(err) = self
            .notify_team(&request, &email, display_type, &source, now)
            .await
        {
            tracing::warn!(target: "zyborn::press", error = %err, "team notification not delivered");
        }
        if let Err(err) = self.auto_reply(&request, &email).await {
            tracing::warn!(target: "zyborn::press", error = %err, "auto-reply not delivered");
        }

        Ok(())
    }

    async fn notify_team(
        &self,
        request: &PressInquiryRequest,
        email: &EmailAddress,
        display_type: &str,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let view = PressNotificationEmailView {
            name: request.name.clone(),
            email: email.as_str().to_string(),
            outlet: request.outlet.clone(),
            inquiry_type: display_type.to_string(),
            message_html: escape_html(&request.message).replace('\n', "<br>"),
            submitted_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            source: source.to_string(),
        };
        let html = render_template("email/press_notification", &view)?;
        self.mailer
            .send(OutboundEmail {
                from: self.from.clone(),
                to: self.team_address.clone(),
                subject: format!("[Press Inquiry] {display_type} - {}", request.outlet),
                html,
            })
            .await?;
        Ok(())
    }

    async fn auto_reply(
        &self,
        request: &PressInquiryRequest,
        email: &EmailAddress,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let view = PressAutoReplyEmailView {
            name: request.name.clone(),
        };
        let html = render_template("email/press_auto_reply", &view)?;
        self.mailer
            .send(OutboundEmail {
                from: self.from.clone(),
                to: email.as_str().to_string(),
                subject: "Thank you for your press inquiry - ZYBORN ART".to_string(),
                html,
            })
            .await?;
        Ok(())
    }
}
