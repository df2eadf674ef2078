//! Askama views for the rendered HTML surfaces: chip certificate pages,
//! OAuth popup pages, and outbound email bodies.

use askama::{Error as AskamaError, Template};
use thiserror::Error;

use crate::application::error::AppError;

#[derive(Debug, Error)]
#[error("template `{template}` failed to render")]
pub struct TemplateRenderError {
    pub(crate) template: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl From<TemplateRenderError> for AppError {
    fn from(err: TemplateRenderError) -> Self {
        AppError::unexpected(err.to_string())
    }
}

pub fn render_template<T: Template>(name: &'static str, template: &T) -> Result<String, AppError> {
    template.render().map_err(|error| {
        TemplateRenderError {
            template: name,
            error,
        }
        .into()
    })
}

/// Certificate page for an active registered chip.
#[derive(Template)]
#[template(path = "chip/authenticated.html")]
pub struct ChipAuthenticatedView {
    pub artwork_title: String,
    pub edition: String,
    pub registered: String,
    pub uid: String,
}

/// 404 page for a chip with no registration record.
#[derive(Template)]
#[template(path = "chip/unregistered.html")]
pub struct ChipUnregisteredView {
    pub uid: String,
}

/// Generic branded error page for the verification endpoint.
#[derive(Template)]
#[template(path = "chip/error.html")]
pub struct ChipErrorView {
    pub message: String,
}

impl ChipErrorView {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// OAuth popup page posting the token back to the opener window.
#[derive(Template)]
#[template(path = "oauth/success.html")]
pub struct OAuthSuccessView {
    /// JSON payload `{"token": ..., "provider": "github"}`, pre-serialized.
    pub payload: String,
}

/// OAuth popup page posting the failure back to the opener window.
#[derive(Template)]
#[template(path = "oauth/error.html")]
pub struct OAuthErrorView {
    /// JSON payload `{"error": ..., "error_description": ...}`, pre-serialized.
    pub payload: String,
    pub description: String,
}

#[derive(Template)]
#[template(path = "email/welcome.html")]
pub struct WelcomeEmailView {
    pub greeting: String,
}

#[derive(Template)]
#[template(path = "email/footer_welcome.html")]
pub struct FooterWelcomeEmailView;

#[derive(Template)]
#[template(path = "email/broadcast.html")]
pub struct BroadcastEmailView {
    pub greeting: String,
}

#[derive(Template)]
#[template(path = "email/press_notification.html")]
pub struct PressNotificationEmailView {
    pub name: String,
    pub email: String,
    pub outlet: String,
    pub inquiry_type: String,
    /// Escaped message with newlines already turned into `<br>`.
    pub message_html: String,
    pub submitted_at: String,
    pub source: String,
}

#[derive(Template)]
#[template(path = "email/press_auto_reply.html")]
pub struct PressAutoReplyEmailView {
    pub name: String,
}
