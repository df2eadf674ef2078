use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::application::{
    auth::{CallbackQuery, OAuthService},
    broadcast::{BroadcastError, BroadcastService},
    chips::{ChipLookup, ChipLookupError, ChipVerificationService, format_registered_date},
    delivery::OAuthError,
    error::ErrorReport,
    press::{PressInquiryError, PressInquiryRequest, PressInquiryService},
    preview::render_page,
    subscribers::{
        FooterError, FooterOutcome, FooterSubscribeRequest, FooterSubscribeService,
        SubscribeError, SubscribeOutcome, SubscribeRequest, SubscribeService,
    },
    verification::{VerificationError, VerificationRequest, VerificationService},
};
use crate::application::stores::StoreError;
use crate::domain::pages::{PageDocument, PageKind};
use crate::presentation::views::{
    ChipAuthenticatedView, ChipErrorView, ChipUnregisteredView, OAuthErrorView, OAuthSuccessView,
    render_template,
};

#[derive(Clone)]
pub struct ApiState {
    pub subscribe: Arc<SubscribeService>,
    pub footer: Arc<FooterSubscribeService>,
    pub press: Arc<PressInquiryService>,
    pub verification: Arc<VerificationService>,
    pub broadcast: Arc<BroadcastService>,
    pub chips: Arc<ChipVerificationService>,
    pub oauth: Arc<OAuthService>,
}

// ---------------------------------------------------------------------------
// Shared response plumbing

fn json_response(status: StatusCode, body: Value) -> Response {
    (status, axum::Json(body)).into_response()
}

fn json_error(source: &'static str, status: StatusCode, body: Value, detail: &str) -> Response {
    let mut response = json_response(status, body);
    ErrorReport::from_message(source, status, detail).attach(&mut response);
    response
}

fn html_response(status: StatusCode, html: String) -> Response {
    let mut response = (status, html).into_response();
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    response
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    json_response(
        StatusCode::METHOD_NOT_ALLOWED,
        json!({"error": "Method not allowed"}),
    )
}

/// First address in `x-forwarded-for`, then `x-real-ip`, then a sentinel.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
        })
        .unwrap_or("unknown")
        .to_string()
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

// ---------------------------------------------------------------------------
// Subscription forms

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SubscribeBody {
    email: Option<String>,
    name: Option<String>,
    role: Option<String>,
    interests: Vec<String>,
    source: Option<String>,
    #[serde(rename = "formLocation")]
    form_location: Option<String>,
}

pub async fn subscribe(
    State(state): State<ApiState>,
    axum::Json(body): axum::Json<SubscribeBody>,
) -> Response {
    const SOURCE: &str = "infra::http::api::subscribe";

    let request = SubscribeRequest {
        email: body.email.unwrap_or_default(),
        name: body.name,
        role: body.role,
        interests: body.interests,
        source: body.source,
        form_location: body.form_location,
    };

    match state.subscribe.subscribe(request, Utc::now()).await {
        Ok(SubscribeOutcome::Subscribed) => json_response(
            StatusCode::OK,
            json!({"success": true, "message": "Successfully subscribed!"}),
        ),
        Ok(SubscribeOutcome::AlreadySubscribed) => json_response(
            StatusCode::OK,
            json!({"success": true, "message": "You are already subscribed!"}),
        ),
        Err(SubscribeError::InvalidEmail) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Valid email is required"}),
            "email failed validation",
        ),
        Err(SubscribeError::Store(StoreError::NotConfigured)) => json_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Server configuration error"}),
            "subscriber store credentials missing",
        ),
        Err(SubscribeError::Store(err)) => json_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Something went wrong. Please try again."}),
            &err.to_string(),
        ),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FooterSubscribeBody {
    email: Option<String>,
    website: Option<String>,
    #[serde(rename = "turnstileToken")]
    turnstile_token: Option<String>,
    timestamp: Option<i64>,
}

pub async fn subscribe_footer(
    State(state): State<ApiState>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<FooterSubscribeBody>,
) -> Response {
    const SOURCE: &str = "infra::http::api::subscribe_footer";

    let request = FooterSubscribeRequest {
        email: body.email,
        website: body.website,
        turnstile_token: body.turnstile_token,
        timestamp: body.timestamp,
        client_ip: client_ip(&headers),
    };

    match state.footer.subscribe(request, Utc::now()).await {
        // A tripped bot signal gets the same response as a real signup.
        Ok(FooterOutcome::Subscribed) | Ok(FooterOutcome::Discarded) => json_response(
            StatusCode::OK,
            json!({"success": true, "message": "Thank you for subscribing!"}),
        ),
        Ok(FooterOutcome::AlreadySubscribed) => json_response(
            StatusCode::OK,
            json!({"success": true, "message": "You're already subscribed!"}),
        ),
        Err(FooterError::CaptchaRequired) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Verification required"}),
            "turnstile token missing",
        ),
        Err(FooterError::CaptchaRejected) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Verification failed. Please try again."}),
            "turnstile rejected the token",
        ),
        Err(FooterError::MissingEmail) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Email is required"}),
            "email missing from body",
        ),
        Err(FooterError::InvalidEmail) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Invalid email address"}),
            "email failed validation",
        ),
        Err(FooterError::RateLimited) => json_error(
            SOURCE,
            StatusCode::TOO_MANY_REQUESTS,
            json!({"error": "Too many requests. Please try again later."}),
            "per-ip submission ceiling reached",
        ),
        Err(FooterError::Internal(err)) => json_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Something went wrong. Please try again."}),
            &err.to_string(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Press inquiries

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PressInquiryBody {
    name: Option<String>,
    email: Option<String>,
    outlet: Option<String>,
    #[serde(alias = "inquiryType")]
    inquiry_type: Option<String>,
    message: Option<String>,
    source: Option<String>,
}

pub async fn press_inquiry(
    State(state): State<ApiState>,
    axum::Json(body): axum::Json<PressInquiryBody>,
) -> Response {
    const SOURCE: &str = "infra::http::api::press_inquiry";

    let request = PressInquiryRequest {
        name: body.name.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        outlet: body.outlet.unwrap_or_default(),
        inquiry_type: body.inquiry_type,
        message: body.message.unwrap_or_default(),
        source: body.source,
    };

    match state.press.submit(request, Utc::now()).await {
        Ok(()) => json_response(
            StatusCode::OK,
            json!({"message": "Inquiry submitted successfully!", "status": "success"}),
        ),
        Err(PressInquiryError::MissingFields) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "All fields are required"}),
            "one or more required fields missing",
        ),
        Err(PressInquiryError::InvalidEmail) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Valid email is required"}),
            "email failed validation",
        ),
    }
}

// ---------------------------------------------------------------------------
// Bidder verification

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VerificationBody {
    #[serde(rename = "fullName")]
    full_name: Option<String>,
    #[serde(rename = "birthDate")]
    birth_date: Option<String>,
    nationality: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    #[serde(rename = "submittedAt")]
    submitted_at: Option<DateTime<Utc>>,
    source: Option<String>,
    status: Option<String>,
}

pub async fn verification(
    State(state): State<ApiState>,
    axum::Json(body): axum::Json<VerificationBody>,
) -> Response {
    const SOURCE: &str = "infra::http::api::verification";

    let request = VerificationRequest {
        full_name: body.full_name.unwrap_or_default(),
        birth_date: body.birth_date.unwrap_or_default(),
        nationality: body.nationality.unwrap_or_default(),
        email: body.email.unwrap_or_default(),
        phone: body.phone.unwrap_or_default(),
        submitted_at: body.submitted_at,
        source: body.source,
        status: body.status,
    };

    match state.verification.submit(request, Utc::now()).await {
        Ok(()) => json_response(
            StatusCode::OK,
            json!({"success": true, "message": "Verification request submitted"}),
        ),
        Err(VerificationError::MissingFields) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Missing required fields"}),
            "one or more required fields missing",
        ),
        Err(VerificationError::InvalidEmail) => json_error(
            SOURCE,
            StatusCode::BAD_REQUEST,
            json!({"error": "Invalid email format"}),
            "email failed validation",
        ),
        Err(VerificationError::Duplicate) => json_error(
            SOURCE,
            StatusCode::CONFLICT,
            json!({
                "error": "This email has already submitted a verification request.",
                "code": "DUPLICATE_EMAIL",
            }),
            "duplicate verification email",
        ),
        Err(VerificationError::Store(err)) => json_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Database error"}),
            &err.to_string(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Broadcast

pub async fn broadcast(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    const SOURCE: &str = "infra::http::api::broadcast";

    let presented = header_str(&headers, "x-broadcast-key").unwrap_or_default();

    match state.broadcast.send_launch_announcement(presented).await {
        Ok(report) if report.summary.total == 0 => json_response(
            StatusCode::OK,
            json!({"success": true, "message": "No subscribers found", "sent": 0}),
        ),
        Ok(report) => json_response(
            StatusCode::OK,
            json!({
                "success": true,
                "summary": report.summary,
                "details": report.details,
            }),
        ),
        Err(BroadcastError::Unauthorized) => json_error(
            SOURCE,
            StatusCode::UNAUTHORIZED,
            json!({"error": "Unauthorized - Invalid key"}),
            "broadcast key rejected",
        ),
        Err(BroadcastError::Store(err)) => json_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "Broadcast failed", "message": err.to_string()}),
            &err.to_string(),
        ),
    }
}

// ---------------------------------------------------------------------------
// Chip verification

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChipQuery {
    uid: Option<String>,
}

pub async fn verify_chip_query(
    State(state): State<ApiState>,
    Query(query): Query<ChipQuery>,
) -> Response {
    verify_chip(state, query.uid.unwrap_or_default()).await
}

pub async fn verify_chip_path(State(state): State<ApiState>, Path(uid): Path<String>) -> Response {
    verify_chip(state, uid).await
}

async fn verify_chip(state: ApiState, uid: String) -> Response {
    const SOURCE: &str = "infra::http::api::verify_chip";

    match state.chips.verify(&uid).await {
        Ok(ChipLookup::Authenticated(record)) => {
            let view = ChipAuthenticatedView {
                artwork_title: record
                    .artwork_title
                    .unwrap_or_else(|| "ZYBORN".to_string()),
                edition: record
                    .edition_number
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| "—".to_string()),
                registered: format_registered_date(record.registered_at.as_deref()),
                uid: record.uid,
            };
            match render_template("chip/authenticated", &view) {
                Ok(html) => {
                    let mut response = html_response(StatusCode::OK, html);
                    response.headers_mut().insert(
                        axum::http::header::CACHE_CONTROL,
                        HeaderValue::from_static("no-store, no-cache, must-revalidate"),
                    );
                    response
                }
                Err(err) => err.into_response(),
            }
        }
        Ok(ChipLookup::Unregistered(uid)) => chip_page(
            StatusCode::NOT_FOUND,
            render_template(
                "chip/unregistered",
                &ChipUnregisteredView {
                    uid: uid.as_str().to_string(),
                },
            ),
        ),
        Ok(ChipLookup::Deactivated) => {
            let mut response = chip_page(
                StatusCode::FORBIDDEN,
                render_template(
                    "chip/error",
                    &ChipErrorView::new("This artwork has been deactivated"),
                ),
            );
            ErrorReport::from_message(SOURCE, StatusCode::FORBIDDEN, "chip deactivated")
                .attach(&mut response);
            response
        }
        Err(ChipLookupError::InvalidUid) => {
            let mut response = chip_page(
                StatusCode::BAD_REQUEST,
                render_template("chip/error", &ChipErrorView::new("Invalid chip identifier")),
            );
            ErrorReport::from_message(SOURCE, StatusCode::BAD_REQUEST, "malformed chip uid")
                .attach(&mut response);
            response
        }
        Err(ChipLookupError::Store(err)) => {
            let mut response = chip_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                render_template(
                    "chip/error",
                    &ChipErrorView::new("Verification service temporarily unavailable"),
                ),
            );
            ErrorReport::from_message(SOURCE, StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
                .attach(&mut response);
            response
        }
    }
}

fn chip_page(status: StatusCode, rendered: Result<String, crate::application::error::AppError>) -> Response {
    match rendered {
        Ok(html) => html_response(status, html),
        Err(err) => err.into_response(),
    }
}

// ---------------------------------------------------------------------------
// GitHub OAuth for the CMS

pub async fn auth_redirect(State(state): State<ApiState>, headers: HeaderMap) -> Response {
    const SOURCE: &str = "infra::http::api::auth_redirect";

    let url = state.oauth.authorize_url(
        header_str(&headers, "x-forwarded-proto"),
        header_str(&headers, "x-forwarded-host"),
        header_str(&headers, "host"),
    );

    match url {
        Ok(url) => match HeaderValue::from_str(url.as_str()) {
            Ok(location) => {
                let mut response = Response::new(Body::empty());
                *response.status_mut() = StatusCode::FOUND;
                response
                    .headers_mut()
                    .insert(axum::http::header::LOCATION, location);
                response
            }
            Err(err) => json_error(
                SOURCE,
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": "OAuth redirect could not be constructed"}),
                &err.to_string(),
            ),
        },
        Err(OAuthError::NotConfigured) => json_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "OAuth not configured. Missing OAUTH_GITHUB_CLIENT_ID environment variable.",
            }),
            "github client id missing",
        ),
        Err(err) => json_error(
            SOURCE,
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({"error": "OAuth redirect could not be constructed"}),
            &err.to_string(),
        ),
    }
}

pub async fn auth_callback(
    State(state): State<ApiState>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    use crate::application::auth::CallbackOutcome;

    let rendered = match state.oauth.complete_callback(query).await {
        CallbackOutcome::Success { payload } => {
            render_template("oauth/success", &OAuthSuccessView { payload })
        }
        CallbackOutcome::Failure {
            payload,
            description,
        } => render_template(
            "oauth/error",
            &OAuthErrorView {
                payload,
                description,
            },
        ),
    };

    // The popup protocol wants HTTP 200 for both outcomes; the payload tells
    // the opener whether the login worked.
    match rendered {
        Ok(html) => html_response(StatusCode::OK, html),
        Err(err) => err.into_response(),
    }
}

// ---------------------------------------------------------------------------
// Editor preview

#[derive(Debug, Deserialize)]
pub struct PreviewBody {
    collection: String,
    #[serde(default)]
    entry: Value,
}

pub async fn preview(axum::Json(body): axum::Json<PreviewBody>) -> Response {
    const SOURCE: &str = "infra::http::api::preview";

    let kind = match PageKind::from_collection(&body.collection) {
        Ok(kind) => kind,
        Err(err) => {
            return json_error(
                SOURCE,
                StatusCode::BAD_REQUEST,
                json!({"error": err.to_string()}),
                &err.to_string(),
            );
        }
    };

    let doc = PageDocument::from_entry(kind, body.entry);
    html_response(StatusCode::OK, render_page(&doc, Utc::now()))
}
