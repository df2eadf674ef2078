use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use zyborn::application::auth::OAuthService;
use zyborn::application::broadcast::BroadcastService;
use zyborn::application::chips::ChipVerificationService;
use zyborn::application::delivery::{
    CaptchaError, CaptchaOutcome, CaptchaVerifier, MailError, Mailer, OAuthError, OutboundEmail,
    TokenExchanger,
};
use zyborn::application::press::PressInquiryService;
use zyborn::application::stores::{
    BroadcastRecipient, ChipStore, FooterSubscriberStore, InquiryStore, NewFooterSubscriber,
    NewPressInquiry, NewSubscriber, NewVerification, StoreError, SubscriberStore,
    VerificationStore,
};
use zyborn::application::subscribers::{FooterSubscribeService, SubscribeService};
use zyborn::application::verification::VerificationService;
use zyborn::domain::chips::{ChipRecord, ChipUid};
use zyborn::domain::email::EmailAddress;
use zyborn::infra::http::{ApiState, build_router};

const SENDER: &str = "ZYBORN ART <hello@zyborn.com>";
const BROADCAST_KEY: &str = "launch-key";

#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutboundEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[derive(Default)]
struct MemorySubscribers {
    rows: Mutex<Vec<NewSubscriber>>,
    recipients: Vec<BroadcastRecipient>,
    not_configured: bool,
}

#[async_trait]
impl SubscriberStore for MemorySubscribers {
    async fn insert(&self, subscriber: NewSubscriber) -> Result<(), StoreError> {
        if self.not_configured {
            return Err(StoreError::NotConfigured);
        }
        let mut rows = self.rows.lock().unwrap();
        if rows.iter().any(|row| row.email == subscriber.email) {
            return Err(StoreError::duplicate("email_subscribers_email_key"));
        }
        rows.push(subscriber);
        Ok(())
    }

    async fn list_recipients(&self) -> Result<Vec<BroadcastRecipient>, StoreError> {
        Ok(self.recipients.clone())
    }
}

#[derive(Default)]
struct MemoryFooterStore {
    rows: Mutex<Vec<NewFooterSubscriber>>,
    recent: u64,
}

#[async_trait]
impl FooterSubscriberStore for MemoryFooterStore {
    async fn recent_submissions(
        &self,
        _ip_hash: &str,
        _since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        Ok(self.recent)
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, StoreError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|row| row.email == email.as_str()))
    }

    async fn insert(&self, subscriber: NewFooterSubscriber) -> Result<(), StoreError> {
        self.rows.lock().unwrap().push(subscriber);
        Ok(())
    }

    async fn mark_welcome_sent(&self, _email: &EmailAddress) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
struct MemoryInquiries {
    rows: Mutex<Vec<NewPressInquiry>>,
}

#[async_trait]
impl InquiryStore for MemoryInquiries {
    async fn insert(&self, inquiry: NewPressInquiry) -> Result<(), StoreError> {
        self.rows.lock().unwrap().push(inquiry);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryVerifications {
    duplicate: bool,
    rows: Mutex<Vec<NewVerification>>,
}

#[async_trait]
impl VerificationStore for MemoryVerifications {
    async fn insert(&self, verification: NewVerification) -> Result<(), StoreError> {
        if self.duplicate {
            return Err(StoreError::duplicate("bidder_verifications_email_key"));
        }
        self.rows.lock().unwrap().push(verification);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryChips {
    record: Option<ChipRecord>,
}

#[async_trait]
impl ChipStore for MemoryChips {
    async fn find(&self, _uid: &ChipUid) -> Result<Option<ChipRecord>, StoreError> {
        Ok(self.record.clone())
    }
}

struct AcceptAllCaptcha;

#[async_trait]
impl CaptchaVerifier for AcceptAllCaptcha {
    async fn verify(&self, _token: &str) -> Result<CaptchaOutcome, CaptchaError> {
        Ok(CaptchaOutcome {
            success: true,
            score: Some(0.9),
        })
    }
}

struct StaticExchanger;

#[async_trait]
impl TokenExchanger for StaticExchanger {
    async fn exchange(&self, _code: &str) -> Result<String, OAuthError> {
        Ok("gho_test".to_string())
    }
}

struct Fixture {
    subscribers: Arc<MemorySubscribers>,
    footer: Arc<MemoryFooterStore>,
    inquiries: Arc<MemoryInquiries>,
    verifications: Arc<MemoryVerifications>,
    mailer: Arc<RecordingMailer>,
}

fn build_app(
    subscribers: MemorySubscribers,
    footer: MemoryFooterStore,
    verifications: MemoryVerifications,
    chips: MemoryChips,
    client_id: Option<&str>,
) -> (Router, Fixture) {
    let subscribers = Arc::new(subscribers);
    let footer = Arc::new(footer);
    let inquiries = Arc::new(MemoryInquiries::default());
    let verifications = Arc::new(verifications);
    let mailer = Arc::new(RecordingMailer::default());

    let state = ApiState {
        subscribe: Arc::new(SubscribeService::new(
            subscribers.clone(),
            mailer.clone(),
            SENDER.to_string(),
        )),
        footer: Arc::new(FooterSubscribeService::new(
            footer.clone(),
            Arc::new(AcceptAllCaptcha),
            mailer.clone(),
            SENDER.to_string(),
        )),
        press: Arc::new(PressInquiryService::new(
            inquiries.clone(),
            mailer.clone(),
            "ZYBORN Press <press@zyborn.com>".to_string(),
            "press@zyborn.com".to_string(),
        )),
        verification: Arc::new(VerificationService::new(verifications.clone())),
        broadcast: Arc::new(BroadcastService::new(
            subscribers.clone(),
            mailer.clone(),
            SENDER.to_string(),
            BROADCAST_KEY.to_string(),
        )),
        chips: Arc::new(ChipVerificationService::new(Arc::new(chips))),
        oauth: Arc::new(OAuthService::new(
            client_id.map(str::to_string),
            "zyborn.com".to_string(),
            Arc::new(StaticExchanger),
        )),
    };

    (
        build_router(state),
        Fixture {
            subscribers,
            footer,
            inquiries,
            verifications,
            mailer,
        },
    )
}

fn default_app() -> (Router, Fixture) {
    build_app(
        MemorySubscribers::default(),
        MemoryFooterStore::default(),
        MemoryVerifications::default(),
        MemoryChips::default(),
        Some("client-123"),
    )
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn subscribe_accepts_a_new_address() {
    let (app, fixture) = default_app();

    let response = app
        .oneshot(post_json(
            "/api/subscribe",
            json!({"email": "Collector@Example.com", "name": "Ada"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
    let body = body_json(response).await;
    assert_eq!(body["message"], "Successfully subscribed!");

    let rows = fixture.subscribers.rows.lock().unwrap();
    assert_eq!(rows[0].email, "collector@example.com");
    assert_eq!(rows[0].form_location, "hero");
    assert_eq!(fixture.mailer.sent.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn subscribe_rejects_malformed_email() {
    let (app, _) = default_app();

    let response = app
        .oneshot(post_json("/api/subscribe", json!({"email": "not-an-email"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Valid email is required");
}

#[tokio::test]
async fn subscribe_reports_configuration_gap_as_500() {
    let (app, _) = build_app(
        MemorySubscribers {
            not_configured: true,
            ..Default::default()
        },
        MemoryFooterStore::default(),
        MemoryVerifications::default(),
        MemoryChips::default(),
        Some("client-123"),
    );

    let response = app
        .oneshot(post_json("/api/subscribe", json!({"email": "a@example.com"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Server configuration error");
}

#[tokio::test]
async fn form_endpoints_answer_preflight_and_reject_get() {
    let (app, _) = default_app();

    let preflight = app
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/subscribe")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::OK);
    assert_eq!(
        preflight.headers()["access-control-allow-methods"],
        "POST, OPTIONS"
    );

    let get = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/subscribe")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(get.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(get).await;
    assert_eq!(body["error"], "Method not allowed");
}

#[tokio::test]
async fn footer_subscribe_hashes_the_forwarded_ip() {
    let (app, fixture) = default_app();

    let mut request = post_json(
        "/api/subscribe-footer",
        json!({"email": "reader@example.com", "turnstileToken": "tok"}),
    );
    request
        .headers_mut()
        .insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Thank you for subscribing!");

    let rows = fixture.footer.rows.lock().unwrap();
    assert_eq!(rows[0].email, "reader@example.com");
    assert_eq!(rows[0].ip_hash.len(), 16);
    assert_eq!(rows[0].turnstile_score, Some(0.9));
}

#[tokio::test]
async fn footer_subscribe_enforces_the_hourly_ceiling() {
    let (app, _) = build_app(
        MemorySubscribers::default(),
        MemoryFooterStore {
            recent: 3,
            ..Default::default()
        },
        MemoryVerifications::default(),
        MemoryChips::default(),
        Some("client-123"),
    );

    let response = app
        .oneshot(post_json(
            "/api/subscribe-footer",
            json!({"email": "reader@example.com", "turnstileToken": "tok"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Too many requests. Please try again later.");
}

#[tokio::test]
async fn press_inquiry_requires_all_fields() {
    let (app, fixture) = default_app();

    let incomplete = app
        .clone()
        .oneshot(post_json(
            "/api/press-inquiry",
            json!({"name": "Robin", "email": "robin@example.com"}),
        ))
        .await
        .unwrap();
    assert_eq!(incomplete.status(), StatusCode::BAD_REQUEST);
    let body = body_json(incomplete).await;
    assert_eq!(body["error"], "All fields are required");

    let complete = app
        .oneshot(post_json(
            "/api/press-inquiry",
            json!({
                "name": "Robin",
                "email": "robin@example.com",
                "outlet": "Artforum",
                "inquiry_type": "interview",
                "message": "Line one\nLine two",
            }),
        ))
        .await
        .unwrap();
    assert_eq!(complete.status(), StatusCode::OK);
    let body = body_json(complete).await;
    assert_eq!(body["status"], "success");

    assert_eq!(fixture.inquiries.rows.lock().unwrap().len(), 1);
    let sent = fixture.mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].subject, "[Press Inquiry] interview - Artforum");
    assert!(sent[0].html.contains("Line one<br>Line two"));
}

#[tokio::test]
async fn verification_duplicate_maps_to_conflict() {
    let (app, _) = build_app(
        MemorySubscribers::default(),
        MemoryFooterStore::default(),
        MemoryVerifications {
            duplicate: true,
            ..Default::default()
        },
        MemoryChips::default(),
        Some("client-123"),
    );

    let response = app
        .oneshot(post_json(
            "/api/verification",
            json!({
                "fullName": "Ada Lovelace",
                "birthDate": "1990-01-01",
                "nationality": "GB",
                "email": "ada@example.com",
                "phone": "+44 20 7946 0000",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["code"], "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn verification_accepts_a_complete_submission() {
    let (app, fixture) = default_app();

    let response = app
        .oneshot(post_json(
            "/api/verification",
            json!({
                "fullName": "Ada Lovelace",
                "birthDate": "1990-01-01",
                "nationality": "GB",
                "email": "Ada@Example.com",
                "phone": "+44 20 7946 0000",
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let rows = fixture.verifications.rows.lock().unwrap();
    assert_eq!(rows[0].email, "ada@example.com");
    assert_eq!(rows[0].status, "pending_call");
    assert!(!rows[0].verified);
}

#[tokio::test]
async fn broadcast_rejects_a_wrong_key() {
    let (app, _) = default_app();

    let mut request = post_json("/api/broadcast", json!({}));
    request
        .headers_mut()
        .insert("x-broadcast-key", "guess".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized - Invalid key");
}

#[tokio::test(start_paused = true)]
async fn broadcast_reports_per_recipient_outcomes() {
    let (app, fixture) = build_app(
        MemorySubscribers {
            recipients: vec![
                BroadcastRecipient {
                    email: "a@example.com".to_string(),
                    name: Some("Ada".to_string()),
                },
                BroadcastRecipient {
                    email: "b@example.com".to_string(),
                    name: None,
                },
            ],
            ..Default::default()
        },
        MemoryFooterStore::default(),
        MemoryVerifications::default(),
        MemoryChips::default(),
        Some("client-123"),
    );

    let mut request = post_json("/api/broadcast", json!({}));
    request
        .headers_mut()
        .insert("x-broadcast-key", BROADCAST_KEY.parse().unwrap());

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["summary"]["total"], 2);
    assert_eq!(body["summary"]["sent"], 2);
    assert_eq!(body["details"][0]["status"], "sent");

    let sent = fixture.mailer.sent.lock().unwrap();
    assert!(sent[0].html.contains("Dear Ada,"));
    assert!(sent[1].html.contains("Dear Collector,"));
}

#[tokio::test]
async fn chip_lookup_covers_the_html_outcomes() {
    let (app, _) = default_app();
    let invalid = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/verify-chip?uid=zz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);
    assert!(body_string(invalid).await.contains("Invalid chip identifier"));

    let unregistered = app
        .oneshot(
            Request::builder()
                .uri("/t/04a1b2c3d4e5f6")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(unregistered.status(), StatusCode::NOT_FOUND);
    assert!(body_string(unregistered).await.contains("04A1B2C3D4E5F6"));

    let (app, _) = build_app(
        MemorySubscribers::default(),
        MemoryFooterStore::default(),
        MemoryVerifications::default(),
        MemoryChips {
            record: Some(ChipRecord {
                uid: "04A1B2C3D4E5F6".to_string(),
                artwork_title: Some("Survival Rations".to_string()),
                edition_number: Some(7),
                registered_at: Some("2025-12-24T18:00:00Z".to_string()),
                is_active: true,
            }),
        },
        Some("client-123"),
    );
    let active = app
        .oneshot(
            Request::builder()
                .uri("/api/verify-chip?uid=04A1B2C3D4E5F6")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(active.status(), StatusCode::OK);
    assert_eq!(
        active.headers()["cache-control"],
        "no-store, no-cache, must-revalidate"
    );
    let html = body_string(active).await;
    assert!(html.contains("Survival Rations"));
    assert!(html.contains("7 / 21"));
    assert!(html.contains("24 Dec 2025"));
}

#[tokio::test]
async fn auth_redirects_to_github_with_forwarded_host() {
    let (app, _) = default_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth")
                .header("x-forwarded-proto", "https")
                .header("x-forwarded-host", "zyborn.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = response.headers()["location"].to_str().unwrap();
    assert!(location.starts_with("https://github.com/login/oauth/authorize?"));
    assert!(location.contains("scope=repo%2Cuser"));
    assert!(location.contains("zyborn.com%2Fapi%2Fauth%2Fcallback"));
}

#[tokio::test]
async fn auth_without_client_id_is_a_server_error() {
    let (app, _) = build_app(
        MemorySubscribers::default(),
        MemoryFooterStore::default(),
        MemoryVerifications::default(),
        MemoryChips::default(),
        None,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(
        body["error"],
        "OAuth not configured. Missing OAUTH_GITHUB_CLIENT_ID environment variable."
    );
}

#[tokio::test]
async fn auth_callback_posts_the_token_to_the_opener() {
    let (app, _) = default_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/auth/callback?code=authcode")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("authorization:github:success:"));
    assert!(html.contains("gho_test"));
}

#[tokio::test]
async fn preview_renders_home_sections_and_rejects_unknown_collections() {
    let (app, _) = default_app();

    let rendered = app
        .clone()
        .oneshot(post_json(
            "/api/preview",
            json!({
                "collection": "home",
                "entry": {
                    "sections": [
                        {"type": "hero", "headline": "CANNED <BTC>"},
                    ],
                },
            }),
        ))
        .await
        .unwrap();
    assert_eq!(rendered.status(), StatusCode::OK);
    assert_eq!(
        rendered.headers()["content-type"],
        "text/html; charset=utf-8"
    );
    let html = body_string(rendered).await;
    assert!(html.contains("preview-page--home"));
    assert!(html.contains("CANNED &lt;BTC&gt;"));

    let unknown = app
        .oneshot(post_json(
            "/api/preview",
            json!({"collection": "posts", "entry": {}}),
        ))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::BAD_REQUEST);
}
