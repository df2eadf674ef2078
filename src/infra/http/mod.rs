pub mod api;
mod middleware;

pub use api::ApiState;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::{Next, from_fn},
    response::Response,
    routing::{get, post},
};

use middleware::{log_responses, set_request_context};

/// Public router: the form/broadcast API, chip verification, the CMS OAuth
/// pair, and the editor preview endpoint.
pub fn build_router(state: ApiState) -> Router {
    let form_routes = Router::new()
        .route(
            "/api/subscribe",
            post(api::subscribe)
                .options(api::preflight)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/api/subscribe-footer",
            post(api::subscribe_footer)
                .options(api::preflight)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/api/press-inquiry",
            post(api::press_inquiry)
                .options(api::preflight)
                .fallback(api::method_not_allowed),
        )
        .route(
            "/api/verification",
            post(api::verification)
                .options(api::preflight)
                .fallback(api::method_not_allowed),
        )
        .route_layer(from_fn(form_cors));

    let broadcast_routes = Router::new()
        .route(
            "/api/broadcast",
            post(api::broadcast)
                .options(api::preflight)
                .fallback(api::method_not_allowed),
        )
        .route_layer(from_fn(broadcast_cors));

    Router::new()
        .merge(form_routes)
        .merge(broadcast_routes)
        .route("/api/preview", post(api::preview))
        .route("/api/verify-chip", get(api::verify_chip_query))
        .route("/t/{uid}", get(api::verify_chip_path))
        .route("/api/auth", get(api::auth_redirect))
        .route("/api/auth/callback", get(api::auth_callback))
        .with_state(state)
        .layer(from_fn(log_responses))
        .layer(from_fn(set_request_context))
}

async fn form_cors(request: Request<Body>, next: Next) -> Response {
    with_cors(next.run(request).await, "Content-Type")
}

async fn broadcast_cors(request: Request<Body>, next: Next) -> Response {
    with_cors(next.run(request).await, "Content-Type, x-broadcast-key")
}

fn with_cors(mut response: Response, allow_headers: &'static str) -> Response {
    let headers = response.headers_mut();
    headers.insert(
        "access-control-allow-origin",
        HeaderValue::from_static("*"),
    );
    headers.insert(
        "access-control-allow-methods",
        HeaderValue::from_static("POST, OPTIONS"),
    );
    headers.insert(
        "access-control-allow-headers",
        HeaderValue::from_static(allow_headers),
    );
    response
}
