//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the status handler
//! - Wire up middleware (tracing, timeout, request ID, no-store)
//! - Serve until the shutdown broadcast fires

use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    http::{header, HeaderMap, HeaderValue},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::http::status::StatusResponder;

/// HTTP server for the status page.
pub struct StatusServer {
    router: Router,
}

impl StatusServer {
    pub fn new(responder: StatusResponder, request_timeout: Duration) -> Self {
        Self {
            router: Self::build_router(responder, request_timeout),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(responder: StatusResponder, request_timeout: Duration) -> Router {
        Router::new()
            .route("/status", get(status_handler))
            .with_state(responder)
            .layer(SetResponseHeaderLayer::overriding(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-store"),
            ))
            .layer(TimeoutLayer::new(request_timeout))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Status page listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// The first `format` pair in the query wins; anything unparseable is ignored.
fn requested_format(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .find(|(key, _)| key == "format")
        .map(|(_, value)| value.into_owned())
}

fn wants_json(query: Option<&str>, headers: &HeaderMap) -> bool {
    if let Some(format) = requested_format(query) {
        return format.eq_ignore_ascii_case("json");
    }
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

async fn status_handler(
    State(responder): State<StatusResponder>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> Response {
    if wants_json(query.as_deref(), &headers) {
        Json(responder.render()).into_response()
    } else {
        Html(responder.render_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::state::{HealthTracker, PollOutcome};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn server(tracker: Arc<HealthTracker>) -> StatusServer {
        StatusServer::new(StatusResponder::new(tracker, "Hyperion"), Duration::from_secs(5))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        (status, headers, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_status_json_tracks_state() {
        let tracker = Arc::new(HealthTracker::new());
        let server = server(tracker.clone());

        let (status, headers, body) = get_json(server.router(), "/status?format=json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_code"], "okay");
        assert_eq!(body["message"], "Gud!");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert!(headers.contains_key("x-request-id"));

        tracker.apply(PollOutcome::failure("refused"));
        let (status, _, body) = get_json(server.router(), "/status?format=json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_code"], "error");
        assert_eq!(body["name"], "Hyperion");
    }

    #[tokio::test]
    async fn test_status_tolerates_odd_query_strings() {
        let server = server(Arc::new(HealthTracker::new()));

        let (status, _, body) = get_json(server.router(), "/status?format=json&format=html").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_code"], "okay");

        for uri in ["/status?format", "/status?&&=x", "/status?format=%FF"] {
            let response = server
                .router()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_accept_header_selects_json() {
        let server = server(Arc::new(HealthTracker::new()));
        let response = server
            .router()
            .oneshot(
                Request::builder()
                    .uri("/status")
                    .header(header::ACCEPT, "application/json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_status_html_by_default() {
        let server = server(Arc::new(HealthTracker::new()));
        let response = server
            .router()
            .oneshot(Request::builder().uri("/status").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        let html = String::from_utf8(body.to_vec()).unwrap();
        assert!(html.contains("Gud!"));
    }

    #[tokio::test]
    async fn test_only_status_route() {
        let server = server(Arc::new(HealthTracker::new()));
        let response = server
            .router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
