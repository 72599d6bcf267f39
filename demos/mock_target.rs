//! A pretend target for trying the monitor locally.
//!
//! `GET /health` answers 200 or 503; `POST /toggle` flips between them.
//!
//! ```text
//! cargo run --example mock_target
//! BOT_STATUS_API=http://127.0.0.1:8081/health WEBHOOK_URL=... CRON_INTERVAL=5s cargo run
//! curl -X POST http://127.0.0.1:8081/toggle
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::{get, post}, Router};

#[tokio::main]
async fn main() {
    let healthy = Arc::new(AtomicBool::new(true));

    let app = Router::new()
        .route(
            "/health",
            get(|State(healthy): State<Arc<AtomicBool>>| async move {
                if healthy.load(Ordering::Relaxed) {
                    (StatusCode::OK, "Target is healthy! ✅")
                } else {
                    (StatusCode::SERVICE_UNAVAILABLE, "Target is down ❌")
                }
            }),
        )
        .route(
            "/toggle",
            post(|State(healthy): State<Arc<AtomicBool>>| async move {
                let was = healthy.fetch_xor(true, Ordering::Relaxed);
                if was { "now unhealthy" } else { "now healthy" }
            }),
        )
        .with_state(healthy);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8081));
    println!("Mock target is listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
