// Stub login endpoint shared by the integration tests in one test binary.
use axum::{
    Json, Router,
    // Status codes for the scripted failure replies.
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde_json::{Value, json};
use std::{
    // `Arc` shares the published URL with the server thread; `OnceLock` writes it only once.
    sync::{Arc, OnceLock},
    // Sleep durations are used in readiness polling loops.
    time::Duration,
};

// Accounts the stub knows about; each one selects a scripted reply.
pub const GOOD_EMAIL: &str = "pilot@example.com";
pub const GOOD_PASSWORD: &str = "hunter2";
pub const LOCKED_EMAIL: &str = "locked@example.com";
pub const BROKEN_EMAIL: &str = "broken@example.com";
pub const GARBLED_EMAIL: &str = "garbled@example.com";

// Global base URL used by all tests after the stub publishes its bound address.
static SERVER_URL: OnceLock<String> = OnceLock::new();
// One-time guard that ensures the stub bootstrap path runs only once.
static SERVER_READY: OnceLock<()> = OnceLock::new();

// Start the stub once and return its base URL.
pub fn ensure_server() -> &'static str {
    // Run initialization exactly once even if multiple tests call this function.
    SERVER_READY.get_or_init(|| {
        // Local one-time slot where the server thread publishes its selected URL.
        let published_url = Arc::new(OnceLock::<String>::new());
        // Clone so the spawned thread can write into the same shared slot.
        let published_url_thread = Arc::clone(&published_url);
        // Own thread and runtime so the stub outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            // The stub thread owns its Tokio runtime.
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            // Bind and serve on that runtime.
            runtime.block_on(async move {
                // Bind to an ephemeral port to avoid collisions with local services.
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                // Capture the exact address that was assigned by the OS.
                let addr = listener.local_addr().expect("get local addr");
                // Publish the base URL so test code can target the right server.
                let _ = published_url_thread.set(format!("http://{}", addr));
                // Serve login requests until the test process exits.
                axum::serve(listener, stub_router())
                    .await
                    .expect("stub server failed");
            });
        });
        // Block until the URL is published and the port accepts connections.
        wait_for_server_url_and_readiness(published_url);
    });

    // Return the stable shared URL used by all tests in this binary.
    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

// Full login URL of the stub.
pub fn login_url() -> url::Url {
    url::Url::parse(&format!("{}/jwt/login", ensure_server())).expect("stub url")
}

// A URL nothing listens on: bind an ephemeral port, then release it.
pub fn refused_url() -> url::Url {
    // Let the OS pick a free port.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    // Closing the listener leaves the port refusing connections.
    drop(listener);
    url::Url::parse(&format!("http://{addr}/jwt/login")).expect("refused url")
}

// Same path as the real auth service.
fn stub_router() -> Router {
    Router::new().route("/jwt/login", post(login))
}

// Replies are scripted by email so each test picks its scenario.
async fn login(Json(body): Json<Value>) -> Response {
    // Missing fields read as empty strings and fall through to a rejection.
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body
        .get("password")
        .and_then(Value::as_str)
        .unwrap_or_default();

    match email {
        // Known account with the right password gets a session payload.
        GOOD_EMAIL if password == GOOD_PASSWORD => Json(json!({
            "user": { "id": 7, "email": GOOD_EMAIL, "username": "pilot" },
            "accessToken": "token-7",
        }))
        .into_response(),
        // Known account, wrong password.
        GOOD_EMAIL => Json(json!({ "error": "password" })).into_response(),
        // A rejection code the client does not know.
        LOCKED_EMAIL => Json(json!({ "error": "locked" })).into_response(),
        // Upstream failure with the usual error envelope.
        BROKEN_EMAIL => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database unavailable" })),
        )
            .into_response(),
        // 200 with a body that is not JSON.
        GARBLED_EMAIL => (StatusCode::OK, "<html>maintenance</html>").into_response(),
        // Everything else is an unknown account.
        _ => Json(json!({ "error": "incorrect" })).into_response(),
    }
}

// Wait for URL publication and then for the stub socket to accept TCP connections.
fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    // Poll until the server thread publishes the base URL.
    let base_url = loop {
        // If the URL is published, clone it and stop waiting.
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        // Avoid a tight loop while waiting for the background thread.
        std::thread::sleep(Duration::from_millis(10));
    };

    // Persist the URL globally so every test gets the same endpoint.
    let _ = SERVER_URL.set(base_url.clone());

    // Strip the scheme so we can use host:port for raw TCP readiness checks.
    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");

    // Retry for a short period to avoid racing bind/accept.
    for _ in 0..100 {
        // Successful connect means the stub is accepting connections.
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        // Wait briefly before the next readiness probe.
        std::thread::sleep(Duration::from_millis(20));
    }

    // Fail fast if startup never reached an accepting state.
    panic!("stub server did not become ready in time");
}
