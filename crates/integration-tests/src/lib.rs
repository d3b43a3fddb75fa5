//! Integration tests for the Honor Culture store API.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`.
//! Each [`TestContext`] owns a fresh data file under the OS temp directory,
//! seeded on open and removed on drop, and a [`RecordingNotifier`] in place
//! of Telegram.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p honor-culture-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - Products, categories, filters, bulk operations
//! - `orders` - Checkout, order management, inventory alerts
//! - `auth` - Login, token transports, logout, audit log
//! - `forms` - Contact form and notifier smoke test
//! - `health` - Liveness, readiness, request ids

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use honor_culture_server::config::ServerConfig;
use honor_culture_server::routes;
use honor_culture_server::services::notifications::{
    NotificationDispatcher, Notifier, NotifyError,
};
use honor_culture_server::state::AppState;
use honor_culture_server::store::DocumentStore;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

/// Seeded super admin credentials.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// Notifier that records every message instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    /// Make subsequent deliveries fail.
    pub fn fail_deliveries(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    /// Messages recorded so far.
    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }

    /// Wait until at least `count` messages were recorded, up to two seconds.
    pub async fn wait_for(&self, count: usize) -> Vec<String> {
        for _ in 0..200 {
            let messages = self.messages();
            if messages.len() >= count {
                return messages;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.messages()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.to_string());
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Api {
                status: 400,
                description: "Bad Request: chat not found".to_string(),
            });
        }
        Ok(())
    }
}

/// A response with its body parsed as JSON when possible.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub text: String,
    pub json: Value,
}

/// A running application over a throwaway data file.
pub struct TestContext {
    pub app: Router,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    pub data_file: PathBuf,
}

impl TestContext {
    /// Open a freshly seeded store with a recording notifier.
    pub async fn new() -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        Self::build(NotificationDispatcher::new(notifier.clone()), notifier).await
    }

    /// Open a freshly seeded store with notifications disabled.
    pub async fn without_notifier() -> Self {
        Self::build(
            NotificationDispatcher::disabled(),
            Arc::new(RecordingNotifier::default()),
        )
        .await
    }

    async fn build(notifications: NotificationDispatcher, notifier: Arc<RecordingNotifier>) -> Self {
        let data_file =
            std::env::temp_dir().join(format!("honor-culture-test-{}.json", Uuid::new_v4()));
        let store = DocumentStore::open(&data_file).await.unwrap();
        let state = AppState::new(ServerConfig::local(&data_file), store, notifications);
        let app = routes::app(state.clone());

        Self {
            app,
            state,
            notifier,
            data_file,
        }
    }

    /// Send a request and collect the response.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        let json = serde_json::from_str(&text).unwrap_or(Value::Null);

        TestResponse {
            status,
            headers,
            text,
            json,
        }
    }

    /// Send `method uri` with an optional bearer token and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(body) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(body.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).unwrap()).await
    }

    /// Unauthenticated GET.
    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    /// Unauthenticated JSON POST.
    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    /// Log in as the seeded super admin and return the session token.
    pub async fn login(&self) -> String {
        let response = self
            .post(
                "/api/auth",
                json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text);
        response.json["token"].as_str().unwrap().to_string()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.data_file);
    }
}

/// A complete checkout body for two units of seeded product `p1`.
#[must_use]
pub fn order_body() -> Value {
    json!({
        "items": [{
            "id": "p1",
            "name": "Performance Tee",
            "price": 45.0,
            "quantity": 2,
            "variant": { "color": "Black", "size": "M" },
            "images": ["https://example.com/tee.jpg"]
        }],
        "shippingInfo": {
            "fullName": "Jordan Reyes",
            "email": "jordan@example.com",
            "phone": "+1 555 0100",
            "country": "US",
            "state": "CA",
            "city": "Oakland",
            "streetAddress": "1 Main St",
            "postalCode": "94601"
        },
        "paymentInfo": {
            "cardHolderName": "Jordan Reyes",
            "cardNumber": "4242 4242 4242 4242"
        }
    })
}
