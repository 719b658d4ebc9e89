#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use portfolio_api::app;
use portfolio_api::config::{AppConfig, PasswordConfig};
use portfolio_api::database::{MemoryStore, PortfolioStore};
use portfolio_api::state::AppState;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const TEST_SECRET: &str = "integration-test-signing-key-0123456789";

/// Development defaults with a test key and a cheap argon2 cost.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.jwt.secret_key = TEST_SECRET.to_string();
    config.password = PasswordConfig {
        memory_kib: 64,
        iterations: 1,
        parallelism: 1,
    };
    config
}

/// In-process application over a seeded `MemoryStore`.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Result<Self> {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Result<Self> {
        let store: Arc<dyn PortfolioStore> = Arc::new(MemoryStore::new());
        Self::with_store(config, store).await
    }

    pub async fn with_store(config: AppConfig, store: Arc<dyn PortfolioStore>) -> Result<Self> {
        let state = AppState::new(config, store)?;
        let hash = state.passwords.hash(ADMIN_PASSWORD)?;
        // Stores that refuse writes are still usable for the read-only paths under test.
        let _ = state.store.insert_admin(ADMIN_EMAIL, &hash).await;

        let router = app(state.clone());
        Ok(Self { state, router })
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response<Body>> {
        Ok(self.router.clone().oneshot(request).await?)
    }

    /// Logs in as the seeded admin and returns the `Cookie` header value.
    pub async fn login_cookie(&self) -> Result<String> {
        let response = self
            .send(json_request(
                Method::POST,
                "/auth/login",
                &serde_json::json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }),
                None,
            ))
            .await?;
        anyhow::ensure!(response.status().is_success(), "login failed: {}", response.status());
        session_cookie_pair(&response).context("login response carried no session cookie")
    }

    /// Cookie value for a token signed with the test key at `issued_at`.
    pub fn cookie_for_token_at(&self, issued_at: chrono::DateTime<chrono::Utc>) -> Result<String> {
        let issued = self.state.tokens.issue_at(ADMIN_EMAIL, issued_at)?;
        Ok(format!("auth_token={}", issued.token))
    }
}

pub fn json_request(method: Method, uri: &str, body: &Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn raw_request(method: Method, uri: &str, content_type: Option<&str>, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request_without_body(Method::GET, uri, cookie)
}

pub fn delete(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request_without_body(Method::DELETE, uri, cookie)
}

fn request_without_body(method: Method, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub const MULTIPART_BOUNDARY: &str = "portfolio-test-boundary";

/// A `multipart/form-data` request with one file part.
pub fn upload_request(
    uri: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
    cookie: Option<&str>,
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", MULTIPART_BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            field, file_name, content_type
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

    let mut builder = Request::builder().method(Method::POST).uri(uri).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
    );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Result<Vec<u8>> {
    Ok(to_bytes(response.into_body(), usize::MAX).await?.to_vec())
}

pub async fn body_json(response: Response<Body>) -> Result<Value> {
    let bytes = body_bytes(response).await?;
    serde_json::from_slice(&bytes).with_context(|| format!("body is not JSON: {}", String::from_utf8_lossy(&bytes)))
}

/// The raw `Set-Cookie` header of a response.
pub fn set_cookie<B>(response: &Response<B>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// `auth_token=<jwt>` from a `Set-Cookie` header, ready for a `Cookie` header.
pub fn session_cookie_pair<B>(response: &Response<B>) -> Option<String> {
    set_cookie(response).and_then(|raw| raw.split(';').next().map(|pair| pair.trim().to_string()))
}

/// Asserts the error envelope shape and returns the body.
pub async fn expect_envelope(response: Response<Body>, status: u16, kind: &str) -> Result<Value> {
    assert_eq!(response.status().as_u16(), status, "unexpected status");
    let body = body_json(response).await?;
    assert!(
        uuid_like(body["id"].as_str().unwrap_or_default()),
        "envelope id is not a UUID: {}",
        body
    );
    assert_eq!(body["status"], status, "envelope status: {}", body);
    assert_eq!(body["type"], kind, "envelope type: {}", body);
    assert!(body["title"].is_string(), "envelope title: {}", body);
    Ok(body)
}

fn uuid_like(value: &str) -> bool {
    value.len() == 36 && value.chars().filter(|c| *c == '-').count() == 4
}

/// A real listener on an ephemeral port, for clients that need a socket.
pub struct TestServer {
    pub base_url: String,
    pub app: TestApp,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let app = TestApp::new().await?;
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;
        let router = app.router.clone();

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>()).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            app,
            handle,
        })
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
