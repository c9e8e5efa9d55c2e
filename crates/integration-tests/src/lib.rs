//! Integration tests for Farm2Hand.
//!
//! Each test starts the full dashboard router on an ephemeral port and talks
//! to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p farm2hand-integration-tests
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use farm2hand_dashboard::config::AppConfig;
use farm2hand_dashboard::state::AppState;
use farm2hand_dashboard::store::SeedData;
use reqwest::Client;

/// A dashboard listening on `127.0.0.1` with the built-in seed.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub state: AppState,
}

impl TestServer {
    /// Start a server over the built-in seed.
    pub async fn start() -> Self {
        Self::start_with(SeedData::builtin()).await
    }

    /// Start a server over `seed`.
    pub async fn start_with(seed: SeedData) -> Self {
        let config = AppConfig {
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../dashboard/static")),
            ..AppConfig::default()
        };
        let state = AppState::new(config, seed).expect("Failed to create application state");
        let app = farm2hand_dashboard::app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        // Redirects are asserted on, not followed.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("Failed to create HTTP client");

        Self {
            addr,
            client,
            state,
        }
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// GET `path` and return status and body text.
    pub async fn get_text(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        let status = resp.status();
        (status, resp.text().await.expect("Failed to read body"))
    }
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
