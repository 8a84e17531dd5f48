#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{header, StatusCode};
use serde_json::{json, Value};

use diet_api::config::AppConfig;
use diet_api::database::MemoryStore;
use diet_api::{app, AppState};

/// A router served on a free local port, backed by its own empty store
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        config.api.enable_request_logging = false;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;
        let router = app(AppState::new(config, Arc::new(MemoryStore::new())));
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Register a user and return the `name=value` part of its session cookie
    pub async fn register(&self, name: &str, email: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&json!({ "name": name, "email": email }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let set_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .context("missing Set-Cookie")?
            .to_str()?;
        let pair = set_cookie.split(';').next().context("empty Set-Cookie")?;
        Ok(pair.trim().to_string())
    }

    pub async fn create_meal(&self, cookie: &str, meal: Value) -> Result<StatusCode> {
        let res = self
            .client
            .post(self.url("/meals"))
            .header(header::COOKIE, cookie)
            .json(&meal)
            .send()
            .await?;
        Ok(res.status())
    }

    pub async fn list_meals(&self, cookie: &str) -> Result<Vec<Value>> {
        let res = self
            .client
            .get(self.url("/meals"))
            .header(header::COOKIE, cookie)
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "list failed: {}", res.status());
        let body = res.json::<Value>().await?;
        Ok(body["meals"].as_array().cloned().unwrap_or_default())
    }
}

pub fn meal(name: &str, is_on_diet: bool, date: &str) -> Value {
    json!({
        "name": name,
        "description": name,
        "isOnDiet": is_on_diet,
        "date": date,
    })
}
