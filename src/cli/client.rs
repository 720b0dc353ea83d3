use std::time::Duration;

use anyhow::{anyhow, Context};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use url::Url;

/// Thin HTTP client for the registry API. Unwraps the `{"success", "data"}`
/// envelope and turns error envelopes into `anyhow` errors.
pub struct RegistryClient {
    http: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl RegistryClient {
    pub fn new(server: &str, token: Option<String>) -> anyhow::Result<Self> {
        let base = Url::parse(server).with_context(|| format!("invalid server URL '{}'", server))?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            base,
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn url(&self, path: &str) -> anyhow::Result<Url> {
        Ok(self.base.join(path)?)
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<Value> {
        self.send(Method::GET, path).await
    }

    pub async fn post(&self, path: &str) -> anyhow::Result<Value> {
        self.send(Method::POST, path).await
    }

    async fn send(&self, method: Method, path: &str) -> anyhow::Result<Value> {
        let url = self.url(path)?;
        tracing::debug!("{} {}", method, url);

        let mut request = self.http.request(method, url.clone());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .with_context(|| format!("{} returned a non-JSON body", url))?;

        unwrap_envelope(status, body)
    }
}

/// `data` of a success envelope, or an error carrying the server's message and code
pub fn unwrap_envelope(status: StatusCode, body: Value) -> anyhow::Result<Value> {
    if body.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(body.get("data").cloned().unwrap_or(Value::Null));
    }

    let message = body
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("request failed");
    match body.get("code").and_then(Value::as_str) {
        Some(code) => Err(anyhow!("{} ({}, HTTP {})", message, code, status.as_u16())),
        None => Err(anyhow!("{} (HTTP {})", message, status.as_u16())),
    }
}
