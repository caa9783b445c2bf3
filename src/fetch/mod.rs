//! HTTP plumbing for the record-keeping API.

mod basic;
mod client;
pub mod auth;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};

/// GETs `url` and decodes the body as JSON.
///
/// Non-success statuses become errors carrying the status and body. No
/// retries are attempted.
pub async fn fetch_json<C: HttpClient + ?Sized>(client: &C, url: reqwest::Url) -> Result<serde_json::Value> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.clone());

    let resp = client
        .execute(req)
        .await
        .with_context(|| format!("request to {url} failed"))?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        anyhow::bail!("{url} returned status {status}: {body}");
    }

    resp.json()
        .await
        .with_context(|| format!("failed to parse JSON from {url}"))
}
