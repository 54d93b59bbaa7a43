use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing::debug;

use super::types::{ChatRequest, ChatResponse};
use crate::util::truncate_to_char_boundary;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const API_VERSION: &str = "2023-06-01";
const MAX_ERROR_BODY_BYTES: usize = 512;

/// One configured endpoint of the Messages API.
pub(crate) struct ClaudeClient<'a> {
    api_key: &'a str,
    base_url: &'a str,
    http: &'a reqwest::Client,
}

impl<'a> ClaudeClient<'a> {
    pub fn new(api_key: &'a str, base_url: Option<&'a str>, http: &'a reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: base_url.map_or(DEFAULT_BASE_URL, |url| url.trim_end_matches('/')),
            http,
        }
    }

    /// POST `/messages` and decode the reply. Non-2xx statuses become errors carrying a
    /// truncated copy of the response body.
    pub async fn messages(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let started = Instant::now();
        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(request)
            .send()
            .await
            .context("Claude request failed")?;

        let status = response.status();
        debug!(
            model = %request.model,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Claude messages call"
        );

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "Claude API error ({status}): {}",
                truncate_to_char_boundary(&body, MAX_ERROR_BODY_BYTES)
            );
        }

        response
            .json()
            .await
            .context("Failed to decode Claude response")
    }
}
