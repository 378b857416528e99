//! Upstream fixture provider.
//!
//! Defines the `FixtureSource` trait — the injected fetch capability
//! the pipeline consumes — and the SoccersAPI implementation.
//!
//! API: `https://api.soccersapi.com/v2.2/` — credentials go as `user`
//! and `token` query parameters; the schedule endpoint returns events
//! under a top-level `data` key.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{Days, Utc};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::types::ScanError;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Abstraction over the upstream fixture provider.
///
/// The pipeline never fetches; it receives an already-fetched JSON
/// document from an implementor of this trait.
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Fetch the raw schedule payload covering the scan window.
    async fn fetch_events(&self) -> Result<Value, ScanError>;

    /// Provider name for logging and health reporting.
    fn name(&self) -> &str;

    /// Whether credentials are present. Health endpoint reports this.
    fn is_configured(&self) -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// SoccersAPI client
// ---------------------------------------------------------------------------

pub struct SoccersApiClient {
    http: Client,
    base_url: String,
    user: String,
    token: SecretString,
    days_ahead: u64,
    per_page: u32,
}

impl SoccersApiClient {
    /// Build a client from config plus resolved credentials.
    ///
    /// Empty credentials are allowed — the client still constructs and
    /// every fetch surfaces the provider's rejection as an upstream
    /// error, which the HTTP layer maps to a gateway response.
    pub fn new(cfg: &UpstreamConfig, user: String, token: SecretString) -> Result<Self> {
        let http = Client::builder()
            .timeout(std::time::Duration::from_secs(cfg.timeout_secs))
            .user_agent("OVERSCAN/0.1.0")
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            user,
            token,
            days_ahead: cfg.schedule_days_ahead,
            per_page: cfg.per_page,
        })
    }
}

#[async_trait]
impl FixtureSource for SoccersApiClient {
    async fn fetch_events(&self) -> Result<Value, ScanError> {
        let today = Utc::now().date_naive();
        let until = today
            .checked_add_days(Days::new(self.days_ahead))
            .unwrap_or(today);

        let url = format!("{}/events/", self.base_url);
        let params: Vec<(&str, String)> = vec![
            ("user", self.user.clone()),
            ("token", self.token.expose_secret().to_string()),
            ("t", "schedule".to_string()),
            ("from", today.format("%Y-%m-%d").to_string()),
            ("to", until.format("%Y-%m-%d").to_string()),
            ("per_page", self.per_page.to_string()),
        ];

        debug!(url = %url, from = %today, to = %until, "Fetching upstream schedule");

        let resp = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| ScanError::Upstream { message: format!("request failed: {e}") })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(ScanError::Upstream {
                message: format!("provider returned {status}: {body}"),
            });
        }

        resp.json::<Value>().await.map_err(|e| ScanError::Upstream {
            message: format!("unparsable response body: {e}"),
        })
    }

    fn name(&self) -> &str {
        "soccersapi"
    }

    fn is_configured(&self) -> bool {
        !self.user.is_empty() && !self.token.expose_secret().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
