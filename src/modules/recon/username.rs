use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::{
    config::AppConfig,
    core::{
        catalog::{PlatformEntry, PLACEHOLDER},
        error::FinderError,
        types::ProbeResult,
    },
};

/// One existence check of a username on one platform.
///
/// Implementations must be total: every failure is folded into
/// `found = false` and never surfaces to the dispatcher.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, entry: &PlatformEntry, username: &str) -> ProbeResult;
}

/// Substitute the form-encoded username into a platform template.
pub fn build_url(template: &str, username: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(username.as_bytes()).collect();
    template.replacen(PLACEHOLDER, &encoded, 1)
}

pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, FinderError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(FinderError::from)?;
        Ok(Self { client })
    }

    pub fn from_config(cfg: &AppConfig) -> Result<Self, FinderError> {
        Self::new(&cfg.user_agent, Duration::from_millis(cfg.timeout_ms))
    }

    async fn status(&self, url: &str) -> Result<StatusCode, FinderError> {
        Ok(self.client.get(url).send().await?.status())
    }
}

#[async_trait]
impl Probe for HttpProber {
    async fn probe(&self, entry: &PlatformEntry, username: &str) -> ProbeResult {
        let url = build_url(&entry.template, username);
        let found = match self.status(&url).await {
            Ok(status) => {
                tracing::debug!("{} -> {}", url, status);
                status == StatusCode::OK
            }
            Err(err) => {
                tracing::debug!("{} probe failed: {}", entry.name, err);
                false
            }
        };
        ProbeResult::new(entry.name.clone(), url, found)
    }
}
