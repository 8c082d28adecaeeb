use anyhow::{Context, Result};
use std::time::Duration;

/// Per-request timeout applied to every provider call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/104.0.0.0 Safari/537.36";

/// Transport settings shared by all providers.
#[derive(Debug, Clone, Default)]
pub struct HttpSettings {
    /// Optional outbound proxy URL, e.g. `http://127.0.0.1:8080`.
    pub proxy: Option<String>,
}

impl HttpSettings {
    pub fn with_proxy(proxy: Option<String>) -> Self {
        Self { proxy }
    }
}

/// Builds the HTTP client used by a provider: fixed request timeout,
/// browser user agent, and the configured proxy if any.
pub fn build_client(settings: &HttpSettings) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT);

    if let Some(proxy_url) = &settings.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .with_context(|| format!("Invalid proxy URL: {proxy_url}"))?;
        builder = builder.proxy(proxy);
    }

    builder.build().context("Failed to build HTTP client")
}
