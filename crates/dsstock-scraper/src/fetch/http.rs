use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;

use super::Fetch;
use crate::error::FetchError;

pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl FetchSettings {
    #[must_use]
    pub fn from_app_config(config: &dsstock_core::AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Single-attempt HTTP fetcher presenting a desktop browser identity.
///
/// Certificate validation is disabled: several storefronts serve chains the
/// client environment cannot verify.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid header value or TLS backend).
    pub fn new(settings: &FetchSettings) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| classify(e, url))?;
        // Storefronts occasionally mix encodings; keep what decodes.
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn classify(err: reqwest::Error, url: &str) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout {
            url: url.to_owned(),
        }
    } else {
        FetchError::Http(err)
    }
}
