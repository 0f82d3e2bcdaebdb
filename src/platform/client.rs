//! HTTP client for catalog, listing and redirector requests

use crate::error::ResolveError;
use crate::utils::text::sanitize_utf8;
use crate::Result;
use reqwest::header::{HeaderMap, ACCEPT, ACCEPT_LANGUAGE, COOKIE, REFERER, USER_AGENT};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::debug;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36 Edg/138.0.0.0";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
    /// Cookie sent with catalog and listing requests, passed explicitly
    /// rather than held in ambient state
    pub site_cookie: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            // DDoS-guard bypass cookie expected by the catalog host
            site_cookie: "__ddg2_=".to_string(),
        }
    }
}

/// One fetched page: status, decoded body and raw response headers.
#[derive(Debug)]
pub struct PageResponse {
    pub status: u16,
    pub body: String,
    pub headers: HeaderMap,
}

/// HTTP client wrapper carrying one redirect-following client for page
/// fetches and one redirect-disabled client for the token POST.
pub struct PaheClient {
    client: Client,
    no_redirect: Client,
    config: HttpConfig,
}

impl PaheClient {
    /// Create a client with default configuration
    pub fn new() -> Self {
        Self::with_config(HttpConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: HttpConfig) -> Self {
        let client = ClientBuilder::new()
            .timeout(config.timeout)
            .gzip(true)
            .brotli(true)
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to build HTTP client");

        let no_redirect = ClientBuilder::new()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(config.user_agent.clone())
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            no_redirect,
            config,
        }
    }

    /// Fetch a catalog or listing page with the site headers and cookie.
    /// Non-success status is a hard failure carrying URL and status.
    pub async fn get_page(&self, url: &str, referer: &str) -> Result<PageResponse> {
        debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json, text/javascript, */*; q=0.0")
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .header(REFERER, referer)
            .header(COOKIE, self.config.site_cookie.clone())
            .send()
            .await?;
        self.read_checked(url, response).await
    }

    /// Fetch a mirror redirector page with no site headers attached.
    pub async fn get_raw(&self, url: &str) -> Result<PageResponse> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        self.read_checked(url, response).await
    }

    /// Send a form-encoded POST with redirects disabled. The status is
    /// returned unchecked so callers can treat 302 as success.
    pub async fn post_form_no_redirect(
        &self,
        url: &str,
        referer: &str,
        cookie: &str,
        form: &[(&str, &str)],
    ) -> Result<PageResponse> {
        debug!("POST {}", url);
        let response = self
            .no_redirect
            .post(url)
            .header(REFERER, referer)
            .header(COOKIE, cookie)
            .header(USER_AGENT, self.config.user_agent.clone())
            .form(form)
            .send()
            .await?;
        self.read_unchecked(response).await
    }

    async fn read_checked(&self, url: &str, response: reqwest::Response) -> Result<PageResponse> {
        let page = self.read_unchecked(response).await?;
        if !(200..300).contains(&page.status) {
            return Err(ResolveError::Network {
                url: url.to_string(),
                status: page.status,
            });
        }
        Ok(page)
    }

    async fn read_unchecked(&self, response: reqwest::Response) -> Result<PageResponse> {
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let bytes = response.bytes().await?;
        Ok(PageResponse {
            status,
            // Upstream bodies occasionally carry broken multi-byte
            // sequences; drop them instead of failing the fetch
            body: sanitize_utf8(&bytes),
            headers,
        })
    }
}

impl Default for PaheClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan Set-Cookie headers for a cookie value using the given pattern.
pub fn extract_set_cookie(headers: &HeaderMap, pattern: &regex::Regex) -> Option<String> {
    headers
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| {
            pattern
                .captures(value)
                .and_then(|captures| captures.get(1))
                .map(|group| group.as_str().to_string())
        })
}
