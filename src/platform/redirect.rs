//! Mirror redirector resolution
//!
//! A redirector page hides the real file-hosting URL either in plain text
//! or inside a packed script fragment. Reaching the direct link takes two
//! steps: recover the mirror URL plus its CSRF token from the page, then
//! POST the token with the session cookie attached and read the redirect
//! target. Upstream pages intermittently serve bodies without the token,
//! so extraction runs in a bounded retry loop; the POST itself is never
//! retried.

use crate::error::ResolveError;
use crate::platform::cipher::ObfuscationQuad;
use crate::platform::client::{extract_set_cookie, PaheClient};
use crate::platform::extract::{first_capture, Patterns};
use crate::utils::text::strip_line_breaks;
use crate::Result;
use tracing::{debug, warn};

/// Default fetch attempts per mirror page.
pub const DEFAULT_RETRIES: u32 = 4;

/// Everything required for the token-authenticated redirect request,
/// extracted together from one page fetch and consumed exactly once.
#[derive(Debug, Clone)]
pub struct ResolvedToken {
    pub mirror_url: String,
    pub csrf_token: String,
    pub session_cookie: String,
}

/// Redirect resolver bound to a client and pattern set.
pub struct RedirectResolver<'a> {
    client: &'a PaheClient,
    patterns: &'a Patterns,
    retries: u32,
}

impl<'a> RedirectResolver<'a> {
    pub fn new(client: &'a PaheClient, patterns: &'a Patterns, retries: u32) -> Self {
        Self {
            client,
            patterns,
            retries: retries.max(1),
        }
    }

    /// Resolve a mirror redirector page into the final direct-download URL.
    pub async fn resolve(&self, page_url: &str) -> Result<String> {
        let token = self.obtain_token(page_url).await?;
        self.follow_redirect(&token).await
    }

    /// Fetch the page and extract the mirror URL, token and session
    /// cookie, re-fetching up to the attempt budget when the expected
    /// patterns are missing. Network failures are not retried.
    async fn obtain_token(&self, page_url: &str) -> Result<ResolvedToken> {
        let mut last_error = String::new();

        for attempt in 1..=self.retries {
            debug!("Attempt {}/{} for {}", attempt, self.retries, page_url);
            match self.try_extract(page_url).await {
                Ok(token) => return Ok(token),
                Err(error) if error.is_retryable() => {
                    warn!("Attempt {} on {} failed: {}", attempt, page_url, error);
                    last_error = error.to_string();
                }
                Err(error) => return Err(error),
            }
        }

        Err(ResolveError::RetryExhausted {
            url: page_url.to_string(),
            attempts: self.retries,
            last_error,
        })
    }

    async fn try_extract(&self, page_url: &str) -> Result<ResolvedToken> {
        let page = self.client.get_raw(page_url).await?;
        let body = strip_line_breaks(&page.body);

        // The session cookie rides on the raw response headers either way
        let session_cookie =
            extract_set_cookie(&page.headers, &self.patterns.session_cookie).unwrap_or_default();

        // Plain pages embed the mirror URL and token directly
        let (mirror_url, csrf_token) = match first_capture(&self.patterns.mirror_host, &body) {
            Some(url) => (
                Some(url.to_string()),
                first_capture(&self.patterns.token, &body).map(str::to_string),
            ),
            None => self.extract_from_packed(&body)?,
        };

        match (mirror_url, csrf_token) {
            (Some(mirror_url), Some(csrf_token)) => Ok(ResolvedToken {
                mirror_url,
                csrf_token,
                session_cookie,
            }),
            (None, _) => Err(ResolveError::ParseError(format!(
                "no mirror URL on {}",
                page_url
            ))),
            (_, None) => Err(ResolveError::ParseError(format!(
                "no token on {}",
                page_url
            ))),
        }
    }

    /// Decode the packed payload and pull the mirror URL and token out of
    /// the reconstructed script fragment. A page with no payload at all
    /// simply yields nothing; the caller decides whether to retry.
    fn extract_from_packed(&self, body: &str) -> Result<(Option<String>, Option<String>)> {
        let Some(quad) = ObfuscationQuad::from_page(body, &self.patterns.packed_args) else {
            return Ok((None, None));
        };
        debug!(
            "Found packed payload: alphabet {} offset {} base {}",
            quad.alphabet_key, quad.offset, quad.source_base
        );

        let plaintext = quad.decode()?;
        let mirror_url = first_capture(&self.patterns.mirror_host, &plaintext).map(|url| {
            // Decoded pages link the download path; the form lives at /f/
            self.patterns
                .host_rewrite
                .replace(url, "${1}f/")
                .into_owned()
        });
        let csrf_token = first_capture(&self.patterns.token, &plaintext).map(str::to_string);
        Ok((mirror_url, csrf_token))
    }

    /// POST the token with the session cookie attached, redirects
    /// disabled, and read the direct link off the 302 Location header.
    async fn follow_redirect(&self, token: &ResolvedToken) -> Result<String> {
        let page = self
            .client
            .post_form_no_redirect(
                &token.mirror_url,
                &token.mirror_url,
                &format!("kwik_session={}", token.session_cookie),
                &[("_token", token.csrf_token.as_str())],
            )
            .await?;

        if page.status != 302 {
            return Err(ResolveError::Resolution(format!(
                "expected redirect from {}, got status {}",
                token.mirror_url, page.status
            )));
        }

        page.headers
            .get(reqwest::header::LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ResolveError::Resolution(format!(
                    "redirect from {} carries no Location header",
                    token.mirror_url
                ))
            })
    }
}
