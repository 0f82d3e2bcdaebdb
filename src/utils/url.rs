//! URL shape validation and opaque id extraction
//!
//! Two reference shapes are accepted, and both are checked before any
//! network call: a series page carrying a 36-character hex-with-dashes id,
//! and an episode page carrying that id plus a 64-character session id.

use regex::Regex;
use url::Url;

fn series_pattern() -> Regex {
    Regex::new(r"^https?://[^/]+/anime/([a-f0-9-]{36})$").expect("valid series url pattern")
}

fn episode_pattern() -> Regex {
    Regex::new(r"^https?://[^/]+/play/([a-f0-9-]{36})/([a-f0-9]{64})$")
        .expect("valid episode url pattern")
}

/// Check if the URL names a full series.
pub fn is_series_url(url: &str) -> bool {
    Url::parse(url).is_ok() && series_pattern().is_match(url)
}

/// Check if the URL names a single episode.
pub fn is_episode_url(url: &str) -> bool {
    Url::parse(url).is_ok() && episode_pattern().is_match(url)
}

/// Extract the opaque series id from a series URL.
pub fn extract_series_id(url: &str) -> Option<String> {
    series_pattern()
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str().to_string())
}

/// Extract the (series id, session id) pair from an episode URL.
pub fn extract_episode_ids(url: &str) -> Option<(String, String)> {
    let captures = episode_pattern().captures(url)?;
    Some((
        captures.get(1)?.as_str().to_string(),
        captures.get(2)?.as_str().to_string(),
    ))
}

/// Base URL (scheme + host) of a reference, without a trailing slash.
pub fn base_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    match parsed.port() {
        Some(port) => Some(format!("{}://{}:{}", parsed.scheme(), host, port)),
        None => Some(format!("{}://{}", parsed.scheme(), host)),
    }
}
