//! Targeted pattern extraction from raw page text
//!
//! The upstream pages are never parsed as full documents; every field the
//! resolver needs is pulled out with a narrow pattern match against the
//! raw (line-break-stripped) page text.

use regex::Regex;

/// Compiled patterns for every extraction the resolver performs.
///
/// Defaults target the production hosts. Each field is public so callers
/// can substitute patterns, which also lets tests point the resolver at a
/// local server.
#[derive(Debug, Clone)]
pub struct Patterns {
    /// Mirror listing anchor: captures (mirror page url, label)
    pub mirror_anchor: Regex,
    /// Resolution token inside a mirror label, e.g. "720p"
    pub resolution: Regex,
    /// Plaintext mirror-host URL embedded in a redirector page
    pub mirror_host: Regex,
    /// CSRF token hidden input inside the (decoded) redirector form
    pub token: Regex,
    /// Session cookie value in a Set-Cookie header
    pub session_cookie: Regex,
    /// Packed-script argument list: captures (cipher, alphabet, offset, base)
    pub packed_args: Regex,
    /// Download-page path prefix rewritten to the form-page prefix
    pub host_rewrite: Regex,
    /// Series page title attribute
    pub meta_title: Regex,
    /// Series page type row
    pub meta_kind: Regex,
    /// Series page episode counter
    pub meta_episodes: Regex,
    /// Episode page title and number
    pub meta_episode_title: Regex,
}

impl Patterns {
    pub fn new() -> Self {
        Self {
            mirror_anchor: Regex::new(r#"href="(https://pahe\.win/\S*)"[^>]*>([^)]*\))[^<]*<"#)
                .expect("valid mirror anchor pattern"),
            resolution: Regex::new(r"\b(\d{3,4})p\b").expect("valid resolution pattern"),
            mirror_host: Regex::new(r#""(https?://kwik\.[^/\s"]+/[^/\s"]+/[^"\s]*)""#)
                .expect("valid mirror host pattern"),
            token: Regex::new(r#"name="_token"[^"]*"(\S*)">"#).expect("valid token pattern"),
            session_cookie: Regex::new(r"kwik_session=([^;]*)").expect("valid cookie pattern"),
            packed_args: Regex::new(
                r#"\(\s*"([^",]*)"\s*,\s*\d+\s*,\s*"([^",]*)"\s*,\s*(\d+)\s*,\s*(\d+)\s*,\s*\d+[a-zA-Z]?\s*\)"#,
            )
            .expect("valid packed args pattern"),
            host_rewrite: Regex::new(r"(https?://kwik\.[^/]+/)d/").expect("valid rewrite pattern"),
            meta_title: Regex::new(r#"style=[^=]+title="([^"]+)""#).expect("valid title pattern"),
            meta_kind: Regex::new(r#"Type:[^>]*title="[^"]*"[^>]*>([^<]+)</a>"#)
                .expect("valid kind pattern"),
            meta_episodes: Regex::new(r"Episode[^>]*>\s+(\d*)</p").expect("valid episodes pattern"),
            meta_episode_title: Regex::new(r#"title="[^>]*>([^<]*)</a>\D*(\d*)<span"#)
                .expect("valid episode title pattern"),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Return the first capture group of the first match, if any.
pub fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_anchor_captures_url_and_label() {
        let patterns = Patterns::new();
        let body = r#"<a href="https://pahe.win/xYz12" class="dropdown-item">SubsPlease &middot; 720p (140MB)</a>"#;
        let captures = patterns.mirror_anchor.captures(body).unwrap();
        assert_eq!(captures.get(1).unwrap().as_str(), "https://pahe.win/xYz12");
        assert_eq!(
            captures.get(2).unwrap().as_str(),
            "SubsPlease &middot; 720p (140MB)"
        );
    }

    #[test]
    fn test_resolution_needs_three_or_four_digits() {
        let patterns = Patterns::new();
        assert_eq!(first_capture(&patterns.resolution, "x 1080p y"), Some("1080"));
        assert_eq!(first_capture(&patterns.resolution, "x 720p y"), Some("720"));
        assert_eq!(first_capture(&patterns.resolution, "x 72p y"), None);
        assert_eq!(first_capture(&patterns.resolution, "x 10800p y"), None);
    }

    #[test]
    fn test_mirror_host_requires_quoted_url() {
        let patterns = Patterns::new();
        let body = r#"var u = "https://kwik.cx/f/AbC123";"#;
        assert_eq!(
            first_capture(&patterns.mirror_host, body),
            Some("https://kwik.cx/f/AbC123")
        );
        assert_eq!(first_capture(&patterns.mirror_host, "https://kwik.cx/f/x"), None);
    }

    #[test]
    fn test_token_pattern() {
        let patterns = Patterns::new();
        let body = r#"<input type="hidden" name="_token" value="SeCrEt42">"#;
        assert_eq!(first_capture(&patterns.token, body), Some("SeCrEt42"));
    }

    #[test]
    fn test_session_cookie_pattern() {
        let patterns = Patterns::new();
        let header = "kwik_session=eyJpdiI6abc123; expires=Sat, 23 Aug 2025; path=/";
        assert_eq!(
            first_capture(&patterns.session_cookie, header),
            Some("eyJpdiI6abc123")
        );
    }

    #[test]
    fn test_host_rewrite_targets_download_prefix() {
        let patterns = Patterns::new();
        let rewritten = patterns
            .host_rewrite
            .replace("https://kwik.cx/d/AbC123", "${1}f/");
        assert_eq!(rewritten, "https://kwik.cx/f/AbC123");
    }
}
