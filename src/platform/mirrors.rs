//! Mirror candidate extraction and quality selection
//!
//! An episode page lists several alternate hosting links, each labelled
//! with a fansub group and a resolution. Selection is deterministic: the
//! first candidate with the strictly highest parsed resolution wins, so
//! ties keep the earliest entry the page offered.

use crate::error::ResolveError;
use crate::platform::client::PaheClient;
use crate::platform::extract::Patterns;
use crate::utils::text::{decode_entities, strip_line_breaks};
use crate::Result;
use tracing::debug;

/// One alternate hosting link for an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorCandidate {
    /// Redirector page URL
    pub page_url: String,
    /// Display label, entity-decoded
    pub label: String,
    /// Resolution parsed from the label; 0 when the label carries none,
    /// which never beats a parsed value
    pub resolution: u32,
}

/// Parse the mirror candidates out of an episode page body.
pub fn parse_candidates(body: &str, patterns: &Patterns) -> Vec<MirrorCandidate> {
    let mut candidates = Vec::new();
    for captures in patterns.mirror_anchor.captures_iter(body) {
        let (Some(url), Some(label)) = (captures.get(1), captures.get(2)) else {
            continue;
        };
        let label = decode_entities(label.as_str());
        let resolution = patterns
            .resolution
            .captures(&label)
            .and_then(|c| c.get(1))
            .and_then(|g| g.as_str().parse().ok())
            .unwrap_or(0);
        candidates.push(MirrorCandidate {
            page_url: decode_entities(url.as_str()),
            label,
            resolution,
        });
    }
    candidates
}

/// Index of the best candidate: a left-to-right scan keeping the first
/// strictly greater resolution. Returns `None` only for an empty list.
pub fn select_best(candidates: &[MirrorCandidate]) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    let mut best = 0;
    for (index, candidate) in candidates.iter().enumerate().skip(1) {
        if candidate.resolution > candidates[best].resolution {
            best = index;
        }
    }
    Some(best)
}

/// Index of the earliest candidate matching `target` exactly, falling
/// back to the best available when nothing matches.
pub fn select_with_target(candidates: &[MirrorCandidate], target: Option<u32>) -> Option<usize> {
    if let Some(resolution) = target {
        if let Some(index) = candidates.iter().position(|c| c.resolution == resolution) {
            return Some(index);
        }
    }
    select_best(candidates)
}

/// Quality selector bound to a client and pattern set.
pub struct QualitySelector<'a> {
    client: &'a PaheClient,
    patterns: &'a Patterns,
    target: Option<u32>,
}

impl<'a> QualitySelector<'a> {
    pub fn new(client: &'a PaheClient, patterns: &'a Patterns, target: Option<u32>) -> Self {
        Self {
            client,
            patterns,
            target,
        }
    }

    /// Fetch the episode page and pick its best mirror candidate.
    pub async fn select(&self, episode_page_url: &str) -> Result<MirrorCandidate> {
        let page = self
            .client
            .get_page(episode_page_url, episode_page_url)
            .await?;
        let body = strip_line_breaks(&page.body);
        let candidates = parse_candidates(&body, self.patterns);
        debug!(
            "Found {} mirror candidates on {}",
            candidates.len(),
            episode_page_url
        );

        let index = select_with_target(&candidates, self.target)
            .ok_or_else(|| ResolveError::NoCandidates(episode_page_url.to_string()))?;
        Ok(candidates[index].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(resolution: u32) -> MirrorCandidate {
        MirrorCandidate {
            page_url: format!("https://pahe.win/{}", resolution),
            label: format!("Group · {}p", resolution),
            resolution,
        }
    }

    #[test]
    fn test_select_best_keeps_first_of_tied_resolutions() {
        let candidates = vec![
            candidate(480),
            candidate(720),
            candidate(720),
            candidate(360),
        ];
        assert_eq!(select_best(&candidates), Some(1));
    }

    #[test]
    fn test_select_best_empty_list() {
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn test_select_best_all_unlabelled_keeps_first() {
        let candidates = vec![candidate(0), candidate(0), candidate(0)];
        assert_eq!(select_best(&candidates), Some(0));
    }

    #[test]
    fn test_unlabelled_never_beats_parsed_resolution() {
        let candidates = vec![candidate(360), candidate(0)];
        assert_eq!(select_best(&candidates), Some(0));
    }

    #[test]
    fn test_select_with_target_prefers_exact_match() {
        let candidates = vec![candidate(1080), candidate(720), candidate(360)];
        assert_eq!(select_with_target(&candidates, Some(720)), Some(1));
    }

    #[test]
    fn test_select_with_target_falls_back_to_best() {
        let candidates = vec![candidate(480), candidate(720)];
        assert_eq!(select_with_target(&candidates, Some(1080)), Some(1));
        assert_eq!(select_with_target(&candidates, None), Some(1));
    }

    #[test]
    fn test_parse_candidates_from_listing() {
        let patterns = Patterns::new();
        let body = concat!(
            r#"<a href="https://pahe.win/aaa" class="dropdown-item">SubsPlease &middot; 360p (80MB)</a>"#,
            r#"<a href="https://pahe.win/bbb" class="dropdown-item">SubsPlease &middot; 720p (140MB)</a>"#,
            r#"<a href="https://pahe.win/ccc" class="dropdown-item">SubsPlease (raw)</a>"#,
        );

        let candidates = parse_candidates(body, &patterns);
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].resolution, 360);
        assert_eq!(candidates[0].label, "SubsPlease · 360p (80MB)");
        assert_eq!(candidates[1].page_url, "https://pahe.win/bbb");
        assert_eq!(candidates[1].resolution, 720);
        // No resolution token in the label
        assert_eq!(candidates[2].resolution, 0);
        assert_eq!(select_best(&candidates), Some(1));
    }

    #[tokio::test]
    async fn test_select_no_candidates_is_hard_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/play/abc/def")
            .with_status(200)
            .with_body("<html><body>nothing here</body></html>")
            .create_async()
            .await;

        let client = PaheClient::new();
        let patterns = Patterns::new();
        let selector = QualitySelector::new(&client, &patterns, None);
        let url = format!("{}/play/abc/def", server.url());
        let err = selector.select(&url).await.unwrap_err();
        assert!(matches!(err, ResolveError::NoCandidates(at) if at == url));
    }
}
