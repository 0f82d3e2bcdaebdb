//! Episode catalog API
//!
//! The catalog endpoint returns a paginated JSON listing of episode
//! sessions for a series id. Only the first page is requested; longer
//! series are truncated, matching the upstream behavior.

use crate::core::reference::{ContentReference, EpisodeRef, RefKind};
use crate::platform::client::PaheClient;
use crate::platform::extract::{first_capture, Patterns};
use crate::utils::text::{decode_entities, strip_line_breaks};
use crate::Result;
use serde::Deserialize;
use tracing::{debug, info};

/// Raw catalog response; both fields are kept loose because the endpoint
/// degrades to nulls and mixed types under load.
#[derive(Debug, Deserialize)]
struct ReleaseResponse {
    #[serde(default)]
    total: serde_json::Value,
    #[serde(default)]
    data: serde_json::Value,
}

/// Human-readable metadata pulled off a reference page. Every field is
/// best-effort; a missing match leaves the field empty.
#[derive(Debug, Clone)]
pub enum LinkMetadata {
    Series {
        title: Option<String>,
        kind: Option<String>,
        episodes: Option<String>,
    },
    Episode {
        title: Option<String>,
        number: Option<String>,
    },
}

/// Catalog client bound to one host.
pub struct Catalog<'a> {
    client: &'a PaheClient,
    patterns: &'a Patterns,
    host: &'a str,
}

impl<'a> Catalog<'a> {
    pub fn new(client: &'a PaheClient, patterns: &'a Patterns, host: &'a str) -> Self {
        Self {
            client,
            patterns,
            host,
        }
    }

    fn release_url(&self, series_id: &str, page: u32) -> String {
        format!(
            "{}/api?m=release&id={}&sort=episode_asc&page={}",
            self.host, series_id, page
        )
    }

    /// List the episodes of a series in catalog order (ascending episode
    /// number). An absent or malformed `data` array yields an empty list;
    /// the caller decides whether that is fatal.
    pub async fn list_episodes(&self, series_id: &str, referer: &str) -> Result<Vec<EpisodeRef>> {
        let url = self.release_url(series_id, 1);
        let page = self.client.get_page(&url, referer).await?;
        let parsed: ReleaseResponse = serde_json::from_str(&page.body)?;

        let mut episodes = Vec::new();
        if let Some(entries) = parsed.data.as_array() {
            for entry in entries {
                if let Some(session) = entry.get("session").and_then(|v| v.as_str()) {
                    episodes.push(EpisodeRef {
                        session_id: session.to_string(),
                        page_url: format!("{}/play/{}/{}", self.host, series_id, session),
                    });
                }
            }
        }

        info!("Catalog returned {} episodes for {}", episodes.len(), series_id);
        Ok(episodes)
    }

    /// Total episode count reported by the catalog.
    pub async fn count_episodes(&self, series_id: &str, referer: &str) -> Result<u64> {
        let url = self.release_url(series_id, 1);
        let page = self.client.get_page(&url, referer).await?;
        let parsed: ReleaseResponse = serde_json::from_str(&page.body)?;
        Ok(parsed.total.as_u64().unwrap_or(0))
    }

    /// Fetch the reference page and extract display metadata.
    pub async fn fetch_metadata(&self, reference: &ContentReference) -> Result<LinkMetadata> {
        let page = self.client.get_page(&reference.url, &reference.url).await?;
        let body = strip_line_breaks(&page.body);

        let metadata = match reference.kind {
            RefKind::Series => LinkMetadata::Series {
                title: first_capture(&self.patterns.meta_title, &body).map(decode_entities),
                kind: first_capture(&self.patterns.meta_kind, &body).map(decode_entities),
                episodes: first_capture(&self.patterns.meta_episodes, &body).map(decode_entities),
            },
            RefKind::Episode => {
                let captures = self.patterns.meta_episode_title.captures(&body);
                LinkMetadata::Episode {
                    title: captures
                        .as_ref()
                        .and_then(|c| c.get(1))
                        .map(|g| decode_entities(g.as_str())),
                    number: captures
                        .as_ref()
                        .and_then(|c| c.get(2))
                        .map(|g| decode_entities(g.as_str())),
                }
            }
        };
        debug!("Extracted metadata: {:?}", metadata);
        Ok(metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResolveError;

    const SERIES_ID: &str = "4ef14572-88d8-1f54-3c24-c8ce71e9c47a";

    fn release_path() -> mockito::Matcher {
        mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("m".into(), "release".into()),
            mockito::Matcher::UrlEncoded("id".into(), SERIES_ID.into()),
            mockito::Matcher::UrlEncoded("page".into(), "1".into()),
        ])
    }

    #[tokio::test]
    async fn test_list_episodes_preserves_catalog_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api")
            .match_query(release_path())
            .with_status(200)
            .with_body(r#"{"total":3,"data":[{"session":"s-one"},{"session":"s-two"},{"session":"s-three"}]}"#)
            .create_async()
            .await;

        let client = PaheClient::new();
        let patterns = Patterns::new();
        let host = server.url();
        let catalog = Catalog::new(&client, &patterns, &host);
        let episodes = catalog.list_episodes(SERIES_ID, &host).await.unwrap();

        assert_eq!(episodes.len(), 3);
        assert_eq!(episodes[0].session_id, "s-one");
        assert_eq!(episodes[2].session_id, "s-three");
        assert_eq!(
            episodes[1].page_url,
            format!("{}/play/{}/s-two", host, SERIES_ID)
        );
    }

    #[tokio::test]
    async fn test_list_episodes_malformed_data_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api")
            .match_query(release_path())
            .with_status(200)
            .with_body(r#"{"total":0,"data":null}"#)
            .create_async()
            .await;

        let client = PaheClient::new();
        let patterns = Patterns::new();
        let host = server.url();
        let catalog = Catalog::new(&client, &patterns, &host);
        let episodes = catalog.list_episodes(SERIES_ID, &host).await.unwrap();
        assert!(episodes.is_empty());
    }

    #[tokio::test]
    async fn test_list_episodes_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api")
            .match_query(release_path())
            .with_status(503)
            .create_async()
            .await;

        let client = PaheClient::new();
        let patterns = Patterns::new();
        let host = server.url();
        let catalog = Catalog::new(&client, &patterns, &host);
        let err = catalog.list_episodes(SERIES_ID, &host).await.unwrap_err();
        assert!(matches!(err, ResolveError::Network { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_count_episodes_reads_total() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api")
            .match_query(release_path())
            .with_status(200)
            .with_body(r#"{"total":42,"data":[]}"#)
            .create_async()
            .await;

        let client = PaheClient::new();
        let patterns = Patterns::new();
        let host = server.url();
        let catalog = Catalog::new(&client, &patterns, &host);
        assert_eq!(catalog.count_episodes(SERIES_ID, &host).await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_fetch_series_metadata() {
        let mut server = mockito::Server::new_async().await;
        let body = concat!(
            r#"<div style="background:url(x)" title="Fullmetal &amp; Co"></div>"#,
            r#"<p>Type: <a href="/t" title="TV">TV</a></p>"#,
            r#"<p>Episode> 12</p>"#,
        );
        let path = format!("/anime/{}", SERIES_ID);
        let _mock = server
            .mock("GET", path.as_str())
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        let client = PaheClient::new();
        let patterns = Patterns::new();
        let host = server.url();
        let catalog = Catalog::new(&client, &patterns, &host);
        let reference =
            ContentReference::parse(&format!("{}/anime/{}", host, SERIES_ID)).unwrap();
        let metadata = catalog.fetch_metadata(&reference).await.unwrap();

        match metadata {
            LinkMetadata::Series { title, kind, .. } => {
                assert_eq!(title.as_deref(), Some("Fullmetal & Co"));
                assert_eq!(kind.as_deref(), Some("TV"));
            }
            other => panic!("expected series metadata, got {:?}", other),
        }
    }
}
