//! Resolution pipeline orchestration
//!
//! Sequences the stages end to end: discover episodes through the
//! catalog, validate the requested range, then per episode pick the best
//! mirror and resolve its redirector. Episodes are processed strictly in
//! catalog order and any stage failure aborts the whole run; no link is
//! ever silently skipped.

use crate::core::reference::{ContentReference, EpisodeRef, EpisodeSelection, RefKind};
use crate::platform::catalog::{Catalog, LinkMetadata};
use crate::platform::client::{HttpConfig, PaheClient};
use crate::platform::extract::Patterns;
use crate::platform::mirrors::QualitySelector;
use crate::platform::redirect::{RedirectResolver, DEFAULT_RETRIES};
use crate::Result;
use std::time::Duration;
use tracing::info;

/// One resolved direct-download URL, in episode order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectLink {
    pub url: String,
}

/// Resolver configuration
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Request timeout
    pub timeout: Duration,
    /// Fetch attempts per mirror page
    pub retries: u32,
    /// Preferred resolution; best available when unset or unavailable
    pub quality: Option<u32>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: DEFAULT_RETRIES,
            quality: None,
        }
    }
}

/// The resolution pipeline.
pub struct Resolver {
    config: ResolverConfig,
    patterns: Patterns,
    client: PaheClient,
}

impl Resolver {
    /// Create a resolver with default configuration
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a resolver with custom configuration
    pub fn with_config(config: ResolverConfig) -> Self {
        let client = PaheClient::with_config(HttpConfig {
            timeout: config.timeout,
            ..HttpConfig::default()
        });
        Self {
            config,
            patterns: Patterns::new(),
            client,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self.client = PaheClient::with_config(HttpConfig {
            timeout,
            ..HttpConfig::default()
        });
        self
    }

    /// Set the per-page retry budget
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the preferred resolution
    pub fn with_quality(mut self, quality: u32) -> Self {
        self.config.quality = Some(quality);
        self
    }

    /// Substitute the extraction patterns
    pub fn with_patterns(mut self, patterns: Patterns) -> Self {
        self.patterns = patterns;
        self
    }

    /// Fetch display metadata for a reference.
    pub async fn fetch_metadata(&self, reference: &ContentReference) -> Result<LinkMetadata> {
        let host = reference.host()?;
        Catalog::new(&self.client, &self.patterns, &host)
            .fetch_metadata(reference)
            .await
    }

    /// Discover the episodes a run will process, in catalog order.
    pub async fn discover_episodes(
        &self,
        reference: &ContentReference,
        selection: &EpisodeSelection,
    ) -> Result<Vec<EpisodeRef>> {
        match reference.kind {
            RefKind::Series => {
                let host = reference.host()?;
                let catalog = Catalog::new(&self.client, &self.patterns, &host);
                let episodes = catalog
                    .list_episodes(&reference.opaque_id, &reference.url)
                    .await?;

                selection.validate_against(episodes.len())?;
                Ok(episodes
                    .into_iter()
                    .enumerate()
                    .filter(|(index, _)| selection.contains(index + 1))
                    .map(|(_, episode)| episode)
                    .collect())
            }
            RefKind::Episode => {
                // A single-episode reference is its own one-entry listing
                let session_id = reference
                    .session_id()
                    .ok_or_else(|| crate::error::ResolveError::InvalidUrl(reference.url.clone()))?;
                Ok(vec![EpisodeRef {
                    session_id,
                    page_url: reference.url.clone(),
                }])
            }
        }
    }

    /// Resolve a reference into direct links, one per selected episode.
    pub async fn resolve(
        &self,
        reference: &ContentReference,
        selection: &EpisodeSelection,
    ) -> Result<Vec<DirectLink>> {
        let episodes = self.discover_episodes(reference, selection).await?;
        info!("Resolving {} episodes", episodes.len());

        let selector = QualitySelector::new(&self.client, &self.patterns, self.config.quality);
        let redirect = RedirectResolver::new(&self.client, &self.patterns, self.config.retries);

        let mut links = Vec::with_capacity(episodes.len());
        for (index, episode) in episodes.iter().enumerate() {
            info!(
                "Episode {}/{}: {}",
                index + 1,
                episodes.len(),
                episode.page_url
            );
            let candidate = selector.select(&episode.page_url).await?;
            info!(
                "Selected mirror: {} ({}p)",
                candidate.label, candidate.resolution
            );
            let direct = redirect.resolve(&candidate.page_url).await?;
            links.push(DirectLink { url: direct });
        }

        Ok(links)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
