//! Content references and episode selection

use crate::error::ResolveError;
use crate::utils::url::{base_url, extract_episode_ids, extract_series_id};
use crate::Result;
use std::fmt;
use std::str::FromStr;

/// What a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Series,
    Episode,
}

/// A validated reference to a series or episode page. Derived once from
/// user input, before any network call, and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentReference {
    pub kind: RefKind,
    /// 36-character hex-with-dashes series id
    pub opaque_id: String,
    pub url: String,
}

impl ContentReference {
    /// Parse and validate a reference URL. Anything that is not exactly a
    /// series or episode page shape is rejected.
    pub fn parse(url: &str) -> Result<Self> {
        if let Some(id) = extract_series_id(url) {
            return Ok(Self {
                kind: RefKind::Series,
                opaque_id: id,
                url: url.to_string(),
            });
        }
        if let Some((id, _session)) = extract_episode_ids(url) {
            return Ok(Self {
                kind: RefKind::Episode,
                opaque_id: id,
                url: url.to_string(),
            });
        }
        Err(ResolveError::InvalidUrl(url.to_string()))
    }

    /// Scheme + host of the reference, used as the catalog base URL.
    pub fn host(&self) -> Result<String> {
        base_url(&self.url).ok_or_else(|| ResolveError::InvalidUrl(self.url.clone()))
    }

    /// Session id for an episode reference.
    pub fn session_id(&self) -> Option<String> {
        extract_episode_ids(&self.url).map(|(_, session)| session)
    }
}

/// One episode as the catalog lists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRef {
    pub session_id: String,
    pub page_url: String,
}

/// Which episodes of a series to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EpisodeSelection {
    All,
    /// 1-based inclusive range
    Range { start: u32, end: u32 },
}

impl EpisodeSelection {
    /// Parse `"all"` or `"<start>-<end>"` with `start >= 1`, `end > start`.
    pub fn parse(input: &str) -> Result<Self> {
        if input == "all" {
            return Ok(Self::All);
        }

        let invalid = || ResolveError::InvalidRange(input.to_string());
        let (start, end) = input.split_once('-').ok_or_else(invalid)?;
        let start: u32 = start.parse().map_err(|_| invalid())?;
        let end: u32 = end.parse().map_err(|_| invalid())?;
        if start < 1 || end <= start {
            return Err(invalid());
        }
        Ok(Self::Range { start, end })
    }

    /// Check an explicit range against the catalog size.
    pub fn validate_against(&self, total: usize) -> Result<()> {
        if let Self::Range { start, end } = *self {
            if start as usize > total || end as usize > total {
                return Err(ResolveError::RangeOutOfBounds {
                    start,
                    end,
                    total: total as u32,
                });
            }
        }
        Ok(())
    }

    /// Check whether a 1-based episode index is selected.
    pub fn contains(&self, index: usize) -> bool {
        match *self {
            Self::All => true,
            Self::Range { start, end } => index >= start as usize && index <= end as usize,
        }
    }
}

impl FromStr for EpisodeSelection {
    type Err = ResolveError;

    fn from_str(input: &str) -> Result<Self> {
        Self::parse(input)
    }
}

impl fmt::Display for EpisodeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Range { start, end } => write!(f, "{}-{}", start, end),
        }
    }
}
