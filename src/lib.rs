//! # pahe-resolve - AnimePahe link resolver
//!
//! Resolves AnimePahe series and episode pages into direct, downloadable
//! media URLs by walking the catalog API, the per-episode mirror listing
//! and the kwik mirror redirector.
//!
//! ## Features
//!
//! - Series and single-episode references
//! - Episode range selection
//! - Best-quality mirror selection with optional target resolution
//! - Packed-script deobfuscation of redirector pages
//! - Bounded retry against unreliable mirror pages
//!
//! ## Example
//!
//! ```rust,no_run
//! use pahe_resolve::{ContentReference, EpisodeSelection, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reference = ContentReference::parse(
//!         "https://animepahe.ru/anime/00000000-1111-2222-3333-444444444444",
//!     )?;
//!     let resolver = Resolver::new();
//!     let links = resolver.resolve(&reference, &EpisodeSelection::All).await?;
//!     for link in links {
//!         println!("{}", link.url);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod platform;
pub mod utils;

// Re-export main types
pub use crate::core::{
    ContentReference, DirectLink, EpisodeRef, EpisodeSelection, Resolver, ResolverConfig,
};
pub use error::ResolveError;

/// Result type alias for pahe-resolve operations
pub type Result<T> = std::result::Result<T, ResolveError>;
