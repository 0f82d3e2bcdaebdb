//! Upstream site integration: catalog API, mirror listings, redirector
//! deobfuscation and the HTTP client they share

pub mod catalog;
pub mod cipher;
pub mod client;
pub mod extract;
pub mod mirrors;
pub mod redirect;

pub use catalog::{Catalog, LinkMetadata};
pub use cipher::{decode_digits, decode_packed, Decoded, ObfuscationQuad};
pub use client::{HttpConfig, PageResponse, PaheClient};
pub use extract::Patterns;
pub use mirrors::{MirrorCandidate, QualitySelector};
pub use redirect::{RedirectResolver, ResolvedToken};
