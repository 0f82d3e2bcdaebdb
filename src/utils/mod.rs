//! Utility functions for pahe-resolve

pub mod export;
pub mod text;
pub mod url;

pub use export::*;
pub use text::*;
pub use url::*;
