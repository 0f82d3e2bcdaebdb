//! Core functionality for pahe-resolve

pub mod reference;
pub mod resolver;

pub use reference::*;
pub use resolver::*;
