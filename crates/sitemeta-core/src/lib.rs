//! # sitemeta-core
//!
//! Core types, traits, and abstractions for the sitemeta service.
//!
//! This crate provides the normalized site-metadata data model, the pure
//! page-metadata synthesizer, and the trait definitions the other sitemeta
//! crates depend on.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod page;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::{
    IconLink, IconSet, OgImage, OpenGraphBlock, PageMetadata, PageMetadataOverride,
    RawSiteMetadata, RobotsDirective, SiteMetadata, TwitterBlock,
};
pub use page::{render_robots_txt, synthesize};
pub use traits::{CacheInvalidator, ContentStore};
