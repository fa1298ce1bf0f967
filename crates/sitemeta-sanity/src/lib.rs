//! # sitemeta-sanity
//!
//! Sanity content-store client for sitemeta: GROQ query execution and
//! image-reference resolution, plus a mock store for tests.

pub mod client;
pub mod image;
pub mod mock;

pub use client::{SanityClient, SanityConfig, METADATA_QUERY};
pub use mock::MockContentStore;
