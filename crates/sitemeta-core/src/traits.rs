//! Core traits for sitemeta abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::RawSiteMetadata;

// =============================================================================
// CONTENT STORE
// =============================================================================

/// Read-only contract against the external content store.
///
/// Implementations fetch the single site-metadata record and resolve
/// internal asset references into public URLs. The resolver depends only on
/// this trait, so tests swap in a mock store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the site-metadata record.
    ///
    /// `Ok(None)` means the record does not exist (not an error); `Err` is
    /// reserved for transport or decoding failures.
    async fn fetch_metadata(&self) -> Result<Option<RawSiteMetadata>>;

    /// Resolve an internal asset reference into a public URL.
    ///
    /// Returns `None` for malformed references so a bad reference degrades
    /// to a null field rather than leaking the raw reference downstream.
    fn image_url(&self, image_ref: &str) -> Option<String>;
}

// =============================================================================
// CACHE INVALIDATION
// =============================================================================

/// Broadcast tag-invalidation capability.
///
/// A tag names a coherent bucket of cached derived data. Invalidation is
/// idempotent and commutative: concurrent invalidations of the same tag need
/// no coordination, and redundant calls are safe.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    /// Invalidate every cached entry under the given tag.
    async fn invalidate(&self, tag: &str) -> Result<()>;
}
