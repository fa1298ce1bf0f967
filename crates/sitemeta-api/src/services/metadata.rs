//! Metadata resolution service.
//!
//! Fetches the raw site-metadata record from the content store, resolves
//! image references into public URLs, and exposes the normalized record.
//! Fail-open: every upstream failure collapses to the all-`None` record so
//! the synthesizer and page renderer always receive a well-formed structure.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use sitemeta_core::defaults::METADATA_TAG;
use sitemeta_core::{
    synthesize, ContentStore, PageMetadata, PageMetadataOverride, RawSiteMetadata, SiteMetadata,
};

use super::TagCache;

/// Resolves and caches the normalized site-metadata record.
#[derive(Clone)]
pub struct MetadataService {
    store: Arc<dyn ContentStore>,
    cache: TagCache,
}

impl MetadataService {
    pub fn new(store: Arc<dyn ContentStore>, cache: TagCache) -> Self {
        Self { store, cache }
    }

    /// Resolve the normalized site-metadata record. Never errors.
    ///
    /// Resolution order: cached record under the `"metadata"` tag, then a
    /// fresh content-store fetch. Fetch failures are logged and substituted
    /// with the empty record; failed fetches are not cached, so the next
    /// call retries upstream.
    pub async fn resolve(&self) -> SiteMetadata {
        if let Some(cached) = self.cache.get::<SiteMetadata>(METADATA_TAG).await {
            return cached;
        }

        let start = Instant::now();
        match self.store.fetch_metadata().await {
            Ok(Some(raw)) => {
                let resolved = self.normalize(raw);
                debug!(
                    subsystem = "api",
                    op = "resolve",
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Resolved site metadata"
                );
                self.cache.set(METADATA_TAG, &resolved).await;
                resolved
            }
            Ok(None) => {
                debug!(
                    subsystem = "api",
                    op = "resolve",
                    "No metadata record in content store, using empty record"
                );
                let empty = SiteMetadata::empty();
                self.cache.set(METADATA_TAG, &empty).await;
                empty
            }
            Err(e) => {
                warn!(
                    subsystem = "api",
                    op = "resolve",
                    error = %e,
                    "Metadata fetch failed, substituting empty record"
                );
                SiteMetadata::empty()
            }
        }
    }

    /// Resolve and synthesize the final page-metadata payload.
    pub async fn page_metadata(&self, overrides: Option<&PageMetadataOverride>) -> PageMetadata {
        let site = self.resolve().await;
        synthesize(&site, overrides)
    }

    /// Normalize the raw record: copy scalar fields through, exchange image
    /// references for resolved public URLs (or `None` when malformed).
    fn normalize(&self, raw: RawSiteMetadata) -> SiteMetadata {
        let resolve_image = |r: Option<String>| r.as_deref().and_then(|r| self.store.image_url(r));

        SiteMetadata {
            site_title: raw.site_title,
            site_description: raw.site_description,
            default_page_title: raw.default_page_title,
            default_page_description: raw.default_page_description,
            keywords: raw.keywords,
            canonical_url: raw.canonical_url,
            robots_index: raw.robots_index,
            robots_follow: raw.robots_follow,
            google_verification: raw.google_verification,
            site_publisher: raw.site_publisher,
            apple_mobile_web_app_title: raw.apple_mobile_web_app_title,
            site_author: raw.site_author,
            favicon: resolve_image(raw.favicon),
            favicon16: resolve_image(raw.favicon16),
            favicon32: resolve_image(raw.favicon32),
            apple_touch_icon: resolve_image(raw.apple_touch_icon),
            og_image: resolve_image(raw.og_image),
            og_image_alt: raw.og_image_alt,
            og_type: raw.og_type,
            og_site_name: raw.og_site_name,
            og_url: raw.og_url,
            og_locale: raw.og_locale,
            twitter_card: raw.twitter_card,
            twitter_site: raw.twitter_site,
            twitter_creator: raw.twitter_creator,
            twitter_image: resolve_image(raw.twitter_image),
            linked_in_url: raw.linked_in_url,
            facebook_url: raw.facebook_url,
            instagram_url: raw.instagram_url,
            youtube_url: raw.youtube_url,
        }
    }
}
