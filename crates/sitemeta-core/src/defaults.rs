//! Centralized default constants for the sitemeta system.
//!
//! **This module is the single source of truth** for all shared default values.
//! All crates should reference these constants instead of defining their own
//! magic strings.

// =============================================================================
// SITE FALLBACKS
// =============================================================================

/// Hard application fallback when no title is available from any source.
pub const FALLBACK_TITLE: &str = "EasyLift Doors";

/// Hard application fallback when no description is available from any source.
pub const FALLBACK_DESCRIPTION: &str = "Professional garage door services in Canada";

/// Fallback canonical domain when the content store carries no URL.
pub const FALLBACK_CANONICAL_URL: &str = "https://easyliftdoors.com";

/// Fallback favicon path for the 16x16 and 32x32 icon slots.
pub const FALLBACK_FAVICON: &str = "/favicon.ico";

// =============================================================================
// OPEN GRAPH / TWITTER DEFAULTS
// =============================================================================

/// Default Open Graph object type.
pub const OG_TYPE: &str = "website";

/// Default Open Graph locale for this deployment.
pub const OG_LOCALE: &str = "en_CA";

/// Default Twitter card type.
pub const TWITTER_CARD: &str = "summary_large_image";

// =============================================================================
// CACHE
// =============================================================================

/// The single cache tag naming the derived site-metadata bucket.
pub const METADATA_TAG: &str = "metadata";

/// Default cache TTL in seconds.
pub const CACHE_TTL_SECS: u64 = 300;

// =============================================================================
// CONTENT STORE
// =============================================================================

/// Default Sanity API version (date-pinned).
pub const SANITY_API_VERSION: &str = "v2024-01-01";

/// Default Sanity dataset name.
pub const SANITY_DATASET: &str = "production";

/// Default timeout for content-store queries (seconds).
pub const FETCH_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Maximum accepted webhook body size in bytes.
pub const MAX_BODY_BYTES: usize = 256 * 1024;
