//! Data model for site metadata: the raw content-store record, the
//! normalized record, per-page overrides, and the synthesized page payload.

use serde::{Deserialize, Serialize};

// =============================================================================
// RAW CONTENT-STORE RECORD
// =============================================================================

/// The site-metadata record exactly as projected from the content store.
///
/// Every field is independently optional. Image-type fields carry *raw*
/// content-store asset references (e.g. `image-abc123-512x512-png`), not
/// public URLs; the resolver exchanges them for CDN URLs before the record
/// leaves the fetch path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSiteMetadata {
    pub site_title: Option<String>,
    pub site_description: Option<String>,
    pub default_page_title: Option<String>,
    pub default_page_description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub canonical_url: Option<String>,
    pub robots_index: Option<bool>,
    pub robots_follow: Option<bool>,
    pub google_verification: Option<String>,
    pub site_publisher: Option<String>,
    pub apple_mobile_web_app_title: Option<String>,
    pub site_author: Option<String>,

    /// Raw asset reference, resolved to a URL by the resolver.
    pub favicon: Option<String>,
    pub favicon16: Option<String>,
    pub favicon32: Option<String>,
    pub apple_touch_icon: Option<String>,

    pub og_image: Option<String>,
    pub og_image_alt: Option<String>,
    pub og_type: Option<String>,
    pub og_site_name: Option<String>,
    pub og_url: Option<String>,
    pub og_locale: Option<String>,

    pub twitter_card: Option<String>,
    pub twitter_site: Option<String>,
    pub twitter_creator: Option<String>,
    pub twitter_image: Option<String>,

    pub linked_in_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
}

// =============================================================================
// NORMALIZED RECORD
// =============================================================================

/// The normalized site-metadata record exposed by the resolver.
///
/// Identical shape to [`RawSiteMetadata`] except that image-type fields only
/// ever hold resolved public URLs. A failed or empty upstream fetch yields
/// the all-`None` record, never a partial structure and never an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteMetadata {
    pub site_title: Option<String>,
    pub site_description: Option<String>,
    pub default_page_title: Option<String>,
    pub default_page_description: Option<String>,
    pub keywords: Option<Vec<String>>,
    pub canonical_url: Option<String>,
    pub robots_index: Option<bool>,
    pub robots_follow: Option<bool>,
    pub google_verification: Option<String>,
    pub site_publisher: Option<String>,
    pub apple_mobile_web_app_title: Option<String>,
    pub site_author: Option<String>,

    /// Resolved public URL.
    pub favicon: Option<String>,
    pub favicon16: Option<String>,
    pub favicon32: Option<String>,
    pub apple_touch_icon: Option<String>,

    pub og_image: Option<String>,
    pub og_image_alt: Option<String>,
    pub og_type: Option<String>,
    pub og_site_name: Option<String>,
    pub og_url: Option<String>,
    pub og_locale: Option<String>,

    pub twitter_card: Option<String>,
    pub twitter_site: Option<String>,
    pub twitter_creator: Option<String>,
    pub twitter_image: Option<String>,

    pub linked_in_url: Option<String>,
    pub facebook_url: Option<String>,
    pub instagram_url: Option<String>,
    pub youtube_url: Option<String>,
}

impl SiteMetadata {
    /// The all-`None` record substituted on upstream failure.
    pub fn empty() -> Self {
        Self::default()
    }
}

// =============================================================================
// PER-PAGE OVERRIDE
// =============================================================================

/// Per-page metadata overrides, constructed by the caller at render time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMetadataOverride {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Public image URL (already resolved by the caller).
    pub image: Option<String>,
    /// Canonical/OG URL for this page.
    pub url: Option<String>,
}

// =============================================================================
// SYNTHESIZED PAGE PAYLOAD
// =============================================================================

/// Robots directive with default-allow semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsDirective {
    pub index: bool,
    pub follow: bool,
}

/// A single icon link entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconLink {
    pub url: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Favicon variants plus the optional Apple touch icon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSet {
    pub icon: Vec<IconLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub apple: Option<IconLink>,
}

/// An Open Graph image entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OgImage {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// The Open Graph block of the synthesized payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraphBlock {
    pub title: String,
    pub description: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub images: Vec<OgImage>,
    pub locale: String,
    #[serde(rename = "type")]
    pub og_type: String,
}

/// The Twitter-card block of the synthesized payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TwitterBlock {
    pub card: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Site handle, `@`-prefixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    /// Creator handle, `@`-prefixed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

/// The final page-metadata payload consumed by the page-rendering layer.
///
/// Core correctness contract: `title` and `description` are never empty,
/// even when synthesized from the all-`None` [`SiteMetadata`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub robots: RobotsDirective,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_verification: Option<String>,
    pub canonical_url: String,
    pub open_graph: OpenGraphBlock,
    pub twitter: TwitterBlock,
    pub icons: IconSet,
    pub apple_mobile_web_app_title: String,
}
