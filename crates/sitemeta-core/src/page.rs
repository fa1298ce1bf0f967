//! Page-metadata synthesis.
//!
//! Pure function of (normalized [`SiteMetadata`], optional per-page
//! override). Each field follows an ordered list of candidate sources,
//! highest priority first, so the precedence rules stay auditable and
//! testable per field:
//!
//! | Field | Candidates |
//! |-------|-----------|
//! | title | override (through `%s` template) → `"<override> \| <siteTitle>"` → siteTitle → fallback |
//! | description | override → defaultPageDescription → siteDescription → fallback |
//! | image | override → ogImage → (no image block) |
//! | OG url | override → ogUrl → fallback domain |
//! | robots | stored flag, absent or `true` means allow |

use crate::defaults;
use crate::models::{
    IconLink, IconSet, OgImage, OpenGraphBlock, PageMetadata, PageMetadataOverride,
    RobotsDirective, SiteMetadata, TwitterBlock,
};

/// Pick the first non-empty candidate, or fall back to `default`.
///
/// Empty strings are treated the same as absent values so that a content
/// editor clearing a field cannot produce an empty title or description.
fn first_non_empty(candidates: &[Option<&str>], default: &str) -> String {
    candidates
        .iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| default.to_string())
}

/// Returns `Some` only for non-empty strings.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.to_string())
}

/// Resolve the page title from the override and stored record.
fn resolve_title(site: &SiteMetadata, overrides: Option<&PageMetadataOverride>) -> String {
    let page_title = overrides
        .and_then(|o| non_empty(o.title.as_deref()));

    let title = match page_title {
        Some(page_title) => match non_empty(site.default_page_title.as_deref()) {
            // The stored default-page-title is a `%s` template.
            Some(template) => template.replace("%s", &page_title),
            None => match non_empty(site.site_title.as_deref()) {
                Some(site_title) => format!("{} | {}", page_title, site_title),
                None => page_title,
            },
        },
        None => first_non_empty(&[site.site_title.as_deref()], defaults::FALLBACK_TITLE),
    };

    if title.trim().is_empty() {
        defaults::FALLBACK_TITLE.to_string()
    } else {
        title
    }
}

/// Prefix a handle with `@` for rendering in the Twitter block.
fn at_handle(handle: Option<&str>) -> Option<String> {
    non_empty(handle).map(|h| format!("@{}", h.trim_start_matches('@')))
}

/// Synthesize the final page-metadata payload.
///
/// Always yields a usable (non-empty) title and description, even for the
/// all-`None` record.
pub fn synthesize(site: &SiteMetadata, overrides: Option<&PageMetadataOverride>) -> PageMetadata {
    let title = resolve_title(site, overrides);

    let description = first_non_empty(
        &[
            overrides.and_then(|o| o.description.as_deref()),
            site.default_page_description.as_deref(),
            site.site_description.as_deref(),
        ],
        defaults::FALLBACK_DESCRIPTION,
    );

    let image = overrides
        .and_then(|o| non_empty(o.image.as_deref()))
        .or_else(|| non_empty(site.og_image.as_deref()));

    let og_url = first_non_empty(
        &[
            overrides.and_then(|o| o.url.as_deref()),
            site.og_url.as_deref(),
        ],
        defaults::FALLBACK_CANONICAL_URL,
    );

    let canonical_url = first_non_empty(
        &[site.canonical_url.as_deref()],
        defaults::FALLBACK_CANONICAL_URL,
    );

    let author = first_non_empty(&[site.site_author.as_deref()], defaults::FALLBACK_TITLE);

    let open_graph = OpenGraphBlock {
        title: title.clone(),
        description: description.clone(),
        url: og_url,
        site_name: non_empty(site.og_site_name.as_deref()),
        images: image
            .iter()
            .map(|url| OgImage {
                url: url.clone(),
                alt: non_empty(site.og_image_alt.as_deref()).or_else(|| Some(description.clone())),
            })
            .collect(),
        locale: first_non_empty(&[site.og_locale.as_deref()], defaults::OG_LOCALE),
        og_type: first_non_empty(&[site.og_type.as_deref()], defaults::OG_TYPE),
    };

    let twitter = TwitterBlock {
        card: first_non_empty(&[site.twitter_card.as_deref()], defaults::TWITTER_CARD),
        title: title.clone(),
        description: description.clone(),
        image: non_empty(site.twitter_image.as_deref()).or_else(|| image.clone()),
        site: at_handle(site.twitter_site.as_deref()),
        creator: at_handle(site.twitter_creator.as_deref()),
    };

    let icons = IconSet {
        icon: vec![
            IconLink {
                url: first_non_empty(&[site.favicon32.as_deref()], defaults::FALLBACK_FAVICON),
                sizes: "32x32".to_string(),
                mime_type: "image/png".to_string(),
            },
            IconLink {
                url: first_non_empty(&[site.favicon16.as_deref()], defaults::FALLBACK_FAVICON),
                sizes: "16x16".to_string(),
                mime_type: "image/png".to_string(),
            },
        ],
        apple: non_empty(site.apple_touch_icon.as_deref()).map(|url| IconLink {
            url,
            sizes: "180x180".to_string(),
            mime_type: "image/png".to_string(),
        }),
    };

    PageMetadata {
        title: title.clone(),
        description,
        keywords: site.keywords.clone().filter(|k| !k.is_empty()),
        author,
        publisher: non_empty(site.site_publisher.as_deref()),
        robots: RobotsDirective {
            // Default-allow: only an explicit stored `false` restricts.
            index: site.robots_index != Some(false),
            follow: site.robots_follow != Some(false),
        },
        google_verification: non_empty(site.google_verification.as_deref()),
        canonical_url,
        open_graph,
        twitter,
        icons,
        apple_mobile_web_app_title: first_non_empty(
            &[
                site.apple_mobile_web_app_title.as_deref(),
                site.site_title.as_deref(),
            ],
            defaults::FALLBACK_TITLE,
        ),
    }
}

/// Render a `robots.txt` body from the resolved record.
///
/// Default-allow: crawling is only restricted when the stored index flag is
/// an explicit `false`. The robots exclusion protocol has no follow
/// directive; the follow flag is conveyed only through the synthesized
/// per-page robots meta. The sitemap line derives from the canonical URL.
pub fn render_robots_txt(site: &SiteMetadata) -> String {
    let index = site.robots_index != Some(false);
    let canonical = first_non_empty(
        &[site.canonical_url.as_deref()],
        defaults::FALLBACK_CANONICAL_URL,
    );

    let mut body = String::from("User-agent: *\n");
    if index {
        body.push_str("Allow: /\n");
    } else {
        body.push_str("Disallow: /\n");
    }
    body.push_str(&format!("\nSitemap: {}/sitemap.xml\n", canonical.trim_end_matches('/')));
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> SiteMetadata {
        SiteMetadata {
            site_title: Some("Acme Doors".to_string()),
            site_description: Some("Site-wide description".to_string()),
            default_page_title: Some("%s — Acme Doors".to_string()),
            default_page_description: Some("Default page description".to_string()),
            keywords: Some(vec!["garage".to_string(), "doors".to_string()]),
            canonical_url: Some("https://acme.example".to_string()),
            robots_index: Some(true),
            robots_follow: Some(true),
            google_verification: Some("token123".to_string()),
            site_publisher: Some("Acme Inc".to_string()),
            apple_mobile_web_app_title: Some("Acme".to_string()),
            site_author: Some("Acme Team".to_string()),
            favicon: Some("https://cdn.example/favicon.png".to_string()),
            favicon16: Some("https://cdn.example/favicon-16.png".to_string()),
            favicon32: Some("https://cdn.example/favicon-32.png".to_string()),
            apple_touch_icon: Some("https://cdn.example/apple.png".to_string()),
            og_image: Some("https://cdn.example/og.png".to_string()),
            og_image_alt: Some("Acme storefront".to_string()),
            og_type: Some("website".to_string()),
            og_site_name: Some("Acme Doors".to_string()),
            og_url: Some("https://acme.example".to_string()),
            og_locale: Some("en_US".to_string()),
            twitter_card: Some("summary".to_string()),
            twitter_site: Some("acmedoors".to_string()),
            twitter_creator: Some("acmedev".to_string()),
            twitter_image: Some("https://cdn.example/tw.png".to_string()),
            linked_in_url: None,
            facebook_url: None,
            instagram_url: None,
            youtube_url: None,
        }
    }

    // -------------------------------------------------------------------------
    // Title precedence
    // -------------------------------------------------------------------------

    #[test]
    fn title_uses_template_when_override_present() {
        let overrides = PageMetadataOverride {
            title: Some("Contact".to_string()),
            ..Default::default()
        };
        let payload = synthesize(&full_record(), Some(&overrides));
        assert_eq!(payload.title, "Contact — Acme Doors");
    }

    #[test]
    fn title_joins_site_title_without_template() {
        let mut site = full_record();
        site.default_page_title = None;
        let overrides = PageMetadataOverride {
            title: Some("Contact".to_string()),
            ..Default::default()
        };
        let payload = synthesize(&site, Some(&overrides));
        assert_eq!(payload.title, "Contact | Acme Doors");
    }

    #[test]
    fn title_is_bare_site_title_without_override() {
        let payload = synthesize(&full_record(), None);
        assert_eq!(payload.title, "Acme Doors");
    }

    #[test]
    fn title_falls_back_when_record_empty() {
        let payload = synthesize(&SiteMetadata::empty(), None);
        assert_eq!(payload.title, crate::defaults::FALLBACK_TITLE);
    }

    #[test]
    fn title_is_bare_override_when_no_site_title() {
        let overrides = PageMetadataOverride {
            title: Some("Contact".to_string()),
            ..Default::default()
        };
        let payload = synthesize(&SiteMetadata::empty(), Some(&overrides));
        assert_eq!(payload.title, "Contact");
    }

    #[test]
    fn title_never_empty_for_any_combination() {
        let sources = [SiteMetadata::empty(), full_record()];
        let override_titles = [None, Some(String::new()), Some("Page".to_string())];
        for site in &sources {
            for title in &override_titles {
                let overrides = PageMetadataOverride {
                    title: title.clone(),
                    ..Default::default()
                };
                let payload = synthesize(site, Some(&overrides));
                assert!(!payload.title.is_empty());
                assert!(!payload.description.is_empty());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Description precedence
    // -------------------------------------------------------------------------

    #[test]
    fn description_prefers_override() {
        let overrides = PageMetadataOverride {
            description: Some("Page description".to_string()),
            ..Default::default()
        };
        let payload = synthesize(&full_record(), Some(&overrides));
        assert_eq!(payload.description, "Page description");
    }

    #[test]
    fn description_falls_back_through_chain() {
        let mut site = full_record();
        let payload = synthesize(&site, None);
        assert_eq!(payload.description, "Default page description");

        site.default_page_description = None;
        let payload = synthesize(&site, None);
        assert_eq!(payload.description, "Site-wide description");

        site.site_description = None;
        let payload = synthesize(&site, None);
        assert_eq!(payload.description, crate::defaults::FALLBACK_DESCRIPTION);
    }

    #[test]
    fn empty_override_description_is_skipped() {
        let overrides = PageMetadataOverride {
            description: Some("   ".to_string()),
            ..Default::default()
        };
        let payload = synthesize(&full_record(), Some(&overrides));
        assert_eq!(payload.description, "Default page description");
    }

    // -------------------------------------------------------------------------
    // Robots default-allow
    // -------------------------------------------------------------------------

    #[test]
    fn robots_explicit_false_restricts() {
        let mut site = full_record();
        site.robots_index = Some(false);
        site.robots_follow = Some(false);
        let payload = synthesize(&site, None);
        assert!(!payload.robots.index);
        assert!(!payload.robots.follow);
    }

    #[test]
    fn robots_unset_or_true_allows() {
        let mut site = full_record();
        site.robots_index = None;
        site.robots_follow = Some(true);
        let payload = synthesize(&site, None);
        assert!(payload.robots.index);
        assert!(payload.robots.follow);

        let payload = synthesize(&SiteMetadata::empty(), None);
        assert!(payload.robots.index);
        assert!(payload.robots.follow);
    }

    // -------------------------------------------------------------------------
    // Image / Open Graph
    // -------------------------------------------------------------------------

    #[test]
    fn image_prefers_override_over_og_image() {
        let overrides = PageMetadataOverride {
            image: Some("https://cdn.example/page.png".to_string()),
            ..Default::default()
        };
        let payload = synthesize(&full_record(), Some(&overrides));
        assert_eq!(
            payload.open_graph.images[0].url,
            "https://cdn.example/page.png"
        );
    }

    #[test]
    fn no_image_block_when_no_image_anywhere() {
        let payload = synthesize(&SiteMetadata::empty(), None);
        assert!(payload.open_graph.images.is_empty());
        assert!(payload.twitter.image.is_none());
    }

    #[test]
    fn og_image_alt_falls_back_to_description() {
        let mut site = full_record();
        site.og_image_alt = None;
        let payload = synthesize(&site, None);
        assert_eq!(
            payload.open_graph.images[0].alt.as_deref(),
            Some("Default page description")
        );
    }

    #[test]
    fn og_defaults_applied_when_unset() {
        let payload = synthesize(&SiteMetadata::empty(), None);
        assert_eq!(payload.open_graph.og_type, "website");
        assert_eq!(payload.open_graph.locale, "en_CA");
        assert_eq!(payload.twitter.card, "summary_large_image");
    }

    #[test]
    fn og_url_prefers_override() {
        let overrides = PageMetadataOverride {
            url: Some("https://acme.example/contact".to_string()),
            ..Default::default()
        };
        let payload = synthesize(&full_record(), Some(&overrides));
        assert_eq!(payload.open_graph.url, "https://acme.example/contact");
    }

    #[test]
    fn og_url_falls_back_to_domain() {
        let payload = synthesize(&SiteMetadata::empty(), None);
        assert_eq!(
            payload.open_graph.url,
            crate::defaults::FALLBACK_CANONICAL_URL
        );
        assert_eq!(
            payload.canonical_url,
            crate::defaults::FALLBACK_CANONICAL_URL
        );
    }

    // -------------------------------------------------------------------------
    // Twitter handles
    // -------------------------------------------------------------------------

    #[test]
    fn twitter_handles_are_at_prefixed() {
        let payload = synthesize(&full_record(), None);
        assert_eq!(payload.twitter.site.as_deref(), Some("@acmedoors"));
        assert_eq!(payload.twitter.creator.as_deref(), Some("@acmedev"));
    }

    #[test]
    fn twitter_handles_omitted_when_absent() {
        let payload = synthesize(&SiteMetadata::empty(), None);
        assert!(payload.twitter.site.is_none());
        assert!(payload.twitter.creator.is_none());
    }

    #[test]
    fn stored_at_prefix_is_not_doubled() {
        let mut site = full_record();
        site.twitter_site = Some("@acmedoors".to_string());
        let payload = synthesize(&site, None);
        assert_eq!(payload.twitter.site.as_deref(), Some("@acmedoors"));
    }

    #[test]
    fn twitter_image_falls_back_to_page_image() {
        let mut site = full_record();
        site.twitter_image = None;
        let payload = synthesize(&site, None);
        assert_eq!(
            payload.twitter.image.as_deref(),
            Some("https://cdn.example/og.png")
        );
    }

    // -------------------------------------------------------------------------
    // Icons
    // -------------------------------------------------------------------------

    #[test]
    fn icons_fall_back_to_generic_favicon() {
        let payload = synthesize(&SiteMetadata::empty(), None);
        assert_eq!(payload.icons.icon.len(), 2);
        assert_eq!(payload.icons.icon[0].url, "/favicon.ico");
        assert_eq!(payload.icons.icon[0].sizes, "32x32");
        assert_eq!(payload.icons.icon[1].sizes, "16x16");
        assert!(payload.icons.apple.is_none());
    }

    #[test]
    fn apple_icon_emitted_when_set() {
        let payload = synthesize(&full_record(), None);
        let apple = payload.icons.apple.expect("apple icon");
        assert_eq!(apple.url, "https://cdn.example/apple.png");
        assert_eq!(apple.sizes, "180x180");
    }

    // -------------------------------------------------------------------------
    // robots.txt rendering
    // -------------------------------------------------------------------------

    #[test]
    fn robots_txt_allows_by_default() {
        let body = render_robots_txt(&SiteMetadata::empty());
        assert!(body.contains("User-agent: *"));
        assert!(body.contains("Allow: /"));
        assert!(!body.contains("Disallow"));
        assert!(body.contains(&format!(
            "Sitemap: {}/sitemap.xml",
            crate::defaults::FALLBACK_CANONICAL_URL
        )));
    }

    #[test]
    fn robots_txt_disallows_on_explicit_false() {
        let mut site = full_record();
        site.robots_index = Some(false);
        let body = render_robots_txt(&site);
        assert!(body.contains("Disallow: /"));
        assert!(body.contains("Sitemap: https://acme.example/sitemap.xml"));
    }

    #[test]
    fn robots_txt_emits_only_standard_directives() {
        // The follow flag has no robots.txt directive; it surfaces only in
        // the synthesized per-page robots meta.
        let mut site = full_record();
        site.robots_follow = Some(false);
        let body = render_robots_txt(&site);
        for line in body.lines().filter(|l| !l.trim().is_empty()) {
            let directive = line.split(':').next().unwrap();
            assert!(
                matches!(directive, "User-agent" | "Allow" | "Disallow" | "Sitemap"),
                "unexpected directive: {}",
                line
            );
        }
        assert!(!synthesize(&site, None).robots.follow);
    }
}
