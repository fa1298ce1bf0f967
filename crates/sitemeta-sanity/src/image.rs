//! Sanity image-reference parsing and CDN URL construction.
//!
//! Asset references look like `image-<assetId>-<width>x<height>-<format>`
//! (e.g. `image-a1b2c3-512x512-png`). The public CDN URL drops the `image-`
//! prefix and swaps the trailing `-<format>` for a file extension:
//! `https://cdn.sanity.io/images/<project>/<dataset>/a1b2c3-512x512.png`.

/// Base URL of the Sanity asset CDN.
pub const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// Parsed parts of an image asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef<'a> {
    pub asset_id: &'a str,
    pub dimensions: &'a str,
    pub format: &'a str,
}

/// Parse an `image-<id>-<WxH>-<format>` asset reference.
///
/// Returns `None` for anything that does not match the shape, so malformed
/// references degrade to a null field instead of a broken URL.
pub fn parse_image_ref(image_ref: &str) -> Option<ImageRef<'_>> {
    let rest = image_ref.strip_prefix("image-")?;
    let (rest, format) = rest.rsplit_once('-')?;
    let (asset_id, dimensions) = rest.rsplit_once('-')?;

    if asset_id.is_empty() || format.is_empty() || !is_dimensions(dimensions) {
        return None;
    }

    Some(ImageRef {
        asset_id,
        dimensions,
        format,
    })
}

/// `<width>x<height>` with non-empty numeric parts.
fn is_dimensions(s: &str) -> bool {
    match s.split_once('x') {
        Some((w, h)) => {
            !w.is_empty()
                && !h.is_empty()
                && w.bytes().all(|b| b.is_ascii_digit())
                && h.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Build the public CDN URL for an asset reference.
pub fn cdn_url(project_id: &str, dataset: &str, image_ref: &str) -> Option<String> {
    let parsed = parse_image_ref(image_ref)?;
    Some(format!(
        "{}/{}/{}/{}-{}.{}",
        CDN_BASE, project_id, dataset, parsed.asset_id, parsed.dimensions, parsed.format
    ))
}
