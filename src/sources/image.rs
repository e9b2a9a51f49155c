//! Inline thumbnail discovery.

use crate::patterns::{IMG_DATA_SRC, IMG_SRC_QUOTED, IMG_SRC_UNQUOTED};

/// First `<img>` URL found in an HTML fragment.
///
/// Quoted `src` wins over unquoted `src`, which wins over lazy-load
/// attributes. The URL is returned as written; callers absolutize it.
#[must_use]
pub fn first_inline_image(html: &str) -> Option<String> {
    if html.is_empty() {
        return None;
    }

    [&*IMG_SRC_QUOTED, &*IMG_SRC_UNQUOTED, &*IMG_DATA_SRC]
        .into_iter()
        .find_map(|re| re.captures(html))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|url| !url.is_empty())
}

/// Pick a thumbnail from explicit candidates, then from HTML bodies.
///
/// `explicit` holds fields that name an image directly (enclosure,
/// thumbnail, media). `bodies` are scanned with [`first_inline_image`] in
/// order, so a description image beats a content image.
#[must_use]
pub fn pick_image<'a>(
    explicit: impl IntoIterator<Item = Option<&'a str>>,
    bodies: impl IntoIterator<Item = Option<&'a str>>,
) -> Option<String> {
    explicit
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .map(str::to_string)
        .or_else(|| bodies.into_iter().flatten().find_map(first_inline_image))
}
