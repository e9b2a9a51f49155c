//! URL utilities: absolutizing scraped image URLs, size hints, relay URLs.

use url::Url;

/// Check if a string is a valid absolute http(s) URL.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if !s.starts_with("http://") && !s.starts_with("https://") {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) if url.host().is_some() => (true, Some(url)),
        _ => (false, None),
    }
}

/// Rewrite a scraped image URL to absolute form.
///
/// Protocol-relative URLs (`//cdn/...`) get `https:`; root-relative URLs
/// (`/img/...`) are resolved against the platform origin. Quotes left over
/// from sloppy markup are stripped first.
///
/// # Arguments
/// * `raw` - The URL as found in the payload
/// * `origin` - The platform origin, e.g. `https://note.com`
#[must_use]
pub fn absolutize(raw: &str, origin: &str) -> String {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '"' && *c != '\'').collect();

    if cleaned.is_empty() {
        return String::new();
    }

    if let Some(rest) = cleaned.strip_prefix("//") {
        return format!("https://{rest}");
    }

    if cleaned.starts_with('/') {
        return match Url::parse(origin).and_then(|base| base.join(&cleaned)) {
            Ok(resolved) => resolved.to_string(),
            Err(_) => format!("{}{cleaned}", origin.trim_end_matches('/')),
        };
    }

    cleaned
}

/// Ask an image host for a smaller rendition via a `width` query hint.
///
/// Only hosts listed in `hosts` are rewritten, and URLs that already carry
/// a `width` parameter are returned unchanged.
#[must_use]
pub fn apply_size_hint(image_url: &str, hosts: &[String], width: u32) -> String {
    let (is_abs, parsed) = is_absolute_url(image_url);
    let Some(mut url) = parsed.filter(|_| is_abs && width > 0) else {
        return image_url.to_string();
    };

    let matches_host = url
        .host_str()
        .is_some_and(|host| hosts.iter().any(|h| h.eq_ignore_ascii_case(host)));
    if !matches_host || url.query_pairs().any(|(k, _)| k == "width") {
        return image_url.to_string();
    }

    url.query_pairs_mut().append_pair("width", &width.to_string());
    url.to_string()
}

/// Build `{endpoint}?{param}={target}` with the target percent-encoded.
///
/// Used for relays that take the target URL as a query parameter.
#[must_use]
pub fn with_target_param(endpoint: &str, param: &str, target: &str) -> String {
    match Url::parse_with_params(endpoint, &[(param, target)]) {
        Ok(url) => url.to_string(),
        Err(_) => {
            let encoded: String = url::form_urlencoded::byte_serialize(target.as_bytes()).collect();
            let sep = if endpoint.contains('?') { '&' } else { '?' };
            format!("{endpoint}{sep}{param}={encoded}")
        }
    }
}

/// Build `{prefix}/{target}` for relays that take the target as a path.
#[must_use]
pub fn with_target_path(prefix: &str, target: &str) -> String {
    format!("{}/{target}", prefix.trim_end_matches('/'))
}

/// Build an API URL from a base, path segments and query pairs.
///
/// Each segment and query value is percent-encoded, so user names can
/// never alter the path or the query.
///
/// # Arguments
/// * `base` - API origin, optionally with a path prefix
/// * `segments` - Path segments appended after the base path
/// * `params` - Query pairs, in order
#[must_use]
pub fn api_url(base: &str, segments: &[&str], params: &[(&str, &str)]) -> String {
    let Ok(mut url) = Url::parse(base) else {
        return join_path(base, &segments.join("/"));
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }
    url.to_string()
}

/// Join a base URL and a path without doubling slashes.
#[must_use]
pub fn join_path(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
