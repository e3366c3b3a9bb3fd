//! URL Tools
//!
//! Trailing-slash rules shared by the link component, the sitemap and the
//! build-time link injection.

mod utils;

use url::Url;
use utils::*;

/// Apply the site's trailing-slash rule to an href.
///
/// Internal paths gain a slash before any query or hash (`/contact?x=1` →
/// `/contact/?x=1`). Roots, file-like last segments, fragments, non-http
/// schemes and absolute URLs on other hosts are returned unchanged. Absolute
/// URLs on `site_host` are treated as internal.
pub fn with_trailing_slash(href: &str, site_host: Option<&str>) -> String {
    let trimmed = href.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
        return trimmed.to_string();
    }

    if has_scheme(trimmed) {
        let Ok(mut url) = Url::parse(trimmed) else {
            return trimmed.to_string();
        };
        if !is_http(&url) || !is_site_host(&url, site_host) {
            return trimmed.to_string();
        }
        if needs_slash(url.path()) {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        return url.to_string();
    }

    if !trimmed.starts_with('/') {
        // relative hrefs resolve against the current page
        return trimmed.to_string();
    }

    let (path, suffix) = split_path_suffix(trimmed);
    if needs_slash(path) {
        format!("{path}/{suffix}")
    } else {
        trimmed.to_string()
    }
}

/// Normalize a sitemap `<loc>`: drop query and fragment, end the path with `/`.
///
/// Non-http schemes and text that does not parse as a URL are returned unchanged.
pub fn normalize_sitemap_loc(loc: &str) -> String {
    let trimmed = loc.trim();
    let Ok(mut url) = Url::parse(trimmed) else {
        return trimmed.to_string();
    };
    if !is_http(&url) {
        return trimmed.to_string();
    }
    url.set_query(None);
    url.set_fragment(None);
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.to_string()
}

/// Resolve a site path against the base URL and apply the trailing-slash rule.
pub fn absolute_url(base: &Url, path: &str) -> crate::Result<String> {
    let joined = base
        .join(path.trim())
        .map_err(|_| crate::SiteError::InvalidUrl(path.to_string()))?;
    Ok(with_trailing_slash(joined.as_str(), base.host_str()))
}

/// Whether an href leaves the site (absolute http(s) URL on another host).
pub fn is_external(href: &str, site_host: Option<&str>) -> bool {
    match Url::parse(href.trim()) {
        Ok(url) => is_http(&url) && !is_site_host(&url, site_host),
        Err(_) => false,
    }
}
