use url::Url;

pub(super) fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// `mailto:`, `tel:`, `https://` … anything with a scheme before the first `/`, `?` or `#`.
pub(super) fn has_scheme(href: &str) -> bool {
    let head = href.split(['/', '?', '#']).next().unwrap_or("");
    match head.split_once(':') {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Hosts compare case-insensitively and ignore a leading `www.`.
pub(super) fn is_site_host(url: &Url, site_host: Option<&str>) -> bool {
    let (Some(host), Some(site)) = (url.host_str(), site_host) else {
        return false;
    };
    strip_www(host).eq_ignore_ascii_case(strip_www(site))
}

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Split `/a/b?x=1#y` into (`/a/b`, `?x=1#y`).
pub(super) fn split_path_suffix(href: &str) -> (&str, &str) {
    match href.find(['?', '#']) {
        Some(idx) => href.split_at(idx),
        None => (href, ""),
    }
}

/// A path needs a slash unless it already ends with one or names a file.
pub(super) fn needs_slash(path: &str) -> bool {
    if path.is_empty() || path.ends_with('/') {
        return false;
    }
    let last = path.rsplit('/').next().unwrap_or("");
    !last.contains('.')
}
