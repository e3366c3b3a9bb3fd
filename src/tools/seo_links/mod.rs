//! SEO Link Injection
//!
//! Build-time pass over generated HTML that appends a `<noscript>` block of
//! absolute links, so crawlers that skip JavaScript still discover every route.


use log::{debug, info};
use scraper::Html;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::selectors::LINK_SELECTOR;
use crate::tools::urls::{absolute_url, is_external, with_trailing_slash};

/// Attribute marking an injected block; its presence makes injection a no-op.
pub const SEO_LINKS_MARKER: &str = "data-seo-links";

/// One link of the block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeoLink {
    pub path: String,
    pub label: String,
}

impl SeoLink {
    /// Label derived from the last path segment: `/estate-planning` → "Estate Planning", `/` → "Home".
    pub fn from_path(path: &str) -> Self {
        let segment = path
            .trim()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or("");
        let label = if segment.is_empty() {
            "Home".to_string()
        } else {
            segment
                .split(['-', '_'])
                .filter(|w| !w.is_empty())
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" ")
        };
        Self {
            path: path.to_string(),
            label,
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Outcome of a directory pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectReport {
    pub scanned: usize,
    pub injected: usize,
    pub skipped: usize,
}

/// Render `<noscript><nav data-seo-links>…</nav></noscript>` with absolute hrefs.
pub fn render_link_block(base: &Url, links: &[SeoLink]) -> crate::Result<String> {
    let mut block = format!("<noscript><nav {SEO_LINKS_MARKER} aria-label=\"Site links\">");
    for link in links {
        let href = absolute_url(base, &link.path)?;
        block.push_str(&format!(
            "<a href=\"{}\">{}</a>",
            html_escape::encode_double_quoted_attribute(&href),
            html_escape::encode_text(&link.label)
        ));
    }
    block.push_str("</nav></noscript>");
    Ok(block)
}

/// Insert the block before `</body>`, or append it when there is none.
///
/// Returns `None` when the document already carries the marker.
pub fn inject_links(html: &str, block: &str) -> Option<String> {
    if html.contains(SEO_LINKS_MARKER) {
        return None;
    }
    let lower = html.to_ascii_lowercase();
    let out = match lower.rfind("</body>") {
        Some(idx) => format!("{}{}{}", &html[..idx], block, &html[idx..]),
        None => format!("{html}{block}"),
    };
    Some(out)
}

/// Inject the block into every `.html` file under `dir`, recursively.
pub fn inject_links_in_dir(dir: &Path, block: &str) -> crate::Result<InjectReport> {
    let mut report = InjectReport::default();
    for path in html_files(dir)? {
        report.scanned += 1;
        let html = fs::read_to_string(&path)?;
        match inject_links(&html, block) {
            Some(updated) => {
                fs::write(&path, updated)?;
                report.injected += 1;
            }
            None => {
                debug!("skipping {}, links already injected", path.display());
                report.skipped += 1;
            }
        }
    }
    info!(
        "seo links: {} html files, {} injected, {} already present",
        report.scanned, report.injected, report.skipped
    );
    Ok(report)
}

/// Internal page paths linked from a document, slash-normalized, first-seen order.
///
/// Fragments, non-http schemes, other hosts and file-like paths are ignored.
pub fn discover_routes(html: &str, base: &Url) -> Vec<String> {
    let doc = Html::parse_document(html);
    let paths: Vec<String> = doc
        .select(&LINK_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.trim().starts_with('#'))
        .filter_map(|href| base.join(href.trim()).ok())
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .filter(|url| !is_external(url.as_str(), base.host_str()))
        .map(|url| with_trailing_slash(url.path(), None))
        .filter(|path| path.ends_with('/'))
        .collect();
    crate::dedupe!(paths)
}

/// [`discover_routes`] across every `.html` file under `dir`.
pub fn discover_routes_in_dir(dir: &Path, base: &Url) -> crate::Result<Vec<String>> {
    let mut paths = Vec::new();
    for path in html_files(dir)? {
        let html = fs::read_to_string(&path)?;
        paths.extend(discover_routes(&html, base));
    }
    Ok(crate::dedupe!(paths))
}

/// `.html` files under `dir`, recursively, in path order.
fn html_files(dir: &Path) -> crate::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            out.extend(html_files(&path)?);
        } else if path.extension().and_then(|s| s.to_str()) == Some("html") {
            out.push(path);
        }
    }
    Ok(out)
}
