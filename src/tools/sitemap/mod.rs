//! Sitemap Tools

pub mod types;

pub use types::*;

use chrono::NaiveDate;
use log::info;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use url::Url;

use crate::tools::pages::PageRow;
use crate::tools::urls::{absolute_url, normalize_sitemap_loc};

static LOC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<loc>(.*?)</loc>").expect("valid regex"));

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Render entries as a sitemaps.org `urlset` document.
pub fn build_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NS}\">\n"));
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!(
            "    <loc>{}</loc>\n",
            html_escape::encode_text(&entry.loc)
        ));
        if let Some(date) = entry.lastmod {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                date.format("%Y-%m-%d")
            ));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Combine static routes and published CMS pages into sitemap entries.
///
/// Locs are absolute and slash-normalized; the first entry for a loc wins,
/// except that a CMS page fills in a missing `lastmod`.
pub fn entries_for(base: &Url, routes: &[String], pages: &[PageRow]) -> Vec<SitemapEntry> {
    let mut entries: Vec<SitemapEntry> = Vec::new();
    let mut seen = HashSet::new();

    let candidates = routes
        .iter()
        .map(|r| (r.as_str(), None))
        .chain(pages.iter().map(|p| (p.path.as_str(), p.lastmod())));

    for (path, lastmod) in candidates {
        let loc = match absolute_url(base, path) {
            Ok(abs) => normalize_sitemap_loc(&abs),
            Err(e) => {
                log::warn!("skipping sitemap path {path:?}: {e}");
                continue;
            }
        };
        if !seen.insert(loc.clone()) {
            if let Some(existing) = entries.iter_mut().find(|e| e.loc == loc) {
                existing.lastmod = existing.lastmod.or(lastmod);
            }
            continue;
        }
        entries.push(SitemapEntry::for_path(loc, path, lastmod));
    }
    entries
}

/// Normalize every `<loc>` in a sitemap document. Returns the new text and how many `<loc>` elements were rewritten.
pub fn patch_sitemap(xml: &str) -> (String, usize) {
    let mut changed = 0usize;
    let patched = LOC_REGEX.replace_all(xml, |caps: &Captures| {
        let raw = html_escape::decode_html_entities(caps[1].trim()).to_string();
        let normalized = normalize_sitemap_loc(&raw);
        let element = format!("<loc>{}</loc>", html_escape::encode_text(&normalized));
        if element != caps[0] {
            changed += 1;
        }
        element
    });
    (patched.into_owned(), changed)
}

/// Patch a sitemap file in place. The file is only rewritten when a loc changed.
pub fn patch_sitemap_file(path: &Path) -> crate::Result<usize> {
    let xml = fs::read_to_string(path)?;
    let (patched, changed) = patch_sitemap(&xml);
    if changed > 0 {
        fs::write(path, patched)?;
        info!("patched {changed} sitemap locs in {}", path.display());
    }
    Ok(changed)
}

/// Today's date in UTC, for static routes that carry no CMS timestamp.
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}
