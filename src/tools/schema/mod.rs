//! Schema Tools
//!
//! Turn CMS-authored type tags and page content into Schema.org JSON-LD.
//! Nothing here fails: malformed input yields empty output so a page always renders.

pub mod types;
mod utils;

pub use types::*;
use utils::*;

use scraper::Html;
use serde_json::{json, Map, Value};

use crate::selectors::JSONLD_SELECTOR;
use crate::types::SiteInfo;

/// Tags rendered with the local-business builder.
pub const LOCAL_BUSINESS_TYPES: &[&str] = &[
    "LocalBusiness",
    "LegalService",
    "Attorney",
    "ProfessionalService",
    "Notary",
];

pub const FAQ_PAGE_TYPE: &str = "FAQPage";

/// Everything the page-level builders need besides the CMS content itself.
#[derive(Debug, Clone)]
pub struct SchemaContext<'a> {
    pub site: &'a SiteInfo,
    pub page: PageMeta,
}

/// Normalize a raw schema-type value into distinct tags, first occurrence wins.
///
/// Accepts a single tag string, a JSON-encoded array string, or a native array.
/// Null, blank, unparseable array strings and other JSON kinds all give `[]`.
pub fn parse_schema_types(raw: &Value) -> Vec<String> {
    crate::dedupe!(collect_type_tags(raw))
}

/// Find the first list of question/answer pairs anywhere in a content tree.
///
/// A top-level string is treated as JSON text; if it does not parse the result is empty.
pub fn extract_faq_items(content: &Value) -> Vec<FaqItem> {
    if let Value::String(raw) = content {
        return match serde_json::from_str::<Value>(raw) {
            Ok(parsed) if !parsed.is_string() => extract_faq_items(&parsed),
            _ => Vec::new(),
        };
    }
    find_faq_items(content).unwrap_or_default()
}

/// Parse a "City, ST ZIP" line. Lines that do not match give empty fields.
pub fn parse_address_line(line: &str) -> PostalParts {
    parse_postal_parts(line)
}

pub fn is_local_business_type(tag: &str) -> bool {
    LOCAL_BUSINESS_TYPES.contains(&tag)
}

/// Build a `FAQPage` node, or `None` when there are no items.
pub fn build_faq_schema(items: &[FaqItem]) -> Option<Value> {
    build_faq_schema_with(items, None)
}

fn build_faq_schema_with(items: &[FaqItem], overrides: Option<&Value>) -> Option<Value> {
    if items.is_empty() {
        return None;
    }
    let main_entity: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "@type": "Question",
                "name": item.question,
                "acceptedAnswer": {
                    "@type": "Answer",
                    "text": item.answer,
                }
            })
        })
        .collect();

    let mut base = Map::new();
    base.insert("@context".into(), SCHEMA_CONTEXT.into());
    base.insert("@type".into(), FAQ_PAGE_TYPE.into());
    base.insert("mainEntity".into(), Value::Array(main_entity));
    Some(merge_overrides(base, overrides))
}

/// Build a `LocalBusiness` (or subtype) node for the firm.
pub fn build_local_business_schema(
    site: &SiteInfo,
    type_tag: &str,
    overrides: Option<&Value>,
) -> Value {
    let postal = parse_address_line(&site.city_state_zip);
    let type_tag = if type_tag.trim().is_empty() {
        "LocalBusiness"
    } else {
        type_tag.trim()
    };

    let mut base = Map::new();
    base.insert("@context".into(), SCHEMA_CONTEXT.into());
    base.insert("@type".into(), type_tag.into());
    base.insert("name".into(), site.name.clone().into());
    base.insert("url".into(), site.url.clone().into());
    base.insert("telephone".into(), site.phone.clone().into());
    base.insert("logo".into(), site.logo.clone().into());
    base.insert(
        "image".into(),
        site.image.clone().unwrap_or_else(|| site.logo.clone()).into(),
    );
    base.insert(
        "address".into(),
        json!({
            "@type": "PostalAddress",
            "streetAddress": site.street_address,
            "addressLocality": postal.locality,
            "addressRegion": postal.region,
            "postalCode": postal.postal_code,
            "addressCountry": site.country_or_default(),
        }),
    );
    insert_text(&mut base, "priceRange", site.price_range.as_deref());
    if !site.same_as.is_empty() {
        base.insert("sameAs".into(), json!(site.same_as));
    }
    merge_overrides(base, overrides)
}

/// Build a `WebPage` (or subtype such as `AboutPage`) node.
pub fn build_webpage_schema(
    site: &SiteInfo,
    page: &PageMeta,
    type_tag: &str,
    overrides: Option<&Value>,
) -> Value {
    let type_tag = if type_tag.trim().is_empty() {
        "WebPage"
    } else {
        type_tag.trim()
    };

    let mut base = Map::new();
    base.insert("@context".into(), SCHEMA_CONTEXT.into());
    base.insert("@type".into(), type_tag.into());
    base.insert("name".into(), page.title.clone().into());
    insert_text(&mut base, "description", page.description.as_deref());
    base.insert("url".into(), page.url.clone().into());
    base.insert(
        "isPartOf".into(),
        json!({
            "@type": "WebSite",
            "name": site.name,
            "url": site.url,
        }),
    );
    merge_overrides(base, overrides)
}

/// Build every JSON-LD node for a page.
///
/// Each parsed tag is dispatched to its builder. When the content holds FAQ
/// items and no `FAQPage` tag was listed, a `FAQPage` node is added anyway.
/// A listed `FAQPage` with no items is dropped.
pub fn build_page_schemas(
    ctx: &SchemaContext<'_>,
    raw_types: &Value,
    content: &Value,
    overrides: &SchemaOverrides,
) -> Vec<Value> {
    let tags = parse_schema_types(raw_types);
    let faq_items = extract_faq_items(content);
    let mut out = Vec::new();

    for tag in &tags {
        let tag_overrides = overrides.get(tag.as_str());
        if tag == FAQ_PAGE_TYPE {
            if let Some(faq) = build_faq_schema_with(&faq_items, tag_overrides) {
                out.push(faq);
            }
        } else if is_local_business_type(tag) {
            out.push(build_local_business_schema(ctx.site, tag, tag_overrides));
        } else {
            out.push(build_webpage_schema(ctx.site, &ctx.page, tag, tag_overrides));
        }
    }

    if !tags.iter().any(|t| t == FAQ_PAGE_TYPE) {
        if let Some(faq) = build_faq_schema_with(&faq_items, overrides.get(FAQ_PAGE_TYPE)) {
            out.push(faq);
        }
    }
    out
}

/// Render a node as an inline `<script type="application/ld+json">` block.
pub fn render_jsonld_script(value: &Value) -> String {
    // "</" inside a string literal would close the script element early
    let body = serde_json::to_string(value)
        .unwrap_or_default()
        .replace("</", "<\\/");
    format!(r#"<script type="application/ld+json">{body}</script>"#)
}

/// Every JSON-LD node embedded in a rendered document, `@graph` members expanded.
///
/// Blocks that fail to parse are skipped.
pub fn scrape_jsonld(html: &str) -> Vec<Value> {
    let doc = Html::parse_document(html);
    let mut nodes = Vec::new();
    for script in doc.select(&JSONLD_SELECTOR) {
        let text: String = script.text().collect();
        match serde_json::from_str::<Value>(text.trim()) {
            Ok(value) => nodes.extend(flatten_graph(value)),
            Err(e) => log::debug!("skipping malformed JSON-LD block: {e}"),
        }
    }
    nodes
}

/// Distinct `@type` tags across the document's JSON-LD, in first-seen order.
pub fn jsonld_types(html: &str) -> Vec<String> {
    let tags: Vec<String> = scrape_jsonld(html)
        .iter()
        .filter_map(|node| node.get("@type"))
        .flat_map(|t| match t {
            Value::String(s) => vec![s.clone()],
            Value::Array(arr) => arr
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect(),
            _ => Vec::new(),
        })
        .collect();
    crate::dedupe!(tags)
}
