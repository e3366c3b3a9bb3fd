use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One question/answer pair found in CMS content.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Locality fields parsed from a "City, ST ZIP" line.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostalParts {
    pub locality: String,
    pub region: String,
    pub postal_code: String,
}

/// The page-level fields a `WebPage` node describes.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    pub title: String,
    pub description: Option<String>,
    /// Absolute canonical URL of the page.
    pub url: String,
}

/// Per-tag override objects authored in the CMS, e.g. `{"LegalService": {"priceRange": "$$"}}`.
pub type SchemaOverrides = Map<String, Value>;
