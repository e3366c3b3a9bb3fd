use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Selected columns of one row of the CMS `pages` table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PageRow {
    pub path: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub seo_title: Option<String>,
    #[serde(default)]
    pub seo_description: Option<String>,
    /// Raw schema-type column: a tag, a JSON array string, or an array.
    #[serde(default)]
    pub schema_type: Value,
    /// Offset-less timestamps are read as UTC; anything unparseable is `None`.
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageRow {
    pub fn lastmod(&self) -> Option<NaiveDate> {
        self.updated_at.map(|t| t.date_naive())
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(Value::as_str).and_then(parse_timestamp))
}

/// RFC 3339, or a `timestamp without time zone` rendering taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Where a loaded page came from.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Cache,
    Remote,
    /// The caller's default content; the page was missing or the fetch failed.
    Fallback,
}

/// Result of [`super::PageLoader::load`].
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoadedPage {
    pub content: Value,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub schema_type: Value,
    pub source: ContentSource,
}

impl LoadedPage {
    pub(super) fn from_row(row: &PageRow, source: ContentSource) -> Self {
        Self {
            content: row.content.clone(),
            seo_title: row.seo_title.clone(),
            seo_description: row.seo_description.clone(),
            schema_type: row.schema_type.clone(),
            source,
        }
    }

    pub(super) fn fallback(default: &Value) -> Self {
        Self {
            content: default.clone(),
            seo_title: None,
            seo_description: None,
            schema_type: Value::Null,
            source: ContentSource::Fallback,
        }
    }
}

/// Connection settings for the hosted database's REST API.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Public (anon) key sent as `apikey` and bearer token.
    pub anon_key: String,
}
