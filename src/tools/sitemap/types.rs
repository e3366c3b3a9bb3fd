use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
            ChangeFreq::Yearly => "yearly",
        }
    }
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<NaiveDate>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

impl SitemapEntry {
    /// Home page is weekly at 1.0, everything else monthly at 0.7.
    pub fn for_path(loc: String, path: &str, lastmod: Option<NaiveDate>) -> Self {
        let is_home = matches!(path.trim(), "" | "/");
        Self {
            loc,
            lastmod,
            changefreq: if is_home {
                ChangeFreq::Weekly
            } else {
                ChangeFreq::Monthly
            },
            priority: if is_home { 1.0 } else { 0.7 },
        }
    }
}
