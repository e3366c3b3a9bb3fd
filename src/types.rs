use serde::{Deserialize, Serialize};

/// Business identity used to populate structured data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    pub url: String,
    pub phone: String,
    pub logo: String,
    pub image: Option<String>,
    pub street_address: String,
    /// Free text in the form "City, ST ZIP".
    pub city_state_zip: String,
    pub country: String,
    pub price_range: Option<String>,
    pub same_as: Vec<String>,
}

impl SiteInfo {
    pub fn country_or_default(&self) -> &str {
        if self.country.trim().is_empty() {
            "US"
        } else {
            self.country.trim()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}
impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}
