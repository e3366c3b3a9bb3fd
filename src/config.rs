//! Site configuration.
//!
//! A single JSON document describing the firm, the site's static routes and
//! the CMS connection.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::tools::pages::ApiConfig;
use crate::tools::schema::SchemaOverrides;
use crate::types::SiteInfo;
use crate::{Result, SiteError};

pub const CONFIG_FILE_NAME: &str = "site.json";

fn default_business_type() -> String {
    "LegalService".to_string()
}

fn default_routes() -> Vec<String> {
    vec!["/".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteInfo,
    /// Canonical origin, e.g. `https://halemoreno.com`.
    pub base_url: String,
    #[serde(default = "default_business_type")]
    pub business_type: String,
    #[serde(default = "default_routes")]
    pub routes: Vec<String>,
    #[serde(default)]
    pub api: Option<ApiConfig>,
    #[serde(default)]
    pub schema_overrides: SchemaOverrides,
}

impl SiteConfig {
    /// Load from `path`, or from `site.json` in the platform config directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };
        if !path.exists() {
            return Err(SiteError::config(format!(
                "no config at {} (pass --config or set FIRMSITE_CONFIG)",
                path.display()
            )));
        }
        let file = fs::File::open(&path)?;
        let config: SiteConfig = serde_json::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: SiteConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.base()?;
        if self.site.name.trim().is_empty() {
            return Err(SiteError::config("site.name is required"));
        }
        Ok(())
    }

    pub fn base(&self) -> Result<Url> {
        let url = Url::parse(self.base_url.trim())
            .map_err(|_| SiteError::InvalidUrl(self.base_url.clone()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SiteError::InvalidUrl(self.base_url.clone()));
        }
        Ok(url)
    }

    /// Environment/CLI values replace the file's `api` block field by field.
    pub fn with_api_overrides(mut self, url: Option<String>, anon_key: Option<String>) -> Self {
        if url.is_none() && anon_key.is_none() {
            return self;
        }
        let current = self.api.take();
        let url = url.or_else(|| current.as_ref().map(|a| a.url.clone()));
        let anon_key = anon_key.or_else(|| current.as_ref().map(|a| a.anon_key.clone()));
        self.api = match (url, anon_key) {
            (Some(url), Some(anon_key)) => Some(ApiConfig { url, anon_key }),
            _ => current,
        };
        self
    }

    pub fn require_api(&self) -> Result<&ApiConfig> {
        self.api.as_ref().ok_or_else(|| {
            SiteError::config("no CMS api configured (set api in config or FIRMSITE_API_URL / FIRMSITE_API_KEY)")
        })
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from("io", "firmsite", "firmsite")
        .ok_or_else(|| SiteError::config("could not resolve config dir"))?;
    Ok(proj.config_dir().join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "site": {
            "name": "Hale & Moreno LLP",
            "url": "https://halemoreno.com",
            "phone": "(630) 555-0142",
            "logo": "https://halemoreno.com/logo.png",
            "street_address": "55 Shuman Blvd, Suite 300",
            "city_state_zip": "Naperville, IL 60563"
        },
        "base_url": "https://halemoreno.com",
        "routes": ["/", "/about", "/contact"],
        "schema_overrides": {"LegalService": {"priceRange": "$$"}}
    }"#;

    #[test]
    fn parses_with_defaults() {
        let config = SiteConfig::from_json(SAMPLE).unwrap();
        assert_eq!(config.business_type, "LegalService");
        assert_eq!(config.routes.len(), 3);
        assert!(config.api.is_none());
        assert_eq!(config.site.country_or_default(), "US");
        assert_eq!(config.schema_overrides["LegalService"]["priceRange"], "$$");
    }

    #[test]
    fn rejects_bad_base_url() {
        let text = SAMPLE.replace(r#""base_url": "https://halemoreno.com""#, r#""base_url": "halemoreno""#);
        assert!(matches!(
            SiteConfig::from_json(&text),
            Err(SiteError::InvalidUrl(_))
        ));
    }

    #[test]
    fn api_overrides_fill_and_replace() {
        let config = SiteConfig::from_json(SAMPLE).unwrap();
        assert!(config.require_api().is_err());

        let partial = config
            .clone()
            .with_api_overrides(Some("https://abc.supabase.co".into()), None);
        assert!(partial.api.is_none());

        let full = config.with_api_overrides(
            Some("https://abc.supabase.co".into()),
            Some("anon".into()),
        );
        assert_eq!(full.require_api().unwrap().url, "https://abc.supabase.co");

        let replaced = full.with_api_overrides(None, Some("rotated".into()));
        let api = replaced.require_api().unwrap();
        assert_eq!(api.url, "https://abc.supabase.co");
        assert_eq!(api.anon_key, "rotated");
    }

    #[test]
    fn load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SiteConfig::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, SiteError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, SAMPLE).unwrap();
        let config = SiteConfig::load(Some(&path)).unwrap();
        assert_eq!(config.site.name, "Hale & Moreno LLP");
    }
}
