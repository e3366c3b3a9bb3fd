use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::client::build_api_client;
use super::types::{ApiConfig, PageRow};
use crate::{Result, SiteError};

const PAGE_COLUMNS: &str = "path,content,seo_title,seo_description,schema_type,updated_at";
const LISTING_COLUMNS: &str = "path,updated_at";

/// Where page rows come from.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// The published row for `path`, if there is one.
    async fn fetch_page(&self, path: &str) -> Result<Option<PageRow>>;

    /// Every published row (path and timestamp only).
    async fn list_published(&self) -> Result<Vec<PageRow>>;

    /// Cheapest possible round trip, for health checks.
    async fn ping(&self) -> Result<()>;
}

/// `pages` table behind the hosted database's auto-generated REST API.
pub struct RestPageSource {
    client: Client,
    endpoint: Url,
    anon_key: String,
}

impl RestPageSource {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        Ok(Self {
            client: build_api_client()?,
            endpoint: pages_endpoint(&config.url)?,
            anon_key: config.anon_key.clone(),
        })
    }

    async fn get_rows(&self, url: Url) -> Result<Vec<PageRow>> {
        let response = self
            .client
            .get(url.clone())
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SiteError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.json::<Vec<PageRow>>().await?)
    }
}

#[async_trait]
impl PageSource for RestPageSource {
    async fn fetch_page(&self, path: &str) -> Result<Option<PageRow>> {
        let rows = self.get_rows(page_query_url(&self.endpoint, path)).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_published(&self) -> Result<Vec<PageRow>> {
        self.get_rows(listing_query_url(&self.endpoint)).await
    }

    async fn ping(&self) -> Result<()> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("select", "path")
            .append_pair("limit", "1");
        self.get_rows(url).await.map(|_| ())
    }
}

/// `{api}/rest/v1/pages`, tolerating a trailing slash on the project URL.
pub fn pages_endpoint(api_url: &str) -> Result<Url> {
    let raw = format!("{}/rest/v1/pages", api_url.trim().trim_end_matches('/'));
    let url = Url::parse(&raw).map_err(|_| SiteError::InvalidUrl(api_url.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SiteError::InvalidUrl(api_url.to_string()));
    }
    Ok(url)
}

/// One published row filtered by path.
pub fn page_query_url(endpoint: &Url, path: &str) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("select", PAGE_COLUMNS)
        .append_pair("path", &format!("eq.{path}"))
        .append_pair("published", "eq.true")
        .append_pair("limit", "1");
    url
}

fn listing_query_url(endpoint: &Url) -> Url {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("select", LISTING_COLUMNS)
        .append_pair("published", "eq.true")
        .append_pair("order", "path.asc");
    url
}
