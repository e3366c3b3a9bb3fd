#[cfg(test)]
mod tests {
    use crate::tools::pages::*;
    use crate::{Result, SiteError};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    #[derive(Default)]
    struct FakeSource {
        rows: HashMap<String, PageRow>,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeSource {
        fn with_page(path: &str, content: Value) -> Self {
            let mut rows = HashMap::new();
            rows.insert(
                path.to_string(),
                PageRow {
                    path: path.to_string(),
                    content,
                    seo_title: Some("About Us".into()),
                    seo_description: None,
                    schema_type: json!("AboutPage"),
                    updated_at: None,
                },
            );
            Self {
                rows,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl PageSource for FakeSource {
        async fn fetch_page(&self, path: &str) -> Result<Option<PageRow>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SiteError::Status {
                    status: 503,
                    url: path.to_string(),
                });
            }
            Ok(self.rows.get(path).cloned())
        }

        async fn list_published(&self) -> Result<Vec<PageRow>> {
            Ok(self.rows.values().cloned().collect())
        }

        async fn ping(&self) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_caches_remote_rows() {
        let mut loader = PageLoader::new(FakeSource::with_page("/about", json!({"hero": "Hi"})));

        let first = loader.load("/about", &json!({})).await;
        assert_eq!(first.source, ContentSource::Remote);
        assert_eq!(first.content, json!({"hero": "Hi"}));
        assert_eq!(first.seo_title.as_deref(), Some("About Us"));

        let second = loader.load("/about", &json!({})).await;
        assert_eq!(second.source, ContentSource::Cache);
        assert_eq!(second.content, first.content);
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_page_falls_back_without_caching() {
        let mut loader = PageLoader::new(FakeSource::default());
        let default = json!({"hero": "Default"});

        let page = loader.load("/missing", &default).await;
        assert_eq!(page.source, ContentSource::Fallback);
        assert_eq!(page.content, default);
        assert!(loader.cache().is_empty());

        loader.load("/missing", &default).await;
        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_error_falls_back() {
        let mut loader = PageLoader::new(FakeSource {
            fail: true,
            ..Default::default()
        });
        let page = loader.load("/about", &json!({"x": 1})).await;
        assert_eq!(page.source, ContentSource::Fallback);
        assert_eq!(page.content, json!({"x": 1}));
        assert_eq!(page.schema_type, Value::Null);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear_force_refetch() {
        let mut loader = PageLoader::new(FakeSource::with_page("/about", json!({})));
        loader.load("/about", &json!({})).await;
        assert_eq!(loader.cache().len(), 1);

        assert!(loader.cache_mut().invalidate("/about"));
        assert!(!loader.cache_mut().invalidate("/about"));
        loader.load("/about", &json!({})).await;
        loader.cache_mut().clear();
        loader.load("/about", &json!({})).await;

        assert_eq!(loader.source().calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_page_query_url() {
        let endpoint = pages_endpoint("https://abc.supabase.co/").unwrap();
        assert_eq!(endpoint.as_str(), "https://abc.supabase.co/rest/v1/pages");

        let url = page_query_url(&endpoint, "/estate-planning");
        let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs["path"], "eq./estate-planning");
        assert_eq!(pairs["published"], "eq.true");
        assert_eq!(pairs["limit"], "1");
        assert!(pairs["select"].contains("content"));
        assert!(pairs["select"].contains("schema_type"));
    }

    #[test]
    fn test_pages_endpoint_rejects_bad_urls() {
        assert!(pages_endpoint("not a url").is_err());
        assert!(pages_endpoint("ftp://abc.supabase.co").is_err());
        assert!(Url::parse(pages_endpoint("http://localhost:54321").unwrap().as_str()).is_ok());
    }

    #[test]
    fn test_page_row_deserializes_sparse_rows() {
        let row: PageRow =
            serde_json::from_str(r#"{"path":"/faq","updated_at":"2026-02-03T04:05:06+00:00"}"#)
                .unwrap();
        assert_eq!(row.content, Value::Null);
        assert_eq!(row.lastmod().unwrap().to_string(), "2026-02-03");
    }

    #[test]
    fn test_page_row_tolerates_naive_and_bad_timestamps() {
        let naive: PageRow = serde_json::from_str(
            r#"{"path":"/a","updated_at":"2026-02-03T04:05:06.123456"}"#,
        )
        .unwrap();
        assert_eq!(naive.lastmod().unwrap().to_string(), "2026-02-03");
        assert_eq!(
            naive.updated_at.unwrap().to_rfc3339(),
            "2026-02-03T04:05:06.123456+00:00"
        );

        let spaced: PageRow =
            serde_json::from_str(r#"{"path":"/b","updated_at":"2026-02-03 23:59:59"}"#).unwrap();
        assert_eq!(spaced.lastmod().unwrap().to_string(), "2026-02-03");

        let garbage: PageRow =
            serde_json::from_str(r#"{"path":"/c","updated_at":"yesterday"}"#).unwrap();
        assert!(garbage.updated_at.is_none());

        let null: PageRow = serde_json::from_str(r#"{"path":"/d","updated_at":null}"#).unwrap();
        assert!(null.updated_at.is_none());

        let rows: Vec<PageRow> = serde_json::from_str(
            r#"[{"path":"/e","updated_at":"2026-02-03T04:05:06"},{"path":"/f","updated_at":42}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[1].updated_at.is_none());
    }
}
