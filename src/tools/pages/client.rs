use reqwest::{redirect, Client};
use std::time::Duration;

const DEFAULT_TIMEOUT_MS: u64 = 15_000;
const REDIRECT_LIMIT: usize = 5;
const POOL_IDLE_TIMEOUT_SEC: u64 = 90;

/// Build the reqwest client used for CMS REST calls.
pub(crate) fn build_api_client() -> crate::Result<Client> {
    let client = Client::builder()
        .redirect(redirect::Policy::limited(REDIRECT_LIMIT))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
        .pool_idle_timeout(Duration::from_secs(POOL_IDLE_TIMEOUT_SEC))
        .user_agent(concat!("firmsite/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}
