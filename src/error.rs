use thiserror::Error;

pub type Result<T> = std::result::Result<T, SiteError>;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("dom error: {0}")]
    Dom(String),
    #[error("script host error: {0}")]
    Script(String),
}

impl SiteError {
    pub fn config(msg: impl Into<String>) -> Self {
        SiteError::Config(msg.into())
    }
}

/* url parse errors carry no input, so callers usually map_err with the raw text */
impl From<url::ParseError> for SiteError {
    fn from(e: url::ParseError) -> Self {
        SiteError::InvalidUrl(e.to_string())
    }
}
