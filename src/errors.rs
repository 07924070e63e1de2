#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("Invalid host: {0:?}")]
    InvalidHost(String),

    #[error("Cannot encode cookie jar: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Cannot decode cookie jar: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Cookie persistence failed: {0}")]
    Persistence(#[from] anyhow::Error),
}
