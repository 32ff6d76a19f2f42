use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("failed to build HTTP client")]
    Build(#[from] reqwest::Error),
}
