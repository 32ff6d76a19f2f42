use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("HTTP client setup failed")]
    Http(#[from] cluster_http::HttpClientError),

    #[error("group operation aborted")]
    Saga(#[from] cluster_saga::SagaError),

    #[error("group id cannot be empty")]
    EmptyGroupId,
}

pub type Result<T> = std::result::Result<T, CliError>;
