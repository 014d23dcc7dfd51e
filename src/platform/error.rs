use serenity::http::HttpError;
use thiserror::Error;

/// Failure of a single call against the messaging platform
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Missing permissions: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("{0}")]
    Other(String),
}

impl From<serenity::Error> for PlatformError {
    fn from(err: serenity::Error) -> Self {
        let message = err.to_string();
        match err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
                match response.status_code.as_u16() {
                    401 | 403 => PlatformError::PermissionDenied(message),
                    404 => PlatformError::NotFound(message),
                    429 => PlatformError::RateLimited(message),
                    _ => PlatformError::Other(message),
                }
            }
            serenity::Error::Http(HttpError::Request(_)) => PlatformError::Network(message),
            serenity::Error::Io(_) | serenity::Error::Gateway(_) => {
                PlatformError::Network(message)
            }
            _ => PlatformError::Other(message),
        }
    }
}
