use thiserror::Error;

/// Errors surfaced by the caches and services. Upstream failures keep the
/// classification the wiki client gave them.
#[derive(Debug, Clone, Error)]
pub(crate) enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("Rate limited by OSRS Wiki")]
    RateLimited,
    #[error("OSRS Wiki service unavailable")]
    Unavailable { status: Option<u16> },
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
    },
}

impl From<wiki_prices::Error> for ServiceError {
    fn from(error: wiki_prices::Error) -> Self {
        match error {
            wiki_prices::Error::NotFound => ServiceError::NotFound("Resource not found".to_string()),
            wiki_prices::Error::RateLimited => ServiceError::RateLimited,
            wiki_prices::Error::Unavailable { status } => ServiceError::Unavailable {
                status: Some(status),
            },
            wiki_prices::Error::Upstream { message, status } => {
                ServiceError::Upstream { message, status }
            }
            e @ (wiki_prices::Error::InvalidBaseUrl(_) | wiki_prices::Error::ClientBuild(_)) => {
                ServiceError::Upstream {
                    message: e.to_string(),
                    status: None,
                }
            }
        }
    }
}
