use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Empty characters are not allowed: {0:?}")]
    InvalidHandle(String),

    #[error("Network Error: failed to fetch {resource}")]
    Network {
        resource: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("There are not enough problems. Category: {category} (requested {requested}, available {available})")]
    NotEnoughProblems {
        category: String,
        requested: usize,
        available: usize,
    },

    #[error("invalid service url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid quota {0:?}, expected <category>=<count>")]
    InvalidQuota(String),

    #[error("failed to render problem set")]
    Render(#[from] askama::Error),
}

impl Error {
    pub(crate) fn network(
        resource: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Network {
            resource: resource.into(),
            source: source.into(),
        }
    }
}
