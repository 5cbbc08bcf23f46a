use std::io;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl EndpointError {
    /// The input that failed to parse.
    pub fn input(&self) -> &str {
        match self {
            EndpointError::InvalidEndpoint(input) => input,
        }
    }
}

#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Size limit exceeded (limit {limit} bytes)")]
    SizeLimitExceeded { limit: u64 },
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl StreamError {
    pub fn is_size_limit(&self) -> bool {
        matches!(self, StreamError::SizeLimitExceeded { .. })
    }
}

impl From<StreamError> for io::Error {
    fn from(err: StreamError) -> Self {
        match err {
            StreamError::Io(inner) => inner,
            other => io::Error::other(other),
        }
    }
}
