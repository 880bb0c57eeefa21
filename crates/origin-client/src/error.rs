//! Error types for the origin client

use std::fmt;

#[derive(Debug)]
pub enum OriginError {
    /// The origin has no image for the key
    Miss,
    /// The origin answered with an unexpected status
    Status(u16),
    Http(Box<reqwest::Error>),
}

impl OriginError {
    pub fn is_miss(&self) -> bool {
        matches!(self, OriginError::Miss)
    }
}

impl fmt::Display for OriginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginError::Miss => write!(f, "Origin has no such image"),
            OriginError::Status(status) => write!(f, "Origin returned status {}", status),
            OriginError::Http(err) => write!(f, "HTTP error: {}", err),
        }
    }
}

impl std::error::Error for OriginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OriginError::Http(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for OriginError {
    fn from(err: reqwest::Error) -> Self {
        OriginError::Http(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, OriginError>;
