//! Error types for the image cache

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CacheError {
    /// No readable entry exists for the key
    NotFound,
    /// Persisting an entry failed (disk full, permission denied, ...)
    Write(Box<io::Error>),
    Io(Box<io::Error>),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheError::NotFound => write!(f, "Cache entry not found"),
            CacheError::Write(err) => write!(f, "Cache write error: {}", err),
            CacheError::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CacheError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CacheError::Write(err) => Some(err.as_ref()),
            CacheError::Io(err) => Some(err.as_ref()),
            CacheError::NotFound => None,
        }
    }
}

impl From<io::Error> for CacheError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            CacheError::NotFound
        } else {
            CacheError::Io(Box::new(err))
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        assert_eq!(CacheError::NotFound.to_string(), "Cache entry not found");
    }

    #[test]
    fn test_write_error_display() {
        let err = CacheError::Write(Box::new(io::Error::other("disk full")));
        assert_eq!(err.to_string(), "Cache write error: disk full");
    }

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let err: CacheError = io::Error::from(io::ErrorKind::NotFound).into();
        assert!(matches!(err, CacheError::NotFound));
    }

    #[test]
    fn test_io_other_maps_to_io() {
        let err: CacheError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert!(matches!(err, CacheError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
