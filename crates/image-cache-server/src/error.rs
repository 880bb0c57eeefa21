//! Startup error types for the image cache server

use std::fmt;

#[derive(Debug)]
pub enum ServerError {
    Origin(origin_client::OriginError),
    Io(Box<std::io::Error>),
    Config(String),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Origin(err) => write!(f, "Origin client error: {}", err),
            ServerError::Io(err) => write!(f, "IO error: {}", err),
            ServerError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Origin(err) => Some(err),
            ServerError::Io(err) => Some(err.as_ref()),
            ServerError::Config(_) => None,
        }
    }
}

impl From<origin_client::OriginError> for ServerError {
    fn from(err: origin_client::OriginError) -> Self {
        ServerError::Origin(err)
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Io(Box::new(err))
    }
}

impl From<tracing_subscriber::filter::ParseError> for ServerError {
    fn from(err: tracing_subscriber::filter::ParseError) -> Self {
        ServerError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_error_display() {
        let err = ServerError::Origin(origin_client::OriginError::Status(502));
        assert_eq!(
            format!("{}", err),
            "Origin client error: Origin returned status 502"
        );
    }

    #[test]
    fn test_io_error_display() {
        let err: ServerError =
            std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use").into();
        assert_eq!(format!("{}", err), "IO error: address in use");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_display() {
        let err = ServerError::Config("invalid log directive".to_string());
        assert_eq!(
            format!("{}", err),
            "Configuration error: invalid log directive"
        );
    }

    #[test]
    fn test_error_is_debug() {
        let err = ServerError::Config("test".to_string());
        let debug_str = format!("{:?}", err);
        assert!(debug_str.contains("Config"));
    }
}
