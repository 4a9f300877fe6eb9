//! Graphics error types.

use std::fmt;

use uifx_core::params::ParameterError;

/// Errors that can occur in the graphics system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// Failed to initialize the graphics system.
    InitializationFailed(String),
    /// Failed to create a resource.
    ResourceCreationFailed(String),
    /// An invalid parameter was provided.
    InvalidParameter(String),
    /// The parameter allocator rejected an operation.
    Parameter(ParameterError),
    /// Stored effect settings could not be parsed.
    SettingsParse(String),
    /// An internal error occurred.
    Internal(String),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InitializationFailed(msg) => write!(f, "initialization failed: {msg}"),
            Self::ResourceCreationFailed(msg) => write!(f, "resource creation failed: {msg}"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::Parameter(e) => write!(f, "parameter error: {e}"),
            Self::SettingsParse(msg) => write!(f, "settings parse error: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for GraphicsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parameter(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParameterError> for GraphicsError {
    fn from(e: ParameterError) -> Self {
        Self::Parameter(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphicsError::ResourceCreationFailed("too large".to_string());
        assert_eq!(err.to_string(), "resource creation failed: too large");

        let err = GraphicsError::InitializationFailed("no GPU found".to_string());
        assert_eq!(err.to_string(), "initialization failed: no GPU found");
    }

    #[test]
    fn test_parameter_error_source() {
        use std::error::Error;

        let err: GraphicsError = ParameterError::InvalidConfig("empty".to_string()).into();
        assert!(err.source().is_some());
        assert_eq!(
            err.to_string(),
            "parameter error: invalid allocator config: empty"
        );
    }
}
