use thiserror::Error;

/// Docker descriptor error types
#[derive(Error, Debug)]
pub enum DescriptorError {
    /// Invocation-time misuse (e.g. exporting to an absent sink)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An instruction could not be rendered as Dockerfile text
    #[error("Export error: {0}")]
    ExportError(String),

    /// The output sink rejected a write
    #[error("Export error: sink write failed: {0}")]
    SinkError(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DescriptorError {
    /// True for every failure raised while serializing a descriptor.
    pub fn is_export_error(&self) -> bool {
        matches!(self, Self::ExportError(_) | Self::SinkError(_))
    }
}

impl From<serde_json::Error> for DescriptorError {
    fn from(err: serde_json::Error) -> Self {
        DescriptorError::ConfigError(err.to_string())
    }
}

impl From<serde_yaml::Error> for DescriptorError {
    fn from(err: serde_yaml::Error) -> Self {
        DescriptorError::ConfigError(err.to_string())
    }
}

/// Result type alias for descriptor operations
pub type Result<T> = std::result::Result<T, DescriptorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let error = DescriptorError::InvalidArgument("Can not export to an absent sink".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid argument: Can not export to an absent sink"
        );
    }

    #[test]
    fn test_export_error_display() {
        let error = DescriptorError::ExportError("FROM requires an image name".to_string());
        assert_eq!(
            error.to_string(),
            "Export error: FROM requires an image name"
        );
    }

    #[test]
    fn test_sink_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: DescriptorError = io_error.into();
        assert!(matches!(error, DescriptorError::SinkError(_)));
        assert!(error.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_sink_error_keeps_source() {
        use std::error::Error as _;

        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let error = DescriptorError::from(io_error);
        let source = error.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_is_export_error() {
        assert!(DescriptorError::ExportError("x".to_string()).is_export_error());
        assert!(DescriptorError::SinkError(std::io::Error::new(
            std::io::ErrorKind::Other,
            "x"
        ))
        .is_export_error());
        assert!(!DescriptorError::InvalidArgument("x".to_string()).is_export_error());
        assert!(!DescriptorError::ConfigError("x".to_string()).is_export_error());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{ invalid");
        let error: DescriptorError = result.unwrap_err().into();
        assert!(matches!(error, DescriptorError::ConfigError(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content:");
        let error: DescriptorError = result.unwrap_err().into();
        assert!(matches!(error, DescriptorError::ConfigError(_)));
    }

    #[test]
    fn test_error_is_debug() {
        let error = DescriptorError::ConfigError("test".to_string());
        let debug_str = format!("{:?}", error);
        assert!(debug_str.contains("ConfigError"));
    }
}
