//! Export configuration.
//!
//! Controls how a descriptor is rendered to Dockerfile text. Every field
//! has a default, so partial YAML or JSON documents are accepted.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Line terminator written after each rendered instruction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineEnding {
    /// `\n` (default).
    #[default]
    Lf,
    /// `\r\n`.
    Crlf,
}

impl LineEnding {
    /// The terminator bytes as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
        }
    }
}

impl std::fmt::Display for LineEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lf => write!(f, "lf"),
            Self::Crlf => write!(f, "crlf"),
        }
    }
}

impl std::str::FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "lf" => Ok(Self::Lf),
            "crlf" => Ok(Self::Crlf),
            _ => Err(format!("unknown line ending: '{}' (supported: lf, crlf)", s)),
        }
    }
}

/// Dockerfile export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Line terminator
    pub line_ending: LineEnding,

    /// Always render RUN/CMD/ENTRYPOINT in exec (JSON array) form,
    /// even with a single parameter
    pub exec_form: bool,

    /// Terminate the last line
    pub trailing_newline: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            line_ending: LineEnding::Lf,
            exec_form: false,
            trailing_newline: true,
        }
    }
}

impl ExportConfig {
    /// Load a configuration from a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a configuration from a JSON document.
    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DescriptorError;

    #[test]
    fn test_export_config_default() {
        let config = ExportConfig::default();
        assert_eq!(config.line_ending, LineEnding::Lf);
        assert!(!config.exec_form);
        assert!(config.trailing_newline);
    }

    #[test]
    fn test_line_ending_from_str() {
        assert_eq!("lf".parse::<LineEnding>().unwrap(), LineEnding::Lf);
        assert_eq!("crlf".parse::<LineEnding>().unwrap(), LineEnding::Crlf);
        assert!("cr".parse::<LineEnding>().is_err());
    }

    #[test]
    fn test_line_ending_display() {
        assert_eq!(LineEnding::Lf.to_string(), "lf");
        assert_eq!(LineEnding::Crlf.to_string(), "crlf");
    }

    #[test]
    fn test_line_ending_as_str() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::Crlf.as_str(), "\r\n");
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = ExportConfig::from_yaml_str("line_ending: crlf\n").unwrap();
        assert_eq!(config.line_ending, LineEnding::Crlf);
        assert!(!config.exec_form);
        assert!(config.trailing_newline);
    }

    #[test]
    fn test_from_json_full() {
        let config = ExportConfig::from_json_str(
            r#"{"line_ending": "lf", "exec_form": true, "trailing_newline": false}"#,
        )
        .unwrap();
        assert!(config.exec_form);
        assert!(!config.trailing_newline);
    }

    #[test]
    fn test_from_json_empty_object() {
        let config = ExportConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ExportConfig::default());
    }

    #[test]
    fn test_from_yaml_unknown_line_ending() {
        let err = ExportConfig::from_yaml_str("line_ending: cr\n").unwrap_err();
        assert!(matches!(err, DescriptorError::ConfigError(_)));
    }

    #[test]
    fn test_config_serde_roundtrip_json() {
        let config = ExportConfig {
            line_ending: LineEnding::Crlf,
            exec_form: true,
            trailing_newline: false,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"crlf\""));
        assert_eq!(ExportConfig::from_json_str(&json).unwrap(), config);
    }
}
