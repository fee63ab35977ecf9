//! Configuration file support.
//!
//! Formatting and validation settings are read from a TOML file:
//!
//! ```toml
//! [serializer]
//! line_width = 80
//! quote_style = "single"
//! pretty = false
//!
//! [validation]
//! require_unique_scripts = true
//! ```
//!
//! Every table and key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ObservingError, ObservingResult};
use crate::models::ValidationPolicy;
use crate::serialization::SerializerOptions;

/// Narrower widths would push every flow sequence back to block style anyway.
const MIN_LINE_WIDTH: usize = 20;

/// Settings shared by everything that builds or serializes blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservingConfig {
    pub serializer: SerializerOptions,
    pub validation: ValidationPolicy,
}

impl ObservingConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> ObservingResult<Self> {
        let config: ObservingConfig = toml::from_str(content).map_err(|e| {
            ObservingError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(ObservingConfig)` if successful
    /// * `Err(ObservingError)` if the file cannot be read, parsed or has out-of-range values
    pub fn from_file<P: AsRef<Path>>(path: P) -> ObservingResult<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        log::debug!("Loading observing config from {}", path.as_ref().display());
        Self::from_toml_str(&content)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `observing.toml` in:
    /// 1. Current directory
    /// 2. `config/` directory
    /// 3. Parent directory
    ///
    /// Falls back to defaults when no file exists.
    pub fn from_default_location() -> ObservingResult<Self> {
        let search_paths = [
            PathBuf::from("observing.toml"),
            PathBuf::from("config/observing.toml"),
            PathBuf::from("../observing.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        log::debug!("No observing.toml found, using default configuration");
        Ok(Self::default())
    }

    pub fn validate(&self) -> ObservingResult<()> {
        if let Some(width) = self.serializer.line_width {
            if width < MIN_LINE_WIDTH {
                return Err(ObservingError::Configuration(format!(
                    "serializer.line_width must be at least {}, not {}",
                    MIN_LINE_WIDTH, width
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::QuoteStyle;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ObservingConfig::from_toml_str("").unwrap();
        assert_eq!(config, ObservingConfig::default());
        assert_eq!(config.serializer.quote_style, QuoteStyle::Double);
        assert!(config.serializer.pretty);
        assert!(!config.validation.require_unique_scripts);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[serializer]
line_width = 80
quote_style = "single"
pretty = false

[validation]
require_unique_scripts = true
require_unique_constraints = true
"#;

        let config = ObservingConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.serializer.line_width, Some(80));
        assert_eq!(config.serializer.quote_style, QuoteStyle::Single);
        assert!(!config.serializer.pretty);
        assert!(config.validation.require_unique_scripts);
        assert!(config.validation.require_unique_constraints);
    }

    #[test]
    fn test_unknown_quote_style_rejected() {
        let result = ObservingConfig::from_toml_str("[serializer]\nquote_style = \"backtick\"\n");
        assert!(matches!(result, Err(ObservingError::Configuration(_))));
    }

    #[test]
    fn test_narrow_line_width_rejected() {
        let result = ObservingConfig::from_toml_str("[serializer]\nline_width = 5\n");
        assert!(matches!(result, Err(ObservingError::Configuration(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[validation]\nrequire_unique_scripts = true").unwrap();

        let config = ObservingConfig::from_file(file.path()).unwrap();
        assert!(config.validation.require_unique_scripts);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ObservingConfig::from_file("/nonexistent/observing.toml");
        assert!(matches!(result, Err(ObservingError::Io(_))));
    }
}
