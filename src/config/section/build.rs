//! `[build]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "source"             # Directory scanned for resources
//! index_file = "index.html"     # Served for directory requests (`/about/`)
//! ignore = ["/drafts/wip.html"] # Paths never served directly
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Source directory, relative to the project root.
    pub source: PathBuf,

    /// File name appended to directory-form request paths.
    pub index_file: String,

    /// Site paths excluded from serving. Proxies may still target them.
    pub ignore: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("source"),
            index_file: "index.html".to_string(),
            ignore: Vec::new(),
        }
    }
}

impl BuildConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.is_absolute() {
            return Err(ConfigError::Validation(format!(
                "build.source must be relative to the project root, got `{}`",
                self.source.display()
            )));
        }
        if self.index_file.is_empty() || self.index_file.contains('/') {
            return Err(ConfigError::Validation(format!(
                "build.index_file must be a plain file name, got `{}`",
                self.index_file
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_build_config() {
        let config = test_parse_config(
            "[build]\nsource = \"content\"\nindex_file = \"default.htm\"\nignore = [\"/a.html\"]",
        );

        assert_eq!(config.build.source, PathBuf::from("content"));
        assert_eq!(config.build.index_file, "default.htm");
        assert_eq!(config.build.ignore, ["/a.html"]);
        assert!(config.build.validate().is_ok());
    }

    #[test]
    fn test_build_config_bad_index_file() {
        let config = test_parse_config("[build]\nindex_file = \"a/index.html\"");
        assert!(matches!(
            config.build.validate(),
            Err(ConfigError::Validation(_))
        ));

        let config = test_parse_config("[build]\nindex_file = \"\"");
        assert!(config.build.validate().is_err());
    }
}
