//! `[[proxy]]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [[proxy]]
//! path = "/about/"
//! target = "/about-us/index.html"
//! ignore = true                 # Hide the target, serve only the alias
//! content_type = "text/html"    # Any other key becomes a resource option
//!
//! [proxy.locals]
//! title = "About"
//! ```

use serde::{Deserialize, Serialize};

use crate::address::Options;
use crate::config::ConfigError;

/// One proxy declaration as written in the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyEntry {
    pub path: String,
    pub target: String,

    /// `ignore`, `locals` and resource options, passed through to `declare_proxy`.
    #[serde(flatten)]
    pub options: Options,
}

impl ProxyEntry {
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "proxy[{index}].path must not be empty"
            )));
        }
        if self.target.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "proxy[{index}].target must not be empty"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::config::test_parse_config;

    #[test]
    fn test_proxy_entries() {
        let config = test_parse_config(
            r#"
[[proxy]]
path = "/about/"
target = "/about-us/index.html"
ignore = true

[proxy.locals]
title = "About"

[[proxy]]
path = "/feed/"
target = "/feed.xml"
content_type = "application/rss+xml"
"#,
        );

        assert_eq!(config.proxies.len(), 2);
        let about = &config.proxies[0];
        assert_eq!(about.path, "/about/");
        assert_eq!(about.options["ignore"], json!(true));
        assert_eq!(about.options["locals"], json!({ "title": "About" }));

        let feed = &config.proxies[1];
        assert_eq!(feed.options["content_type"], json!("application/rss+xml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_proxy_entry_missing_target() {
        let config = test_parse_config("[[proxy]]\npath = \"/a/\"\ntarget = \" \"");
        let err = config.proxies[0].validate(0).unwrap_err();
        assert!(err.to_string().contains("proxy[0].target"));
    }
}
