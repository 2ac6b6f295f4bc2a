//! Tag header configuration.

use anyhow::{Context, Result};
use http::header::HeaderName;
use serde::{Deserialize, Serialize};

use crate::encoder::{
    check_separator, header_names, JoinedTagEncoder, PrefixedTagEncoder, TagEncoder,
    DEFAULT_SEPARATOR,
};
use crate::error::{TagError, TagResult};
use crate::tagger::TagMode;

/// Settings for the tag header written on responses.
///
/// ```toml
/// header_name = "X-Cache-Tags"
/// separator = ","
/// prefix = "shop-"
/// mode = "replace"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHeaderConfig {
    /// Header carrying the tags.
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Separator between tags.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Prefix applied to every tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    /// Whether tagging appends to or replaces an existing header.
    #[serde(default)]
    pub mode: TagMode,
}

fn default_header_name() -> String {
    header_names::X_CACHE_TAGS.to_string()
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

impl Default for TagHeaderConfig {
    fn default() -> Self {
        Self {
            header_name: default_header_name(),
            separator: default_separator(),
            prefix: None,
            mode: TagMode::default(),
        }
    }
}

impl TagHeaderConfig {
    /// Load config from a file. Paths ending in `.json` are read as JSON,
    /// anything else as TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read tag config file: {}", path))?;

        let config = if path.ends_with(".json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
        .with_context(|| format!("Invalid tag config: {}", path))?;

        tracing::debug!(path, header = %config.header_name, "loaded tag config");
        Ok(config)
    }

    /// Parse and validate TOML config.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML tag config")?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON config.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(content).context("Failed to parse JSON tag config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check the header name and separator are usable.
    pub fn validate(&self) -> TagResult<()> {
        HeaderName::from_bytes(self.header_name.as_bytes())
            .map_err(|_| TagError::InvalidHeaderName(self.header_name.clone()))?;

        check_separator(&self.separator)
    }

    /// Build the encoder described by this config.
    pub fn build_encoder(&self) -> TagResult<Box<dyn TagEncoder + Send + Sync>> {
        self.validate()?;

        let joined = JoinedTagEncoder::new(self.header_name.clone())
            .try_with_separator(self.separator.clone())?;

        let encoder: Box<dyn TagEncoder + Send + Sync> = match &self.prefix {
            Some(prefix) => Box::new(PrefixedTagEncoder::new(prefix.clone(), joined)),
            None => Box::new(joined),
        };
        Ok(encoder)
    }
}
