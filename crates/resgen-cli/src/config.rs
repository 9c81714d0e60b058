//! `resgen.toml` configuration
//!
//! Every field is optional in the file. Command-line flags take precedence.

use anyhow::Context;
use resgen_symbols::JavaOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "resgen.toml";

/// Settings shared by all subcommands
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResgenConfig {
    /// Simple name of the generated class
    pub class_name: String,
    /// Emit `final` fields in generated sources
    pub final_ids: bool,
    /// Platform `R.txt` used when `--platform` is not given
    pub platform: Option<PathBuf>,
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for ResgenConfig {
    fn default() -> Self {
        Self {
            class_name: resgen_symbols::java::DEFAULT_CLASS_NAME.to_string(),
            final_ids: false,
            platform: None,
            log_level: "warn".to_string(),
        }
    }
}

impl ResgenConfig {
    /// Parse a TOML document
    ///
    /// # Errors
    /// Returns error on malformed TOML or unknown keys
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("invalid resgen configuration")
    }

    /// Load `path`, or the default file if present, or defaults
    ///
    /// An explicitly named file must exist.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("in config {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Java options with `final_ids` forced on when `final_flag` is set
    #[must_use]
    pub fn java_options(&self, final_flag: bool) -> JavaOptions {
        JavaOptions {
            class_name: self.class_name.clone(),
            final_ids: self.final_ids || final_flag,
        }
    }
}
