//! Toolkit configuration for `cookbook.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [preview], [create], [node]
//! ├── error          # ConfigError
//! ├── util           # config file discovery
//! └── mod.rs         # Config (this file)
//! ```
//!
//! # Precedence
//!
//! CLI flag > environment variable > `cookbook.toml` > built-in default.
//!
//! | Variable            | Overrides            |
//! |---------------------|----------------------|
//! | `PORT`              | `preview.port`       |
//! | `POLKADOT_WS`       | `node.endpoint`      |
//! | `POLKADOT_NODE_BIN` | `node.binary`        |

mod error;
pub mod section;
mod util;

pub use error::ConfigError;
pub use section::{CreateConfig, NodeConfig, PreviewConfig};

use crate::{
    cli::{Cli, Commands},
    log,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use util::find_config_file;

/// Root configuration structure representing cookbook.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Absolute path of the loaded config file, if any (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Live preview server settings
    pub preview: PreviewConfig,

    /// Tutorial scaffolding settings
    pub create: CreateConfig,

    /// Node probe settings
    pub node: NodeConfig,
}

impl Config {
    /// Load configuration for the given CLI invocation.
    ///
    /// A missing config file is not an error: every section has defaults.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.apply_command_options(cli);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let (config, _) = Self::parse_with_ignored(content)?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    /// Apply environment overrides through a lookup function.
    ///
    /// Taking the lookup as a closure keeps tests away from process-global env.
    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|v| !v.trim().is_empty()) {
            self.preview.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Env("PORT", port.clone()))?;
        }
        if let Some(endpoint) = lookup("POLKADOT_WS").filter(|v| !v.trim().is_empty()) {
            self.node.endpoint = endpoint.trim().to_string();
        }
        if let Some(binary) = lookup("POLKADOT_NODE_BIN").filter(|v| !v.trim().is_empty()) {
            self.node.binary = Some(PathBuf::from(binary.trim()));
        }
        Ok(())
    }

    /// Apply command-specific CLI flags (highest precedence).
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Preview { args } => {
                Self::update_option(&mut self.preview.interface, args.interface.as_ref());
                Self::update_option(&mut self.preview.port, args.port.as_ref());
                if args.no_open {
                    self.preview.open = false;
                }
            }
            Commands::Create { args } => {
                if args.skip_install {
                    self.create.install = false;
                }
                if args.no_git {
                    self.create.git_branch = false;
                }
            }
            Commands::Probe { args } => {
                Self::update_option(&mut self.node.endpoint, args.endpoint.as_ref());
                Self::update_option(&mut self.node.startup_timeout_secs, args.timeout.as_ref());
            }
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }
}

/// Parse a config snippet in tests, panicking on invalid TOML.
#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> Config {
    Config::from_str(content).expect("test config should parse")
}

// ============================================================================
// tests
// ============================================================================
