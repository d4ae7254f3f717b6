//! Configuration file parsing for codebeads.toml.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::beads::EmitOptions;
use crate::catalog::DEFAULT_RESERVED_NAMESPACE;
use crate::error::ConfigError;

const CONFIG_NAMES: &[&str] = &["codebeads.toml", ".codebeads.toml"];

/// Main configuration structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
  /// Shape of the generated source
  #[serde(default)]
  pub emit: EmitOptions,

  /// How catalogs are read
  #[serde(default)]
  pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
  /// Instructions in this namespace never have an encoding
  #[serde(default = "default_reserved_namespace")]
  pub reserved_namespace: String,
}

impl Default for CatalogConfig {
  fn default() -> Self {
    Self {
      reserved_namespace: default_reserved_namespace(),
    }
  }
}

fn default_reserved_namespace() -> String {
  DEFAULT_RESERVED_NAMESPACE.to_string()
}

impl Config {
  pub fn from_toml(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

/**
  Loads configuration from `path`, or from the nearest config file found by searching the
  current directory and its parents. Without either, the defaults apply.
*/
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
  let config_path = match path {
    Some(path) => path.to_path_buf(),
    None => match find_config_file() {
      Some(found) => found,
      None => return Ok(Config::default()),
    },
  };

  debug!(path = %config_path.display(), "reading configuration");
  let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
    path: config_path.clone(),
    source,
  })?;
  Config::from_toml(&config_path, &content)
}

/// Search for a configuration file in the current directory and parent directories.
fn find_config_file() -> Option<PathBuf> {
  let cwd = std::env::current_dir().ok()?;

  let mut dir = Some(cwd.as_path());
  while let Some(current) = dir {
    for name in CONFIG_NAMES {
      let path = current.join(name);
      if path.exists() {
        return Some(path);
      }
    }
    dir = current.parent();
  }

  None
}
