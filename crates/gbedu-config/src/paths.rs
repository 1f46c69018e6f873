use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::errors::ConfigError;

const BASE_DIR_VAR: &str = "GBEDU_BASE_DIR";
const CONFIG_FILE: &str = "gbeduflow.toml";

/// Where `gbeduflow.toml` lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbeduPaths {
  pub config_dir: PathBuf,
}

impl GbeduPaths {
  /// The per-user config directory, or `$GBEDU_BASE_DIR/config` when that
  /// variable is set. The directory is created if missing.
  pub fn new() -> Result<Self, ConfigError> {
    let base = std::env::var_os(BASE_DIR_VAR).map(PathBuf::from);
    Self::resolve(base.as_deref())
  }

  /// Portable layout: the config directory is `base/config`.
  pub fn rooted(base: impl AsRef<Path>) -> Result<Self, ConfigError> {
    Self::resolve(Some(base.as_ref()))
  }

  fn resolve(base: Option<&Path>) -> Result<Self, ConfigError> {
    let config_dir = match base {
      Some(base) => base.join("config"),
      None => ProjectDirs::from("com", "gbeduflow", "gbeduflow")
        .ok_or(ConfigError::NoHome)?
        .config_dir()
        .to_path_buf(),
    };
    std::fs::create_dir_all(&config_dir)?;
    Ok(Self { config_dir })
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE)
  }
}
