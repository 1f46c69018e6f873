use gbedu_config::{ConfigBackend, ConfigError, config_backend};
use gbedu_core::StoreOptions;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[store]` section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct StoreSettings {
  /// How many artists dashboards rank by default.
  #[serde(default = "default_top_limit")]
  pub default_top_limit: usize,

  /// JSON snapshot loaded into the store at startup.
  pub seed_file: Option<PathBuf>,
}

fn default_top_limit() -> usize {
  StoreOptions::default().default_top_limit
}

impl Default for StoreSettings {
  fn default() -> Self {
    StoreSettings { default_top_limit: default_top_limit(), seed_file: None }
  }
}

impl StoreSettings {
  pub fn load() -> Result<Self, ConfigError> {
    let backend = config_backend()?;
    let cfg = backend.load_section_with_default("store")?;
    backend.save_section("store", &cfg)?;
    Ok(cfg)
  }

  pub fn store_options(&self) -> StoreOptions {
    StoreOptions { default_top_limit: self.default_top_limit }
  }
}

/// `[logging]` section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
  /// Filter used when `RUST_LOG` is not set.
  #[serde(default = "default_level")]
  pub level: String,
}

fn default_level() -> String {
  "info".into()
}

impl Default for LoggingSettings {
  fn default() -> Self {
    LoggingSettings { level: default_level() }
  }
}

impl LoggingSettings {
  pub fn load() -> Result<Self, ConfigError> {
    let backend = config_backend()?;
    let cfg = backend.load_section_with_default("logging")?;
    backend.save_section("logging", &cfg)?;
    Ok(cfg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_store_section_fills_defaults() {
    let cfg: StoreSettings = toml::from_str("seed_file = \"seed.json\"").unwrap();
    assert_eq!(cfg.default_top_limit, 10);
    assert_eq!(cfg.seed_file, Some(PathBuf::from("seed.json")));
    assert_eq!(cfg.store_options().default_top_limit, 10);
  }

  #[test]
  fn logging_defaults_to_info() {
    let cfg: LoggingSettings = toml::from_str("").unwrap();
    assert_eq!(cfg.level, "info");
  }
}
