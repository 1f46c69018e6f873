mod backend;
mod errors;
mod io;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use io::atomic_write_str;
pub use errors::ConfigError;
pub use paths::GbeduPaths;

use once_cell::sync::Lazy;

// Paths singleton (env override or system dirs)
pub static PATHS: Lazy<Result<GbeduPaths, String>> = Lazy::new(|| GbeduPaths::new().map_err(|e| e.to_string()));

// Config backend singleton
pub static CONFIG_BACKEND: Lazy<Result<TomlConfigBackend, String>> =
  Lazy::new(|| PATHS.as_ref().map(|p| TomlConfigBackend::new(p.clone())).map_err(Clone::clone));

/// The process-wide backend, or the error that prevented resolving paths.
pub fn config_backend() -> Result<&'static TomlConfigBackend, ConfigError> {
  CONFIG_BACKEND.as_ref().map_err(|e| ConfigError::Other(e.clone()))
}
