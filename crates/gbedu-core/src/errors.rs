// crates/gbedu-core/src/errors.rs
use thiserror::Error;

/// Errors returned by the store's mutation API.
///
/// Every variant rejects the whole operation: when one of these comes back,
/// the store is exactly as it was before the call. Upper layers (forms,
/// loaders) translate them into user feedback or logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
  /// Malformed input: out-of-range score or rating, empty required field,
  /// duplicate id inside a bulk replace.
  #[error("validation error: {0}")]
  Validation(String),

  /// A create with an id that is already present.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The mutation references an entity the store does not know.
  #[error("not found: {0}")]
  NotFound(String),
}

impl StoreError {
  pub fn is_validation(&self) -> bool {
    matches!(self, StoreError::Validation(_))
  }

  pub fn is_conflict(&self) -> bool {
    matches!(self, StoreError::Conflict(_))
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, StoreError::NotFound(_))
  }
}
