use thiserror::Error;

use crate::store::{ArtistStore, StoreEvent};

/// Failure reported by an observer. It is logged and never reaches the
/// caller whose mutation triggered the notification.
#[derive(Debug, Error)]
#[error("observer failed: {0}")]
pub struct ObserverError(pub String);

impl ObserverError {
  pub fn new(msg: impl Into<String>) -> Self {
    ObserverError(msg.into())
  }
}

/// Receives one call per committed mutation.
///
/// The store is handed back so observers can re-derive their views, or even
/// mutate it: such a mutation commits immediately but its own notification is
/// delivered only after the current cycle has reached every observer.
pub trait StoreObserver: Send + Sync {
  fn on_change(&self, store: &ArtistStore, event: &StoreEvent) -> Result<(), ObserverError>;
}

impl<F> StoreObserver for F
where
  F: Fn(&ArtistStore, &StoreEvent) -> Result<(), ObserverError> + Send + Sync,
{
  fn on_change(&self, store: &ArtistStore, event: &StoreEvent) -> Result<(), ObserverError> {
    self(store, event)
  }
}
