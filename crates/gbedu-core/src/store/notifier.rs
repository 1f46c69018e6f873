use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tracing::{trace, warn};

use crate::ports::StoreObserver;
use crate::store::{ArtistStore, StoreEvent};

pub type SubscriptionId = u64;

/// Whether a notification cycle is running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifierState {
  #[default]
  Idle,
  Notifying,
}

struct Registry {
  observers: Vec<(SubscriptionId, Arc<dyn StoreObserver>)>,
  next_id: SubscriptionId,
}

/// Registered observers, called in registration order.
///
/// The cycle itself (which event, when) is driven by the store; this type
/// only knows who to call and keeps one observer's failure from reaching the
/// others.
pub(crate) struct Notifier {
  registry: Mutex<Registry>,
}

impl Notifier {
  pub(crate) fn new() -> Self {
    Self { registry: Mutex::new(Registry { observers: Vec::new(), next_id: 1 }) }
  }

  fn lock(&self) -> MutexGuard<'_, Registry> {
    self.registry.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub(crate) fn subscribe(&self, observer: Arc<dyn StoreObserver>) -> SubscriptionId {
    let mut registry = self.lock();
    let id = registry.next_id;
    registry.next_id += 1;
    registry.observers.push((id, observer));
    id
  }

  pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
    let mut registry = self.lock();
    let before = registry.observers.len();
    registry.observers.retain(|(sub, _)| *sub != id);
    registry.observers.len() != before
  }

  pub(crate) fn observer_count(&self) -> usize {
    self.lock().observers.len()
  }

  /// Calls every observer registered when the cycle starts, once.
  ///
  /// Errors and panics are logged and swallowed: the mutation behind `event`
  /// is already committed.
  pub(crate) fn deliver(&self, store: &ArtistStore, event: &StoreEvent) {
    let observers = self.lock().observers.clone();
    trace!(version = event.version, observers = observers.len(), "notifying observers");

    for (id, observer) in &observers {
      match panic::catch_unwind(AssertUnwindSafe(|| observer.on_change(store, event))) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
          warn!(subscription = id, version = event.version, error = %e, "store observer failed");
        }
        Err(payload) => {
          let msg = panic_message(payload.as_ref());
          warn!(subscription = id, version = event.version, panic = msg, "store observer panicked");
        }
      }
    }
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
  payload
    .downcast_ref::<&str>()
    .copied()
    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
    .unwrap_or("non-string panic payload")
}

/// Handle returned by `subscribe`. Dropping it keeps the observer registered;
/// call [`Subscription::unsubscribe`] to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
  id: SubscriptionId,
  notifier: Weak<Notifier>,
}

impl Subscription {
  pub(crate) fn new(id: SubscriptionId, notifier: &Arc<Notifier>) -> Self {
    Self { id, notifier: Arc::downgrade(notifier) }
  }

  pub fn id(&self) -> SubscriptionId {
    self.id
  }

  /// Removes the observer. Takes effect from the next notification cycle.
  /// Returns `false` if it was already gone or the store no longer exists.
  pub fn unsubscribe(self) -> bool {
    self.notifier.upgrade().is_some_and(|n| n.unsubscribe(self.id))
  }
}

impl std::fmt::Debug for Notifier {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Notifier").field("observers", &self.lock().observers.len()).finish()
  }
}
