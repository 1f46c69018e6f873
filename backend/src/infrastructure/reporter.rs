use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use gbedu_core::ports::{ObserverError, StoreObserver};
use gbedu_core::{ArtistStore, Change, StoreEvent};
use tracing::info;

/// A `StoreObserver` that reports committed changes to the log, plus the
/// current leader whenever the ranking may have moved.
///
/// Clones share one counter of reported events.
#[derive(Debug, Clone, Default)]
pub struct LogReporter {
  reported: Arc<AtomicU64>,
}

impl LogReporter {
  pub fn new() -> Self {
    Self::default()
  }

  /// Events reported so far.
  pub fn reported(&self) -> u64 {
    self.reported.load(Ordering::Relaxed)
  }
}

impl StoreObserver for LogReporter {
  fn on_change(&self, store: &ArtistStore, event: &StoreEvent) -> Result<(), ObserverError> {
    self.reported.fetch_add(1, Ordering::Relaxed);
    info!(version = event.version, change = ?event.change, "store changed");

    let ranking_moved = matches!(
      event.change,
      Change::ArtistsReplaced { .. } | Change::ArtistCreated(_) | Change::ArtistUpdated(_)
    );

    if ranking_moved {
      if let Some(leader) = store.top_artists(1).into_iter().next() {
        info!(id = %leader.id, name = %leader.name, aeh_score = %leader.aeh_score, "current leader");
      }
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use gbedu_core::domain::{ArtistPatch, NewArtist};

  #[test]
  fn clones_share_the_counter() {
    let store = ArtistStore::new();
    let reporter = LogReporter::new();
    store.subscribe(reporter.clone());

    let id = store.create_artist(NewArtist::registration("Ruger")).unwrap();
    store.update_artist(&id, ArtistPatch::new().aeh_score(77.0)).unwrap();
    assert!(store.update_artist(&"missing".into(), ArtistPatch::new()).is_err());

    assert_eq!(reporter.reported(), 2);
  }
}
