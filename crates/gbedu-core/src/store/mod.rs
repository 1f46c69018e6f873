//! The entity store: single owner of artists, vibe checks and clusters.
//!
//! All writes go through the mutation methods on [`ArtistStore`]; they are
//! synchronous and all-or-nothing. Readers get owned copies, never a handle
//! into the internal collections.

mod events;
mod notifier;
mod state;

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{
  Artist, ArtistId, ArtistPatch, Cluster, NewArtist, NewVibeCheck, VibeCheck,
};
use crate::errors::StoreError;
use crate::ports::{Clock, ObserverError, StoreObserver, SystemClock};
use crate::queries::{self, RankedArtist, VibeSummary};

pub use events::{Change, StoreEvent};
pub use notifier::{NotifierState, Subscription, SubscriptionId};

use notifier::Notifier;
use state::{Ledger, StoreState};

/// Tunables for a store instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
  /// Size of the ranking served by [`ArtistStore::top_artists_default`].
  #[serde(default = "default_top_limit")]
  pub default_top_limit: usize,
}

fn default_top_limit() -> usize {
  10
}

impl Default for StoreOptions {
  fn default() -> Self {
    StoreOptions { default_top_limit: default_top_limit() }
  }
}

/// A consistent copy of everything in the store at one version.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreSnapshot {
  pub version: u64,
  pub artists: Vec<Artist>,
  pub vibe_checks: Vec<VibeCheck>,
  pub clusters: Vec<Cluster>,
  pub selected: Option<ArtistId>,
}

impl StoreSnapshot {
  pub fn top_artists(&self, limit: usize) -> Vec<Artist> {
    queries::top_artists(&self.artists, limit)
  }

  pub fn vibe_checks_for_artist(&self, artist_id: &ArtistId) -> Vec<VibeCheck> {
    queries::vibe_checks_for_artist(&self.vibe_checks, artist_id)
  }
}

pub struct ArtistStore {
  ledger: Mutex<Ledger>,
  notifier: Arc<Notifier>,
  clock: Arc<dyn Clock>,
  options: StoreOptions,
}

impl Default for ArtistStore {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for ArtistStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ArtistStore")
      .field("version", &self.version())
      .field("notifier", &self.notifier)
      .field("options", &self.options)
      .finish_non_exhaustive()
  }
}

/// Ends the cycle if delivery unwinds past the store.
struct CycleGuard<'a> {
  store: &'a ArtistStore,
  armed: bool,
}

impl Drop for CycleGuard<'_> {
  fn drop(&mut self) {
    if self.armed {
      let mut ledger = self.store.lock_ledger();
      if let Some((state, _)) = ledger.staged.pop_back() {
        ledger.committed = state;
      }
      ledger.staged.clear();
      ledger.cycle = NotifierState::Idle;
    }
  }
}

impl ArtistStore {
  pub fn new() -> Self {
    Self::with_clock(Arc::new(SystemClock))
  }

  pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
    Self::with_options(clock, StoreOptions::default())
  }

  pub fn with_options(clock: Arc<dyn Clock>, options: StoreOptions) -> Self {
    Self { ledger: Mutex::new(Ledger::default()), notifier: Arc::new(Notifier::new()), clock, options }
  }

  pub fn options(&self) -> &StoreOptions {
    &self.options
  }

  // State is only written after validation, so a poisoned lock still guards
  // a consistent state.
  fn lock_ledger(&self) -> MutexGuard<'_, Ledger> {
    self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
  }

  fn read<T>(&self, f: impl FnOnce(&StoreState) -> T) -> T {
    f(&self.lock_ledger().committed)
  }

  /// Validates and applies `op`, then notifies observers with the lock
  /// released.
  ///
  /// While a cycle is running (an observer mutating, or another thread racing
  /// one) the mutation is checked against the newest accepted state and
  /// queued. It becomes visible, and its event is delivered, once every
  /// observer has seen the event before it.
  fn commit<F>(&self, action: &'static str, op: F) -> Result<(), StoreError>
  where
    F: FnOnce(&mut StoreState, DateTime<Utc>) -> Result<Change, StoreError>,
  {
    let now = self.clock.now();
    let event = {
      let mut ledger = self.lock_ledger();
      match ledger.cycle {
        NotifierState::Notifying => {
          let mut next = ledger.latest().clone();
          let change = rejected(action, op(&mut next, now))?;
          next.version += 1;
          let event = StoreEvent { version: next.version, change };
          debug!(action, version = event.version, change = ?event.change, "store mutation staged");
          ledger.staged.push_back((next, event));
          return Ok(());
        }
        NotifierState::Idle => {
          let change = rejected(action, op(&mut ledger.committed, now))?;
          ledger.committed.version += 1;
          ledger.cycle = NotifierState::Notifying;
          let event = StoreEvent { version: ledger.committed.version, change };
          debug!(action, version = event.version, change = ?event.change, "store mutation committed");
          event
        }
      }
    };

    self.run_cycles(event);
    Ok(())
  }

  fn run_cycles(&self, first: StoreEvent) {
    let mut guard = CycleGuard { store: self, armed: true };
    let mut event = first;
    loop {
      self.notifier.deliver(self, &event);

      let mut ledger = self.lock_ledger();
      let staged = ledger.staged.pop_front();
      match staged {
        Some((state, next)) => {
          ledger.committed = state;
          event = next;
        }
        None => {
          ledger.cycle = NotifierState::Idle;
          guard.armed = false;
          return;
        }
      }
    }
  }

  // -------- MUTATIONS --------

  /// Replaces the whole artist collection. Meant for bootstrap and bulk loads.
  pub fn replace_artists(&self, artists: Vec<Artist>) -> Result<(), StoreError> {
    self.commit("replace_artists", |state, _| state.replace_artists(artists))
  }

  pub fn create_artist(&self, artist: NewArtist) -> Result<ArtistId, StoreError> {
    let id = artist.id.clone();
    self.commit("create_artist", |state, now| state.create_artist(artist, now))?;
    Ok(id)
  }

  pub fn update_artist(&self, id: &ArtistId, patch: ArtistPatch) -> Result<(), StoreError> {
    self.commit("update_artist", |state, now| state.update_artist(id, &patch, now))
  }

  pub fn replace_vibe_checks(&self, vibe_checks: Vec<VibeCheck>) -> Result<(), StoreError> {
    self.commit("replace_vibe_checks", |state, _| state.replace_vibe_checks(vibe_checks))
  }

  pub fn record_vibe_check(&self, vibe_check: NewVibeCheck) -> Result<(), StoreError> {
    self.commit("record_vibe_check", |state, now| state.record_vibe_check(vibe_check, now))
  }

  pub fn replace_clusters(&self, clusters: Vec<Cluster>) -> Result<(), StoreError> {
    self.commit("replace_clusters", |state, _| state.replace_clusters(clusters))
  }

  /// Focuses an artist (e.g. the target of an open rating form). `None` clears.
  pub fn select_artist(&self, id: Option<ArtistId>) -> Result<(), StoreError> {
    self.commit("select_artist", |state, _| state.select_artist(id))
  }

  // -------- SUBSCRIPTIONS --------

  pub fn subscribe(&self, observer: impl StoreObserver + 'static) -> Subscription {
    let id = self.notifier.subscribe(Arc::new(observer));
    Subscription::new(id, &self.notifier)
  }

  /// Same as [`ArtistStore::subscribe`], with closure signature inference.
  pub fn subscribe_fn<F>(&self, f: F) -> Subscription
  where
    F: Fn(&ArtistStore, &StoreEvent) -> Result<(), ObserverError> + Send + Sync + 'static,
  {
    self.subscribe(f)
  }

  pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
    self.notifier.unsubscribe(id)
  }

  pub fn observer_count(&self) -> usize {
    self.notifier.observer_count()
  }

  pub fn notifier_state(&self) -> NotifierState {
    self.lock_ledger().cycle
  }

  // -------- QUERY (read) --------

  /// Number of committed mutations so far. Staged mutations are not counted
  /// until their turn in the cycle.
  pub fn version(&self) -> u64 {
    self.read(|state| state.version)
  }

  pub fn snapshot(&self) -> StoreSnapshot {
    self.read(|state| StoreSnapshot {
      version: state.version,
      artists: state.artists.clone(),
      vibe_checks: state.vibe_checks.clone(),
      clusters: state.clusters.clone(),
      selected: state.selected.clone(),
    })
  }

  pub fn artists(&self) -> Vec<Artist> {
    self.read(|state| state.artists.clone())
  }

  pub fn vibe_checks(&self) -> Vec<VibeCheck> {
    self.read(|state| state.vibe_checks.clone())
  }

  pub fn clusters(&self) -> Vec<Cluster> {
    self.read(|state| state.clusters.clone())
  }

  pub fn artist(&self, id: &ArtistId) -> Option<Artist> {
    self.read(|state| state.artist(id).cloned())
  }

  pub fn contains_artist(&self, id: &ArtistId) -> bool {
    self.read(|state| state.contains_artist(id))
  }

  pub fn selected_artist(&self) -> Option<Artist> {
    self.read(|state| state.selected.as_ref().and_then(|id| state.artist(id)).cloned())
  }

  pub fn top_artists(&self, limit: usize) -> Vec<Artist> {
    self.read(|state| queries::top_artists(&state.artists, limit))
  }

  pub fn top_artists_default(&self) -> Vec<Artist> {
    self.top_artists(self.options.default_top_limit)
  }

  pub fn ranked_artists(&self, limit: usize) -> Vec<RankedArtist> {
    self.read(|state| queries::ranked_artists(&state.artists, limit))
  }

  pub fn artists_by_university(&self, university: &str) -> Vec<Artist> {
    self.read(|state| queries::artists_by_university(&state.artists, university))
  }

  pub fn search_artists(&self, term: &str) -> Vec<Artist> {
    self.read(|state| queries::search_artists(&state.artists, term))
  }

  pub fn vibe_checks_for_artist(&self, artist_id: &ArtistId) -> Vec<VibeCheck> {
    self.read(|state| queries::vibe_checks_for_artist(&state.vibe_checks, artist_id))
  }

  pub fn vibe_checks_by_university(&self, university: &str) -> Vec<VibeCheck> {
    self.read(|state| queries::vibe_checks_by_university(&state.vibe_checks, university))
  }

  pub fn vibe_summary(&self, artist_id: &ArtistId) -> VibeSummary {
    self.read(|state| queries::vibe_summary(&state.vibe_checks, artist_id))
  }

  pub fn vibe_counts(&self) -> BTreeMap<ArtistId, usize> {
    self.read(|state| queries::vibe_counts(&state.artists, &state.vibe_checks))
  }
}

fn rejected<T>(action: &'static str, result: Result<T, StoreError>) -> Result<T, StoreError> {
  result.inspect_err(|e| warn!(action, error = %e, "store mutation rejected"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ports::ManualClock;
  use chrono::Duration;

  fn store() -> (ArtistStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH));
    (ArtistStore::with_clock(clock.clone()), clock)
  }

  #[test]
  fn version_counts_successful_mutations_only() {
    let (store, _) = store();
    store.create_artist(NewArtist::registration("Asake").with_id("1")).unwrap();
    assert!(store.create_artist(NewArtist::registration("Dup").with_id("1")).is_err());
    store.update_artist(&"1".into(), ArtistPatch::new().aeh_score(10.0)).unwrap();
    assert_eq!(store.version(), 2);
  }

  #[test]
  fn create_stamps_with_clock() {
    let (store, clock) = store();
    clock.advance(Duration::seconds(30));
    let id = store.create_artist(NewArtist::registration("Rema")).unwrap();
    let artist = store.artist(&id).unwrap();
    assert_eq!(artist.created_at, DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(30));
    assert_eq!(artist.updated_at, artist.created_at);
  }

  #[test]
  fn conflict_is_reported_before_validation() {
    let (store, _) = store();
    store.create_artist(NewArtist::registration("Asake").with_id("1")).unwrap();
    let err = store.create_artist(NewArtist::registration("").with_id("1")).unwrap_err();
    assert!(err.is_conflict());
  }

  #[test]
  fn selection_requires_known_artist() {
    let (store, _) = store();
    store.create_artist(NewArtist::registration("Tems").with_id("t")).unwrap();

    assert!(store.select_artist(Some("nope".into())).unwrap_err().is_not_found());
    assert!(store.selected_artist().is_none());

    store.select_artist(Some("t".into())).unwrap();
    assert_eq!(store.selected_artist().map(|a| a.name), Some("Tems".to_string()));

    store.replace_artists(Vec::new()).unwrap();
    assert!(store.selected_artist().is_none());
    assert!(store.snapshot().selected.is_none());
  }

  #[test]
  fn default_top_limit_comes_from_options() {
    let clock = Arc::new(ManualClock::new(DateTime::<Utc>::UNIX_EPOCH));
    let store = ArtistStore::with_options(clock, StoreOptions { default_top_limit: 2 });
    for name in ["A", "B", "C"] {
      store.create_artist(NewArtist::registration(name)).unwrap();
    }
    assert_eq!(store.top_artists_default().len(), 2);
  }

  #[test]
  fn duplicate_vibe_check_id_conflicts() {
    let (store, _) = store();
    store.create_artist(NewArtist::registration("Fave").with_id("f")).unwrap();
    store.record_vibe_check(NewVibeCheck::new("f", "s1", 4).with_id("v")).unwrap();
    let err = store.record_vibe_check(NewVibeCheck::new("f", "s2", 5).with_id("v")).unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(store.vibe_checks().len(), 1);
  }
}
