use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Display;
use std::hash::Hash;

use chrono::{DateTime, Utc};

use crate::domain::{
  Artist, ArtistId, ArtistPatch, Cluster, NewArtist, NewVibeCheck, VibeCheck, VibeCheckId,
};
use crate::errors::StoreError;
use crate::store::{Change, NotifierState, StoreEvent};

/// The three collections plus bookkeeping.
///
/// Every mutating method validates everything first and only then writes, so
/// an `Err` leaves the state untouched.
#[derive(Debug, Default, Clone)]
pub(crate) struct StoreState {
  pub(crate) artists: Vec<Artist>,
  artist_index: HashMap<ArtistId, usize>,
  pub(crate) vibe_checks: Vec<VibeCheck>,
  vibe_check_ids: HashSet<VibeCheckId>,
  pub(crate) clusters: Vec<Cluster>,
  pub(crate) selected: Option<ArtistId>,
  pub(crate) version: u64,
}

/// Committed state plus mutations accepted while a notification cycle runs.
///
/// A staged entry holds the full state after its mutation, built on top of
/// the previous entry, so entries are applied one by one in order.
#[derive(Debug, Default)]
pub(crate) struct Ledger {
  pub(crate) committed: StoreState,
  pub(crate) staged: VecDeque<(StoreState, StoreEvent)>,
  pub(crate) cycle: NotifierState,
}

impl Ledger {
  /// The state the next mutation builds on.
  pub(crate) fn latest(&self) -> &StoreState {
    self.staged.back().map_or(&self.committed, |(state, _)| state)
  }
}

impl StoreState {
  pub(crate) fn artist(&self, id: &ArtistId) -> Option<&Artist> {
    self.artist_index.get(id).map(|&i| &self.artists[i])
  }

  pub(crate) fn contains_artist(&self, id: &ArtistId) -> bool {
    self.artist_index.contains_key(id)
  }

  pub(crate) fn replace_artists(&mut self, artists: Vec<Artist>) -> Result<Change, StoreError> {
    let mut index = HashMap::with_capacity(artists.len());
    for (i, artist) in artists.iter().enumerate() {
      if index.insert(artist.id.clone(), i).is_some() {
        return Err(StoreError::Validation(format!("duplicate artist id {}", artist.id)));
      }
    }

    let count = artists.len();
    self.artists = artists;
    self.artist_index = index;

    if self.selected.as_ref().is_some_and(|id| !self.artist_index.contains_key(id)) {
      self.selected = None;
    }

    Ok(Change::ArtistsReplaced { count })
  }

  pub(crate) fn create_artist(&mut self, input: NewArtist, now: DateTime<Utc>) -> Result<Change, StoreError> {
    if self.artist_index.contains_key(&input.id) {
      return Err(StoreError::Conflict(format!("artist {} already exists", input.id)));
    }

    let artist = input.into_artist(now)?;
    let id = artist.id.clone();
    self.artist_index.insert(id.clone(), self.artists.len());
    self.artists.push(artist);

    Ok(Change::ArtistCreated(id))
  }

  pub(crate) fn update_artist(
    &mut self,
    id: &ArtistId,
    patch: &ArtistPatch,
    now: DateTime<Utc>,
  ) -> Result<Change, StoreError> {
    let &i = self.artist_index.get(id).ok_or_else(|| StoreError::NotFound(format!("artist {id}")))?;

    let patched = patch.apply_to(&self.artists[i], now)?;
    self.artists[i] = patched;

    Ok(Change::ArtistUpdated(id.clone()))
  }

  pub(crate) fn replace_vibe_checks(&mut self, vibe_checks: Vec<VibeCheck>) -> Result<Change, StoreError> {
    ensure_unique("vibe check", vibe_checks.iter().map(|c| &c.id))?;

    let count = vibe_checks.len();
    self.vibe_check_ids = vibe_checks.iter().map(|c| c.id.clone()).collect();
    self.vibe_checks = vibe_checks;

    Ok(Change::VibeChecksReplaced { count })
  }

  pub(crate) fn record_vibe_check(
    &mut self,
    input: NewVibeCheck,
    now: DateTime<Utc>,
  ) -> Result<Change, StoreError> {
    let check = input.into_vibe_check(now)?;

    if !self.contains_artist(&check.artist_id) {
      return Err(StoreError::NotFound(format!("artist {}", check.artist_id)));
    }
    if self.vibe_check_ids.contains(&check.id) {
      return Err(StoreError::Conflict(format!("vibe check {} already recorded", check.id)));
    }

    let change = Change::VibeCheckRecorded { id: check.id.clone(), artist_id: check.artist_id.clone() };
    self.vibe_check_ids.insert(check.id.clone());
    self.vibe_checks.push(check);

    Ok(change)
  }

  pub(crate) fn replace_clusters(&mut self, clusters: Vec<Cluster>) -> Result<Change, StoreError> {
    ensure_unique("cluster", clusters.iter().map(|c| &c.id))?;

    let count = clusters.len();
    self.clusters = clusters;

    Ok(Change::ClustersReplaced { count })
  }

  pub(crate) fn select_artist(&mut self, id: Option<ArtistId>) -> Result<Change, StoreError> {
    if let Some(id) = &id {
      if !self.contains_artist(id) {
        return Err(StoreError::NotFound(format!("artist {id}")));
      }
    }

    self.selected = id.clone();
    Ok(Change::SelectionChanged(id))
  }
}

fn ensure_unique<'a, T>(kind: &str, ids: impl Iterator<Item = &'a T>) -> Result<(), StoreError>
where
  T: Eq + Hash + Display + 'a,
{
  let mut seen = HashSet::new();
  for id in ids {
    if !seen.insert(id) {
      return Err(StoreError::Validation(format!("duplicate {kind} id {id}")));
    }
  }
  Ok(())
}
