use std::fs;
use std::path::Path;

use gbedu_core::domain::{Artist, Cluster, VibeCheck};
use gbedu_core::{ArtistStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum SeedError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid seed document: {0}")]
  Json(#[from] serde_json::Error),

  #[error("seed rejected by store: {0}")]
  Store(#[from] StoreError),
}

/// Bootstrap data, e.g. the demo population shown before real data arrives.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Seed {
  #[serde(default)]
  pub artists: Vec<Artist>,
  #[serde(default)]
  pub vibe_checks: Vec<VibeCheck>,
  #[serde(default)]
  pub clusters: Vec<Cluster>,
}

pub fn read_seed(path: &Path) -> Result<Seed, SeedError> {
  let content = fs::read_to_string(path)?;
  Ok(serde_json::from_str(&content)?)
}

/// Replaces artists, then vibe checks, then clusters.
///
/// Each replace is atomic on its own; a failure stops the load at that
/// collection and reports the store error.
pub fn apply_seed(store: &ArtistStore, seed: Seed) -> Result<(), SeedError> {
  let (artists, vibe_checks, clusters) = (seed.artists.len(), seed.vibe_checks.len(), seed.clusters.len());

  store.replace_artists(seed.artists)?;
  store.replace_vibe_checks(seed.vibe_checks)?;
  store.replace_clusters(seed.clusters)?;

  info!(artists, vibe_checks, clusters, "seed loaded");
  Ok(())
}

pub fn load_seed(store: &ArtistStore, path: &Path) -> Result<(), SeedError> {
  apply_seed(store, read_seed(path)?)
}
