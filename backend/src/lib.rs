pub mod config;
pub mod infrastructure;
pub mod seed;

use std::sync::Arc;

use anyhow::Context;
use gbedu_core::{ArtistStore, Subscription};
use gbedu_core::ports::SystemClock;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingSettings, StoreSettings};
use infrastructure::reporter::LogReporter;

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over the
/// configured level.
pub fn init_tracing(settings: &LoggingSettings) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.level));
  // A subscriber may already be installed (tests, embedding apps).
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Builds a store from settings, attaches `reporter` and then loads the seed
/// file if one is configured, so the load is reported too.
pub fn init_store(settings: &StoreSettings, reporter: LogReporter) -> anyhow::Result<(ArtistStore, Subscription)> {
  let store = ArtistStore::with_options(Arc::new(SystemClock), settings.store_options());
  let subscription = store.subscribe(reporter);

  if let Some(seed_file) = &settings.seed_file {
    seed::load_seed(&store, seed_file).with_context(|| format!("loading seed {}", seed_file.display()))?;
  }

  Ok((store, subscription))
}

pub fn run() -> anyhow::Result<()> {
  // Logging first so config problems are reported.
  let logging = LoggingSettings::load().unwrap_or_else(|e| {
    eprintln!("logging config unavailable ({e}), using defaults");
    LoggingSettings::default()
  });
  init_tracing(&logging);

  let settings = match StoreSettings::load() {
    Ok(s) => s,
    Err(e) => {
      warn!(error = %e, "store config unavailable, using defaults");
      StoreSettings::default()
    }
  };

  let (store, subscription) = init_store(&settings, LogReporter::new())?;

  for entry in store.ranked_artists(settings.default_top_limit) {
    info!(
      rank = entry.rank,
      tier = %entry.tier,
      name = %entry.artist.name,
      aeh = %entry.artist.aeh_score,
      lds = %entry.artist.lds_score,
      aei = %entry.artist.aei_score,
      "ranking"
    );
  }

  subscription.unsubscribe();
  Ok(())
}
