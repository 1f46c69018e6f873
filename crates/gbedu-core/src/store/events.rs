use serde::Serialize;

use crate::domain::ids::{ArtistId, VibeCheckId};

/// What a committed mutation changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Change {
  ArtistsReplaced { count: usize },
  ArtistCreated(ArtistId),
  ArtistUpdated(ArtistId),
  VibeChecksReplaced { count: usize },
  VibeCheckRecorded { id: VibeCheckId, artist_id: ArtistId },
  ClustersReplaced { count: usize },
  SelectionChanged(Option<ArtistId>),
}

/// Delivered to observers once per committed mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreEvent {
  /// Store version right after the mutation. Strictly increasing.
  pub version: u64,
  pub change: Change,
}
