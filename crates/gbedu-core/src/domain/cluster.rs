use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::ids::ClusterId;

/// An audience cluster computed outside the core.
///
/// Clusters are only stored and served; a fresh computation replaces the
/// whole set at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
  pub id: ClusterId,
  pub name: String,
  #[serde(default)]
  pub keywords: BTreeSet<String>,
  pub artist_count: u32,
  #[serde(default)]
  pub description: String,
}
