use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Declares an opaque string identifier.
///
/// Ids coming from bulk loads keep whatever text they were given ("1", a
/// timestamp, a UUID...). Freshly generated ids are UUID v4 strings. Ordering
/// is plain lexicographic, which is what ranking tie-breaks rely on.
macro_rules! string_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      /// Generates a new unique identifier.
      pub fn new() -> Self {
        $name(Uuid::new_v4().to_string())
      }

      pub fn as_str(&self) -> &str {
        &self.0
      }
    }

    impl Default for $name {
      fn default() -> Self {
        Self::new()
      }
    }

    impl From<&str> for $name {
      fn from(s: &str) -> Self {
        $name(s.to_owned())
      }
    }

    impl From<String> for $name {
      fn from(s: String) -> Self {
        $name(s)
      }
    }

    impl From<$name> for String {
      fn from(id: $name) -> Self {
        id.0
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }
  };
}

string_id!(
  /// Identifier of an [`Artist`](crate::domain::Artist). Immutable once assigned.
  ArtistId
);

string_id!(
  /// Identifier of a single vibe check submission.
  VibeCheckId
);

string_id!(
  /// Identifier of an externally computed audience cluster.
  ClusterId
);

string_id!(
  /// The submitting student. Opaque here: users are not modeled by the core.
  StudentId
);
