use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ArtistId, StudentId, VibeCheckId};
use crate::domain::rating::VibeRating;
use crate::errors::StoreError;

/// A student's rating of an artist. Append-only: never edited or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeCheck {
  pub id: VibeCheckId,
  pub artist_id: ArtistId,
  pub student_id: StudentId,
  pub rating: VibeRating,
  #[serde(default)]
  pub video_url: Option<String>,
  #[serde(default)]
  pub comment: Option<String>,
  /// Copied from the student at submission time and not kept in sync.
  pub university: String,
  pub created_at: DateTime<Utc>,
}

/// Input of `record_vibe_check`. The rating is range-checked on submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVibeCheck {
  pub id: VibeCheckId,
  pub artist_id: ArtistId,
  pub student_id: StudentId,
  pub rating: u8,
  pub video_url: Option<String>,
  pub comment: Option<String>,
  pub university: String,
  pub created_at: Option<DateTime<Utc>>,
}

impl NewVibeCheck {
  pub fn new(artist_id: impl Into<ArtistId>, student_id: impl Into<StudentId>, rating: u8) -> Self {
    Self {
      id: VibeCheckId::new(),
      artist_id: artist_id.into(),
      student_id: student_id.into(),
      rating,
      video_url: None,
      comment: None,
      university: String::from("Unknown"),
      created_at: None,
    }
  }

  pub fn with_id(mut self, id: impl Into<VibeCheckId>) -> Self {
    self.id = id.into();
    self
  }

  pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
    self.comment = Some(comment.into());
    self
  }

  pub fn with_video_url(mut self, url: impl Into<String>) -> Self {
    self.video_url = Some(url.into());
    self
  }

  pub fn from_university(mut self, university: impl Into<String>) -> Self {
    self.university = university.into();
    self
  }

  pub(crate) fn into_vibe_check(self, now: DateTime<Utc>) -> Result<VibeCheck, StoreError> {
    let rating = VibeRating::new(self.rating)
      .ok_or_else(|| StoreError::Validation(format!("rating {} is outside [1, 5]", self.rating)))?;

    Ok(VibeCheck {
      id: self.id,
      artist_id: self.artist_id,
      student_id: self.student_id,
      rating,
      video_url: self.video_url,
      comment: self.comment,
      university: self.university,
      created_at: self.created_at.unwrap_or(now),
    })
  }
}
