use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::ArtistId;
use crate::domain::score::Score;
use crate::errors::StoreError;

/// An artist registered on the platform.
///
/// Created once when registration completes; afterwards only the profile and
/// the three scores change. Artists are never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
  /// Unique for the lifetime of the store.
  pub id: ArtistId,

  /// Display name, never empty.
  pub name: String,

  #[serde(default)]
  pub social_links: SocialLinks,

  /// Audience engagement (AEHI) score.
  pub aeh_score: Score,

  /// LDS score.
  pub lds_score: Score,

  /// AEI score.
  pub aei_score: Score,

  /// Free-text university affiliation.
  #[serde(default)]
  pub university: Option<String>,

  pub created_at: DateTime<Utc>,

  /// Advances on every accepted update.
  pub updated_at: DateTime<Utc>,
}

/// Links to the artist's public profiles. Informational only, not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLinks {
  pub youtube: Option<String>,
  pub tiktok: Option<String>,
  pub instagram: Option<String>,
}

/// Input of `create_artist`.
///
/// Scores are raw numbers here; they are range-checked when the store turns
/// this into an [`Artist`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewArtist {
  pub id: ArtistId,
  pub name: String,
  pub social_links: SocialLinks,
  pub aeh_score: f64,
  pub lds_score: f64,
  pub aei_score: f64,
  pub university: Option<String>,
  pub created_at: Option<DateTime<Utc>>,
  pub updated_at: Option<DateTime<Utc>>,
}

impl NewArtist {
  /// What the registration flow submits: a fresh id and zeroed scores.
  pub fn registration(name: impl Into<String>) -> Self {
    Self {
      id: ArtistId::new(),
      name: name.into(),
      social_links: SocialLinks::default(),
      aeh_score: 0.0,
      lds_score: 0.0,
      aei_score: 0.0,
      university: None,
      created_at: None,
      updated_at: None,
    }
  }

  pub fn with_id(mut self, id: impl Into<ArtistId>) -> Self {
    self.id = id.into();
    self
  }

  pub fn with_scores(mut self, aeh: f64, lds: f64, aei: f64) -> Self {
    self.aeh_score = aeh;
    self.lds_score = lds;
    self.aei_score = aei;
    self
  }

  pub fn with_university(mut self, university: impl Into<String>) -> Self {
    self.university = Some(university.into());
    self
  }

  pub fn with_social_links(mut self, links: SocialLinks) -> Self {
    self.social_links = links;
    self
  }

  pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
    self.created_at = Some(at);
    self
  }

  /// Validates the input and stamps missing timestamps with `now`.
  pub(crate) fn into_artist(self, now: DateTime<Utc>) -> Result<Artist, StoreError> {
    let name = validate_name(self.name)?;
    let created_at = self.created_at.unwrap_or(now);

    Ok(Artist {
      aeh_score: validate_score("aeh_score", self.aeh_score)?,
      lds_score: validate_score("lds_score", self.lds_score)?,
      aei_score: validate_score("aei_score", self.aei_score)?,
      id: self.id,
      name,
      social_links: self.social_links,
      university: self.university,
      created_at,
      updated_at: self.updated_at.unwrap_or(created_at),
    })
  }
}

/// Merge-patch for `update_artist`: `Some` fields overwrite, `None` fields
/// are left untouched. The id and `created_at` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArtistPatch {
  pub name: Option<String>,
  pub youtube: Option<String>,
  pub tiktok: Option<String>,
  pub instagram: Option<String>,
  pub aeh_score: Option<f64>,
  pub lds_score: Option<f64>,
  pub aei_score: Option<f64>,
  pub university: Option<String>,
}

impl ArtistPatch {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn aeh_score(mut self, value: f64) -> Self {
    self.aeh_score = Some(value);
    self
  }

  pub fn lds_score(mut self, value: f64) -> Self {
    self.lds_score = Some(value);
    self
  }

  pub fn aei_score(mut self, value: f64) -> Self {
    self.aei_score = Some(value);
    self
  }

  pub fn name(mut self, value: impl Into<String>) -> Self {
    self.name = Some(value.into());
    self
  }

  pub fn university(mut self, value: impl Into<String>) -> Self {
    self.university = Some(value.into());
    self
  }

  /// Produces the patched record without touching `current`.
  ///
  /// `updated_at` is strictly monotonic: if the clock has not moved past the
  /// previous stamp, it is bumped by one microsecond.
  pub(crate) fn apply_to(&self, current: &Artist, now: DateTime<Utc>) -> Result<Artist, StoreError> {
    let mut next = current.clone();

    if let Some(name) = &self.name {
      next.name = validate_name(name.clone())?;
    }
    if let Some(v) = self.aeh_score {
      next.aeh_score = validate_score("aeh_score", v)?;
    }
    if let Some(v) = self.lds_score {
      next.lds_score = validate_score("lds_score", v)?;
    }
    if let Some(v) = self.aei_score {
      next.aei_score = validate_score("aei_score", v)?;
    }
    if let Some(url) = &self.youtube {
      next.social_links.youtube = Some(url.clone());
    }
    if let Some(url) = &self.tiktok {
      next.social_links.tiktok = Some(url.clone());
    }
    if let Some(url) = &self.instagram {
      next.social_links.instagram = Some(url.clone());
    }
    if let Some(university) = &self.university {
      next.university = Some(university.clone());
    }

    let bumped = current
      .updated_at
      .checked_add_signed(Duration::microseconds(1))
      .ok_or_else(|| StoreError::Validation("updated_at is at the end of the representable range".into()))?;
    next.updated_at = now.max(bumped);
    Ok(next)
  }
}

fn validate_name(name: String) -> Result<String, StoreError> {
  if name.trim().is_empty() {
    return Err(StoreError::Validation("artist name must not be empty".into()));
  }
  Ok(name)
}

fn validate_score(field: &str, value: f64) -> Result<Score, StoreError> {
  Score::new(value).ok_or_else(|| StoreError::Validation(format!("{field} {value} is outside [0, 100]")))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
  }

  #[test]
  fn registration_stamps_missing_timestamps() {
    let artist = NewArtist::registration("Asake").into_artist(t(10)).unwrap();
    assert_eq!(artist.created_at, t(10));
    assert_eq!(artist.updated_at, t(10));
    assert_eq!(artist.aeh_score, Score::ZERO);
  }

  #[test]
  fn rejects_blank_name_and_bad_scores() {
    let err = NewArtist::registration("   ").into_artist(t(0)).unwrap_err();
    assert!(err.is_validation());

    let err = NewArtist::registration("Rema").with_scores(50.0, 120.0, 0.0).into_artist(t(0)).unwrap_err();
    assert!(err.is_validation());
  }

  #[test]
  fn patch_merges_only_supplied_fields() {
    let artist = NewArtist::registration("Tems").with_scores(60.0, 61.0, 62.0).into_artist(t(1)).unwrap();
    let patched = ArtistPatch::new().aeh_score(42.0).apply_to(&artist, t(5)).unwrap();

    assert_eq!(patched.aeh_score.as_f64(), 42.0);
    assert_eq!(patched.lds_score, artist.lds_score);
    assert_eq!(patched.name, artist.name);
    assert_eq!(patched.created_at, artist.created_at);
    assert_eq!(patched.updated_at, t(5));
  }

  #[test]
  fn updated_at_advances_even_when_clock_stalls() {
    let artist = NewArtist::registration("Ayra").into_artist(t(5)).unwrap();
    let patched = ArtistPatch::new().apply_to(&artist, t(5)).unwrap();
    assert!(patched.updated_at > artist.updated_at);
  }

  #[test]
  fn patch_rejects_timestamp_that_cannot_advance() {
    let mut artist = NewArtist::registration("Ckay").into_artist(t(0)).unwrap();
    artist.updated_at = DateTime::<Utc>::MAX_UTC;
    let err = ArtistPatch::new().aeh_score(10.0).apply_to(&artist, t(1)).unwrap_err();
    assert!(err.is_validation());
  }

  #[test]
  fn patch_rejects_out_of_range_score() {
    let artist = NewArtist::registration("Fola").into_artist(t(0)).unwrap();
    let err = ArtistPatch::new().lds_score(-3.0).apply_to(&artist, t(1)).unwrap_err();
    assert!(err.is_validation());
  }
}
