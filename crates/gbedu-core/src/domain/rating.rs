use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single vibe check rating: an integer from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct VibeRating(u8);

impl VibeRating {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  /// Returns `None` unless `value` is in `1..=5`.
  pub fn new(value: u8) -> Option<Self> {
    (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
  }

  pub fn get(&self) -> u8 {
    self.0
  }

  /// Short caption shown by the rating form.
  pub fn label(&self) -> &'static str {
    match self.0 {
      1 => "Not feeling it",
      2 => "Meh",
      3 => "It's okay",
      4 => "Pretty good",
      _ => "Fire!",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating {0} is outside [1, 5]")]
pub struct RatingRangeError(pub u8);

impl TryFrom<u8> for VibeRating {
  type Error = RatingRangeError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    VibeRating::new(value).ok_or(RatingRangeError(value))
  }
}

impl From<VibeRating> for u8 {
  fn from(rating: VibeRating) -> Self {
    rating.0
  }
}

impl fmt::Display for VibeRating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write_stars(f, self.0 as usize)
  }
}

/// Average rating of an artist's vibe checks.
///
/// Distinguishes explicitly between:
/// - [`AvgRating::Unrated`]: nobody has submitted a vibe check yet.
/// - [`AvgRating::Rated`]: at least one vibe check exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AvgRating {
  #[default]
  Unrated,
  Rated(Rating),
}

impl AvgRating {
  /// Averages a sequence of ratings using integer arithmetic, so the same
  /// input always produces the same value.
  pub fn from_ratings<I>(ratings: I) -> Self
  where
    I: IntoIterator<Item = VibeRating>,
  {
    let (sum, count) =
      ratings.into_iter().fold((0u64, 0u64), |(sum, count), r| (sum + r.get() as u64, count + 1));

    if count == 0 {
      return AvgRating::Unrated;
    }

    let scale = Rating::SCALE_FACTOR as u64;
    let scaled = (sum * scale + count / 2) / count;
    AvgRating::Rated(Rating(scaled as u32))
  }

  pub fn as_f32(&self) -> Option<f32> {
    match self {
      AvgRating::Unrated => None,
      AvgRating::Rated(rating) => Some(rating.as_f32()),
    }
  }
}

impl fmt::Display for AvgRating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      AvgRating::Unrated => write!(f, "☆☆☆☆☆"),
      AvgRating::Rated(rating) => fmt::Display::fmt(rating, f),
    }
  }
}

/// A rating on a 0.0 to 5.0 scale with fixed precision.
///
/// Internally an integer (`u32`) in fixed-point format with 4 decimals:
///
/// - `0.0`  → `0`
/// - `3.5`  → `35000`
/// - `5.0`  → `50000`
///
/// This avoids the rounding drift of accumulating `f32`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rating(u32);

impl Rating {
  /// Scale factor used to keep 4 decimals.
  const SCALE_FACTOR: u32 = 10_000;
  /// Maximum allowed value: 5.0 scaled.
  const MAX_VALUE: u32 = 5 * Self::SCALE_FACTOR;

  /// Builds a `Rating` from a floating point value in `[0.0, 5.0]`.
  pub fn new(value: f32) -> Option<Self> {
    if !(0.0..=5.0).contains(&value) {
      return None;
    }

    let scaled_value = (value * Self::SCALE_FACTOR as f32).round() as u32;

    if scaled_value > Self::MAX_VALUE {
      return None;
    }

    Some(Self(scaled_value))
  }

  pub fn as_f32(&self) -> f32 {
    self.0 as f32 / Self::SCALE_FACTOR as f32
  }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // floor, not round: 4.9 is still four stars; only 5.0 gets five.
    write_stars(f, self.as_f32().floor() as usize)
  }
}

fn write_stars(f: &mut fmt::Formatter<'_>, full_stars: usize) -> fmt::Result {
  let full_stars = full_stars.min(5);
  for _ in 0..full_stars {
    write!(f, "★")?;
  }
  for _ in full_stars..5 {
    write!(f, "☆")?;
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn vibe_rating_range() {
    assert!(VibeRating::new(0).is_none());
    assert!(VibeRating::new(6).is_none());
    for v in 1..=5 {
      assert_eq!(VibeRating::new(v).map(|r| r.get()), Some(v));
    }
  }

  #[test]
  fn vibe_rating_labels_and_stars() {
    let fire = VibeRating::new(5).unwrap();
    assert_eq!(fire.label(), "Fire!");
    assert_eq!(fire.to_string(), "★★★★★");
    assert_eq!(VibeRating::new(2).unwrap().to_string(), "★★☆☆☆");
    assert_eq!(VibeRating::new(1).unwrap().label(), "Not feeling it");
  }

  #[test]
  fn average_of_nothing_is_unrated() {
    assert_eq!(AvgRating::from_ratings(std::iter::empty()), AvgRating::Unrated);
    assert_eq!(AvgRating::Unrated.to_string(), "☆☆☆☆☆");
  }

  #[test]
  fn average_uses_fixed_point() {
    let ratings = [4, 5, 5].map(|v| VibeRating::new(v).unwrap());
    let avg = AvgRating::from_ratings(ratings);
    // 14 / 3 = 4.6667
    assert_eq!(avg, AvgRating::Rated(Rating(46_667)));
    assert_eq!(avg.to_string(), "★★★★☆");
  }

  #[test]
  fn rating_rejects_out_of_range() {
    assert!(Rating::new(5.01).is_none());
    assert!(Rating::new(-1.0).is_none());
    assert_eq!(Rating::new(3.5).map(|r| r.as_f32()), Some(3.5));
  }
}
