use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A popularity index (AEHI, LDS or AEI) in the range `[0.0, 100.0]`.
///
/// Stored as a fixed-point integer with two decimals of precision, so:
///
/// - `0.0`   → `0`
/// - `87.5`  → `8750`
/// - `100.0` → `10000`
///
/// The integer representation gives scores a total order, which rankings
/// depend on. Scores are produced by an external scoring service; this type
/// only guarantees they are in range.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Score(u32);

impl Score {
  /// Scale used to keep two decimals.
  const SCALE_FACTOR: u32 = 100;
  /// Maximum allowed value: 100.0 scaled.
  const MAX_VALUE: u32 = 100 * Self::SCALE_FACTOR;

  pub const ZERO: Score = Score(0);
  pub const MAX: Score = Score(Self::MAX_VALUE);

  /// Builds a `Score` from a floating point value.
  ///
  /// Returns `None` when the value is outside `[0.0, 100.0]` or is NaN.
  pub fn new(value: f64) -> Option<Self> {
    if !(0.0..=100.0).contains(&value) {
      return None;
    }

    let scaled_value = (value * Self::SCALE_FACTOR as f64).round() as u32;

    if scaled_value > Self::MAX_VALUE {
      return None;
    }

    Some(Self(scaled_value))
  }

  pub fn as_f64(&self) -> f64 {
    self.0 as f64 / Self::SCALE_FACTOR as f64
  }

  /// Badge tier shown next to the score.
  pub fn tier(&self) -> ScoreTier {
    ScoreTier::from(*self)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("score {0} is outside [0, 100]")]
pub struct ScoreRangeError(pub f64);

impl TryFrom<f64> for Score {
  type Error = ScoreRangeError;

  fn try_from(value: f64) -> Result<Self, Self::Error> {
    Score::new(value).ok_or(ScoreRangeError(value))
  }
}

impl From<Score> for f64 {
  fn from(score: Score) -> Self {
    score.as_f64()
  }
}

impl fmt::Display for Score {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_f64())
  }
}

/// Coarse bands used by dashboards to label and colour a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
  /// Below 30.
  Cold,
  /// 30 and above.
  Cool,
  /// 50 and above.
  Warm,
  /// 70 and above.
  Hot,
  /// 90 and above.
  Fire,
}

impl From<Score> for ScoreTier {
  fn from(score: Score) -> Self {
    match score.0 / Score::SCALE_FACTOR {
      90.. => ScoreTier::Fire,
      70..=89 => ScoreTier::Hot,
      50..=69 => ScoreTier::Warm,
      30..=49 => ScoreTier::Cool,
      _ => ScoreTier::Cold,
    }
  }
}

impl fmt::Display for ScoreTier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let text = match self {
      ScoreTier::Cold => "Cold",
      ScoreTier::Cool => "Cool",
      ScoreTier::Warm => "Warm",
      ScoreTier::Hot => "Hot",
      ScoreTier::Fire => "Fire 🔥",
    };
    f.write_str(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_bounds_and_rejects_outside() {
    assert_eq!(Score::new(0.0), Some(Score::ZERO));
    assert_eq!(Score::new(100.0), Some(Score::MAX));
    assert!(Score::new(-0.01).is_none());
    assert!(Score::new(100.01).is_none());
    assert!(Score::new(f64::NAN).is_none());
  }

  #[test]
  fn keeps_two_decimals() {
    let s = Score::new(87.456).unwrap();
    assert_eq!(s.as_f64(), 87.46);
    assert_eq!(s.to_string(), "87.46");
  }

  #[test]
  fn tiers_follow_thresholds() {
    let tier = |v: f64| Score::new(v).unwrap().tier();
    assert_eq!(tier(100.0), ScoreTier::Fire);
    assert_eq!(tier(90.0), ScoreTier::Fire);
    assert_eq!(tier(89.99), ScoreTier::Hot);
    assert_eq!(tier(70.0), ScoreTier::Hot);
    assert_eq!(tier(69.99), ScoreTier::Warm);
    assert_eq!(tier(50.0), ScoreTier::Warm);
    assert_eq!(tier(49.99), ScoreTier::Cool);
    assert_eq!(tier(30.0), ScoreTier::Cool);
    assert_eq!(tier(29.99), ScoreTier::Cold);
    assert_eq!(tier(0.0), ScoreTier::Cold);
  }

  #[test]
  fn tier_labels() {
    assert_eq!(ScoreTier::Fire.to_string(), "Fire 🔥");
    assert_eq!(ScoreTier::Cool.to_string(), "Cool");
  }

  #[test]
  fn deserializing_out_of_range_fails() {
    assert!(serde_json::from_str::<Score>("101").is_err());
    let s: Score = serde_json::from_str("42.5").unwrap();
    assert_eq!(s.as_f64(), 42.5);
    assert_eq!(serde_json::to_string(&s).unwrap(), "42.5");
  }
}
