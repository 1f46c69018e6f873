//! Read-only derivations over the store's collections.
//!
//! Everything here is a pure function of its inputs and is recomputed on each
//! call; nothing is cached between calls.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Artist, ArtistId, AvgRating, ScoreTier, VibeCheck};

/// Ranking order: `aeh_score` descending, then earlier `created_at`, then
/// lower id. Total, so equal inputs always rank the same way.
pub fn rank_order(a: &Artist, b: &Artist) -> Ordering {
  b.aeh_score
    .cmp(&a.aeh_score)
    .then_with(|| a.created_at.cmp(&b.created_at))
    .then_with(|| a.id.cmp(&b.id))
}

/// The `limit` best artists by AEHI score. `limit == 0` gives an empty list
/// and a limit above the population returns everyone.
pub fn top_artists(artists: &[Artist], limit: usize) -> Vec<Artist> {
  if limit == 0 {
    return Vec::new();
  }

  let mut ranked: Vec<&Artist> = artists.iter().collect();
  ranked.sort_by(|a, b| rank_order(a, b));
  ranked.into_iter().take(limit).cloned().collect()
}

/// An artist with its position in the ranking (1-based) and score badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArtist {
  pub rank: usize,
  pub tier: ScoreTier,
  pub artist: Artist,
}

pub fn ranked_artists(artists: &[Artist], limit: usize) -> Vec<RankedArtist> {
  top_artists(artists, limit)
    .into_iter()
    .enumerate()
    .map(|(i, artist)| RankedArtist { rank: i + 1, tier: artist.aeh_score.tier(), artist })
    .collect()
}

/// Exact, case-sensitive match. Artists without a university never match.
pub fn artists_by_university(artists: &[Artist], university: &str) -> Vec<Artist> {
  artists.iter().filter(|a| a.university.as_deref() == Some(university)).cloned().collect()
}

/// Case-insensitive substring match on the name only.
pub fn search_artists(artists: &[Artist], term: &str) -> Vec<Artist> {
  let needle = term.to_lowercase();
  artists.iter().filter(|a| a.name.to_lowercase().contains(&needle)).cloned().collect()
}

/// All vibe checks for an artist in submission order.
pub fn vibe_checks_for_artist(vibe_checks: &[VibeCheck], artist_id: &ArtistId) -> Vec<VibeCheck> {
  vibe_checks.iter().filter(|c| &c.artist_id == artist_id).cloned().collect()
}

/// Exact, case-sensitive match on the university recorded with each check.
pub fn vibe_checks_by_university(vibe_checks: &[VibeCheck], university: &str) -> Vec<VibeCheck> {
  vibe_checks.iter().filter(|c| c.university == university).cloned().collect()
}

/// Rollup of one artist's vibe checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VibeSummary {
  pub count: usize,
  pub average: AvgRating,
}

pub fn vibe_summary(vibe_checks: &[VibeCheck], artist_id: &ArtistId) -> VibeSummary {
  let ratings: Vec<_> =
    vibe_checks.iter().filter(|c| &c.artist_id == artist_id).map(|c| c.rating).collect();

  VibeSummary { count: ratings.len(), average: AvgRating::from_ratings(ratings) }
}

/// Number of vibe checks per known artist, zeros included. Checks pointing at
/// artists no longer in the collection are not counted.
pub fn vibe_counts(artists: &[Artist], vibe_checks: &[VibeCheck]) -> BTreeMap<ArtistId, usize> {
  let mut counts: BTreeMap<ArtistId, usize> = artists.iter().map(|a| (a.id.clone(), 0)).collect();
  for check in vibe_checks {
    if let Some(n) = counts.get_mut(&check.artist_id) {
      *n += 1;
    }
  }
  counts
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Score, SocialLinks, StudentId, VibeCheckId, VibeRating};
  use chrono::{DateTime, TimeZone, Utc};

  fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
  }

  fn artist(id: &str, name: &str, score: f64, created: i64) -> Artist {
    Artist {
      id: id.into(),
      name: name.into(),
      social_links: SocialLinks::default(),
      aeh_score: Score::new(score).unwrap(),
      lds_score: Score::ZERO,
      aei_score: Score::ZERO,
      university: None,
      created_at: t(created),
      updated_at: t(created),
    }
  }

  fn check(id: &str, artist_id: &str, rating: u8, university: &str) -> VibeCheck {
    VibeCheck {
      id: VibeCheckId::from(id),
      artist_id: artist_id.into(),
      student_id: StudentId::from("s1"),
      rating: VibeRating::new(rating).unwrap(),
      video_url: None,
      comment: None,
      university: university.into(),
      created_at: t(0),
    }
  }

  fn ids(artists: &[Artist]) -> Vec<&str> {
    artists.iter().map(|a| a.id.as_str()).collect()
  }

  #[test]
  fn top_artists_breaks_ties_by_creation_then_id() {
    let artists = vec![
      artist("c", "C", 80.0, 2),
      artist("b", "B", 80.0, 1),
      artist("a", "A", 80.0, 2),
      artist("d", "D", 95.0, 9),
    ];
    assert_eq!(ids(&top_artists(&artists, 10)), ["d", "b", "a", "c"]);
  }

  #[test]
  fn top_artists_limits() {
    let artists = vec![artist("1", "One", 10.0, 0), artist("2", "Two", 20.0, 0)];
    assert!(top_artists(&artists, 0).is_empty());
    assert_eq!(ids(&top_artists(&artists, 1)), ["2"]);
    assert_eq!(top_artists(&artists, 50).len(), 2);
  }

  #[test]
  fn ranked_artists_carry_rank_and_tier() {
    let artists = vec![artist("1", "One", 91.0, 0), artist("2", "Two", 55.0, 0)];
    let ranked = ranked_artists(&artists, 2);
    assert_eq!((ranked[0].rank, ranked[0].tier), (1, ScoreTier::Fire));
    assert_eq!((ranked[1].rank, ranked[1].tier), (2, ScoreTier::Warm));
  }

  #[test]
  fn university_filter_is_exact() {
    let mut unilag = artist("1", "One", 1.0, 0);
    unilag.university = Some("University of Lagos".into());
    let artists = vec![unilag, artist("2", "Two", 1.0, 0)];

    assert_eq!(ids(&artists_by_university(&artists, "University of Lagos")), ["1"]);
    assert!(artists_by_university(&artists, "university of lagos").is_empty());
    assert!(artists_by_university(&artists, "").is_empty());
  }

  #[test]
  fn search_is_case_insensitive_on_name() {
    let artists = vec![artist("1", "Burna Boy", 1.0, 0), artist("2", "Wizkid", 1.0, 0)];
    assert_eq!(ids(&search_artists(&artists, "BURNA")), ["1"]);
    assert_eq!(ids(&search_artists(&artists, "iz")), ["2"]);
    assert!(search_artists(&artists, "davido").is_empty());
  }

  #[test]
  fn vibe_rollups() {
    let artists = vec![artist("1", "One", 1.0, 0), artist("2", "Two", 1.0, 0)];
    let checks = vec![check("v1", "1", 4, "OAU"), check("v2", "1", 2, "UI"), check("v3", "ghost", 5, "OAU")];

    let summary = vibe_summary(&checks, &"1".into());
    assert_eq!(summary.count, 2);
    assert_eq!(summary.average.as_f32(), Some(3.0));
    assert_eq!(vibe_summary(&checks, &"2".into()).average, AvgRating::Unrated);

    let counts = vibe_counts(&artists, &checks);
    assert_eq!(counts.get(&ArtistId::from("1")), Some(&2));
    assert_eq!(counts.get(&ArtistId::from("2")), Some(&0));
    assert_eq!(counts.len(), 2);

    let oau: Vec<_> = vibe_checks_by_university(&checks, "OAU").into_iter().map(|c| c.id).collect();
    assert_eq!(oau, [VibeCheckId::from("v1"), VibeCheckId::from("v3")]);

    let for_one: Vec<_> = vibe_checks_for_artist(&checks, &"1".into()).into_iter().map(|c| c.id).collect();
    assert_eq!(for_one, [VibeCheckId::from("v1"), VibeCheckId::from("v2")]);
  }
}
