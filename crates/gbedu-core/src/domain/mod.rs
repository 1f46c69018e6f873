pub mod artist;
pub mod cluster;
pub mod ids;
pub mod rating;
pub mod score;
pub mod vibe_check;

pub use artist::{Artist, ArtistPatch, NewArtist, SocialLinks};
pub use cluster::Cluster;
pub use ids::{ArtistId, ClusterId, StudentId, VibeCheckId};
pub use rating::{AvgRating, Rating, VibeRating};
pub use score::{Score, ScoreTier};
pub use vibe_check::{NewVibeCheck, VibeCheck};
