pub mod domain;
pub mod errors;
pub mod ports;
pub mod queries;
pub mod store;

pub use errors::StoreError;
pub use store::{ArtistStore, Change, StoreEvent, StoreOptions, StoreSnapshot, Subscription, SubscriptionId};
