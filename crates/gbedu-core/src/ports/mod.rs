pub mod clock;
pub mod observer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use observer::{ObserverError, StoreObserver};
