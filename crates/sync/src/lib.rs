//! Client-side synchronization of the projects collection.
//!
//! [`ProjectStore`] is the single owner of the local collection. Every view
//! reads through a [`StoreSnapshot`] and learns about changes from the
//! [`EventBus`]; none of them fetch or mutate on their own.
//!
//! - [`operation`] — the four remote operations and their phases.
//! - [`bus`] — [`SyncEvent`] broadcast hub.
//! - [`store`] — the store itself.

pub mod bus;
pub mod error;
pub mod operation;
pub mod store;

pub use bus::{EventBus, SyncEvent};
pub use error::SyncError;
pub use operation::{OpPhase, Operation};
pub use store::{ProjectStore, StoreSnapshot};
