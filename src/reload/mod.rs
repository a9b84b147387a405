//! Dataset reload
//!
//! The [`ReloadCoordinator`] asks a [`DatasetProvider`] whether the dataset changed,
//! rebuilds a complete index snapshot off to the side when it did, publishes it in
//! one swap and then clears the query cache. Every failure on that path is logged
//! and leaves the last published snapshot in place.
//!
//! ## Submodules
//! - **`provider`**: where the dataset comes from (a fixed local directory or a git checkout).
//! - **`coordinator`**: the reload state machine and the periodic reload loop.

pub mod coordinator;
pub mod provider;

pub use coordinator::{ReloadCoordinator, ReloadOutcome, ReloadState, ReloadTrigger};
pub use provider::{DatasetProvider, GitDatasetProvider, LocalDatasetProvider, SyncStatus};
