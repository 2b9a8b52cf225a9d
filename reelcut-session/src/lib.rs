//! Reelcut Session
//!
//! Client-side state and lifecycle driving for render jobs.
//!
//! Architecture:
//! - Configuration: runner URL and polling cadence, from environment or defaults
//! - Poller: a single cancellable task polling one job until a terminal state
//! - Session: the one mutable state object (source, job id, generated audio)
//!   with a defined reset back to initial values
//!
//! The poller is written against the [`StatusSource`] trait so its state
//! machine can be exercised without a runner.

pub mod config;
pub mod poller;
pub mod session;

pub use config::Config;
pub use poller::{JobWatcher, StatusSource};
pub use session::{JobSource, Session};
