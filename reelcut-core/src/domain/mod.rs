//! Domain types

pub mod job;
pub mod options;
