//! Reelcut Core
//!
//! Core types and abstractions for the Reelcut vertical-video pipeline client.
//!
//! This crate contains:
//! - Domain types: Job lifecycle states and the render option set
//! - DTOs: Wire-level request/response bodies for the runner API

pub mod domain;
pub mod dto;
