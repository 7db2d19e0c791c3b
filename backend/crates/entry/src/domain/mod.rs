//! Domain Layer
//!
//! Booking entry state, caller identity, gate authorization rules and the
//! repository interfaces.

pub mod caller;
pub mod entity;
pub mod outcome;
pub mod policy;
pub mod repository;
