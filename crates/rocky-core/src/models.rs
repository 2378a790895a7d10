//! Domain models for Rocky.
//!
//! These are the core types shared across all crates.

pub mod indemnification;
pub mod job;
pub mod member;
pub mod ooi_information;
pub mod organization;
