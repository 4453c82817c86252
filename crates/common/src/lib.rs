//! Shared error plumbing and path helpers used across all skillsync crates.

pub mod error;
pub mod paths;

pub use error::FromMessage;
