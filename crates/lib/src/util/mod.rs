//! Shared utilities.
//!
//! In-memory collaborators used by the crate's tests.

#[cfg(test)]
pub mod testutil;
