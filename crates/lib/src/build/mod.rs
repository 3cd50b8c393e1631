//! Building a single target.
//!
//! A build runs strictly in this order and stops at the first failure:
//!
//! 1. the dependency [`gate`] checks direct dependencies are installed
//! 2. the [`toolchain`] runs the port's recipe
//! 3. post-build checks verify the output
//! 4. [`publish`] writes the package metadata record
//!
//! The outcome is a [`BuildResult`]. When a build cascades on a missing
//! dependency, [`cascade`] computes what the operator has to install first.
//!
//! # Submodules
//!
//! - [`execute`] - Build orchestration
//! - [`gate`] - Fail-fast direct dependency check
//! - [`toolchain`] - Toolchain command and invoker
//! - [`publish`] - Package metadata publication
//! - [`cascade`] - Missing-dependency diagnostics

pub mod cascade;
pub mod execute;
pub mod gate;
pub mod publish;
pub mod toolchain;
mod types;

pub use types::*;
