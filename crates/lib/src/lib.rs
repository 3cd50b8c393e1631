//! portsmith-lib: Core types and logic for portsmith
//!
//! This crate provides the build core of portsmith:
//! - `PackageSpec` and `Triplet`: what is being built, and for which platform
//! - `SourceDescriptor`: a port's recipe metadata
//! - `StatusDb`: read-only snapshot of installed packages
//! - `build`: dependency gate, toolchain invocation, post-build checks and
//!   metadata publication, ending in a `BuildResult`
//! - `plan`: transitive install-plan resolution used to diagnose missing dependencies

pub mod build;
pub mod consts;
pub mod descriptor;
pub mod lint;
pub mod paragraph;
pub mod paths;
pub mod plan;
pub mod spec;
pub mod status;
pub mod telemetry;
pub mod util;
