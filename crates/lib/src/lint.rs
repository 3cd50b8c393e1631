//! Post-build verification of a package directory.
//!
//! Each rule inspects `<packages>/<name>_<triplet>` and reports how many
//! violations it found. Violations are logged; the caller only sees the total.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::paths::BuildPaths;
use crate::spec::PackageSpec;

pub trait PostBuildVerifier {
  /// Number of rule violations in the built output of `spec`.
  fn run(&self, spec: &PackageSpec, paths: &BuildPaths) -> usize;
}

/// Layout rules every published package must satisfy.
#[derive(Debug, Clone, Copy, Default)]
pub struct LintVerifier;

impl PostBuildVerifier for LintVerifier {
  fn run(&self, spec: &PackageSpec, paths: &BuildPaths) -> usize {
    let package_dir = paths.package_dir(spec);
    if !package_dir.is_dir() {
      warn!(package = %spec, path = ?package_dir, "package directory does not exist");
      return 1;
    }

    let violations = check_include_dir(&package_dir)
      + check_debug_include_dir(&package_dir)
      + check_copyright(&package_dir, spec.name())
      + check_misplaced_cmake_files(&package_dir)
      + check_lib_executables(&package_dir);

    debug!(package = %spec, violations, "post-build checks finished");
    violations
  }
}

fn files_under(dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
  WalkDir::new(dir)
    .into_iter()
    .filter_map(Result::ok)
    .filter(|e| e.file_type().is_file())
}

fn check_include_dir(package_dir: &Path) -> usize {
  let include = package_dir.join("include");
  if files_under(&include).next().is_none() {
    warn!(path = ?include, "include directory is missing or empty");
    return 1;
  }
  0
}

fn check_debug_include_dir(package_dir: &Path) -> usize {
  let debug_include = package_dir.join("debug").join("include");
  let count = files_under(&debug_include).count();
  if count > 0 {
    warn!(path = ?debug_include, files = count, "headers must not be duplicated under debug/include");
    return 1;
  }
  0
}

fn check_copyright(package_dir: &Path, name: &str) -> usize {
  let copyright = package_dir.join("share").join(name).join("copyright");
  if !copyright.is_file() {
    warn!(path = ?copyright, "copyright file is missing");
    return 1;
  }
  0
}

fn check_misplaced_cmake_files(package_dir: &Path) -> usize {
  let share = package_dir.join("share");
  let misplaced: Vec<_> = files_under(package_dir)
    .filter(|e| e.path().extension().is_some_and(|ext| ext == "cmake"))
    .filter(|e| !e.path().starts_with(&share))
    .collect();

  for entry in &misplaced {
    warn!(path = ?entry.path(), "cmake files must be placed under share/");
  }
  usize::from(!misplaced.is_empty())
}

fn check_lib_executables(package_dir: &Path) -> usize {
  let lib_dirs = [package_dir.join("lib"), package_dir.join("debug").join("lib")];
  let executables: Vec<_> = lib_dirs
    .iter()
    .flat_map(|dir| files_under(dir))
    .filter(|e| {
      e.path()
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("exe"))
    })
    .collect();

  for entry in &executables {
    warn!(path = ?entry.path(), "executables must not be placed in lib directories");
  }
  usize::from(!executables.is_empty())
}
