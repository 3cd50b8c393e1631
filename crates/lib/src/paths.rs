//! Filesystem layout and environment-driven settings.
//!
//! # Layout
//!
//! ```text
//! <root>/
//! ├── ports/<name>/CONTROL        # Source descriptors and recipes
//! ├── packages/<name>_<triplet>/  # Build outputs, one directory per target
//! ├── buildtrees/                 # Scratch space owned by recipes
//! ├── installed/portsmith/status  # Status database
//! ├── triplets/<triplet>.cmake    # Known triplets
//! └── scripts/ports.cmake         # Toolchain entry script
//! ```
//!
//! The root defaults to the current directory and can be overridden with
//! `PORTSMITH_ROOT`.

use std::io;
use std::path::{Path, PathBuf};

use crate::consts::{
  APP_NAME, CMAKE_ENV, CONTROL_FILE, DEFAULT_TRIPLET_ENV, ENV_SETUP_ENV, PLATFORM_TOOLSET_ENV, ROOT_ENV,
};
use crate::spec::{PackageSpec, SpecError, Triplet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
  pub root: PathBuf,
  pub ports: PathBuf,
  pub packages: PathBuf,
  pub buildtrees: PathBuf,
  pub installed: PathBuf,
  pub status_file: PathBuf,
  pub triplets: PathBuf,
  pub ports_cmake: PathBuf,
}

impl BuildPaths {
  pub fn from_root(root: impl Into<PathBuf>) -> Self {
    let root = root.into();
    let installed = root.join("installed");
    Self {
      ports: root.join("ports"),
      packages: root.join("packages"),
      buildtrees: root.join("buildtrees"),
      status_file: installed.join(APP_NAME).join("status"),
      installed,
      triplets: root.join("triplets"),
      ports_cmake: root.join("scripts").join("ports.cmake"),
      root,
    }
  }

  /// Resolve the root from `PORTSMITH_ROOT`, else the current directory.
  pub fn discover() -> io::Result<Self> {
    if let Ok(root) = std::env::var(ROOT_ENV) {
      return Ok(Self::from_root(root));
    }
    Ok(Self::from_root(std::env::current_dir()?))
  }

  pub fn port_dir(&self, spec: &PackageSpec) -> PathBuf {
    self.ports.join(spec.name())
  }

  pub fn package_dir(&self, spec: &PackageSpec) -> PathBuf {
    self.packages.join(spec.dir())
  }

  pub fn package_control(&self, spec: &PackageSpec) -> PathBuf {
    self.package_dir(spec).join(CONTROL_FILE)
  }

  pub fn triplet_file(&self, triplet: &Triplet) -> PathBuf {
    self.triplets.join(format!("{}.cmake", triplet.canonical_name()))
  }

  /// A triplet is known iff its toolchain file exists.
  pub fn is_valid_triplet(&self, triplet: &Triplet) -> bool {
    self.triplet_file(triplet).is_file()
  }
}

#[cfg(windows)]
const FALLBACK_TRIPLET: &str = "x64-windows";
#[cfg(not(windows))]
const FALLBACK_TRIPLET: &str = "x64-linux";

#[cfg(windows)]
const FALLBACK_TOOLSET: &str = "v140";
#[cfg(not(windows))]
const FALLBACK_TOOLSET: &str = "default";

/// Triplet used for specs that do not name one.
pub fn default_triplet() -> Result<Triplet, SpecError> {
  match std::env::var(DEFAULT_TRIPLET_ENV) {
    Ok(name) => Triplet::new(&name),
    Err(_) => Triplet::new(FALLBACK_TRIPLET),
  }
}

/// How the native toolchain is launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainSettings {
  /// The cmake program (name on PATH or absolute path).
  pub cmake: String,
  pub platform_toolset: String,
  /// Optional script run before cmake to initialize the compiler environment,
  /// called with the target architecture as its only argument.
  pub env_setup: Option<PathBuf>,
}

impl ToolchainSettings {
  pub fn from_env() -> Self {
    Self {
      cmake: std::env::var(CMAKE_ENV).unwrap_or_else(|_| "cmake".to_string()),
      platform_toolset: std::env::var(PLATFORM_TOOLSET_ENV).unwrap_or_else(|_| FALLBACK_TOOLSET.to_string()),
      env_setup: std::env::var(ENV_SETUP_ENV).ok().map(PathBuf::from),
    }
  }
}

impl Default for ToolchainSettings {
  fn default() -> Self {
    Self {
      cmake: "cmake".to_string(),
      platform_toolset: FALLBACK_TOOLSET.to_string(),
      env_setup: None,
    }
  }
}

/// Returns `path` with a trailing `/.`, the form recipes expect for directory arguments.
pub fn with_trailing_dot(path: &Path) -> String {
  let generic = path.to_string_lossy().replace('\\', "/");
  format!("{}/.", generic.trim_end_matches('/'))
}
