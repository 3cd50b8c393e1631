//! Package metadata publication.
//!
//! Writes the CONTROL record of a successfully built target into the package
//! store at `<packages>/<name>_<triplet>/CONTROL`.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::build::types::BuildError;
use crate::consts::CONTROL_FILE;
use crate::descriptor::{BinaryDescriptor, SourceDescriptor};
use crate::paths::BuildPaths;
use crate::spec::Triplet;

pub fn control_path(binary: &BinaryDescriptor, paths: &BuildPaths) -> PathBuf {
  paths.packages.join(binary.dir()).join(CONTROL_FILE)
}

/// Write the metadata record, replacing any existing one.
///
/// Returns the path of the written file.
pub fn publish(descriptor: &SourceDescriptor, triplet: &Triplet, paths: &BuildPaths) -> Result<PathBuf, BuildError> {
  let binary = BinaryDescriptor::from_source(descriptor, triplet);
  let path = control_path(&binary, paths);
  let publish_err = |source| BuildError::Publish {
    path: path.clone(),
    source,
  };

  if let Some(dir) = path.parent() {
    fs::create_dir_all(dir).map_err(publish_err)?;
  }
  fs::write(&path, binary.to_string()).map_err(publish_err)?;

  info!(package = %binary.name, triplet = %triplet, path = ?path, "published package metadata");
  Ok(path)
}
