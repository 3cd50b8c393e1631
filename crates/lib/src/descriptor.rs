//! Source and binary package descriptors.
//!
//! A port directory holds a `CONTROL` file describing the source package:
//!
//! ```text
//! Source: zlib
//! Version: 1.2.8
//! Description: A compression library
//! Build-Depends: zlib-deps
//! ```
//!
//! After a successful build the same format is used to publish a
//! [`BinaryDescriptor`] into the package store.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::CONTROL_FILE;
use crate::paragraph::{self, Paragraph, ParagraphError, write_field};
use crate::paths::BuildPaths;
use crate::spec::{PackageSpec, SpecError, Triplet, canonical_package_name};

#[derive(Debug, Error)]
pub enum DescriptorError {
  #[error("no descriptor at {}", .0.display())]
  NotFound(PathBuf),

  #[error("failed to read {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: ParagraphError,
  },

  #[error("invalid architecture in {}: {source}", path.display())]
  Triplet {
    path: PathBuf,
    #[source]
    source: SpecError,
  },
}

/// A package recipe as declared in its port directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
  pub name: String,
  pub version: Option<String>,
  pub description: Option<String>,
  pub maintainer: Option<String>,
  /// Direct dependencies in declared order.
  pub depends: Vec<String>,
}

impl SourceDescriptor {
  pub fn new(name: &str, depends: &[&str]) -> Self {
    Self {
      name: canonical_package_name(name),
      version: None,
      description: None,
      maintainer: None,
      depends: depends.iter().map(|d| canonical_package_name(d)).collect(),
    }
  }

  pub fn from_paragraph(paragraph: &Paragraph) -> Result<Self, ParagraphError> {
    Ok(Self {
      name: canonical_package_name(paragraph.required("Source")?),
      version: paragraph.get("Version").map(str::to_string),
      description: paragraph.get("Description").map(str::to_string),
      maintainer: paragraph.get("Maintainer").map(str::to_string),
      depends: canonical_list(paragraph, "Build-Depends"),
    })
  }

  /// Direct dependency names, in canonical form. Both the build gate and the
  /// install-plan resolver read the dependency graph through this method.
  pub fn dependencies(&self) -> &[String] {
    &self.depends
  }
}

fn canonical_list(paragraph: &Paragraph, field: &str) -> Vec<String> {
  paragraph
    .list(field)
    .iter()
    .map(|name| canonical_package_name(name))
    .collect()
}

/// Load the descriptor of the port rooted at `port_dir`.
pub fn load_port(port_dir: &Path) -> Result<SourceDescriptor, DescriptorError> {
  let path = port_dir.join(CONTROL_FILE);
  let paragraph = read_paragraph(&path)?;
  SourceDescriptor::from_paragraph(&paragraph).map_err(|source| DescriptorError::Parse { path, source })
}

fn read_paragraph(path: &Path) -> Result<Paragraph, DescriptorError> {
  let text = match std::fs::read_to_string(path) {
    Ok(text) => text,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(DescriptorError::NotFound(path.to_path_buf())),
    Err(source) => {
      return Err(DescriptorError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };
  paragraph::parse_single(&text).map_err(|source| DescriptorError::Parse {
    path: path.to_path_buf(),
    source,
  })
}

/// Looks up source descriptors by package name.
pub trait PortCatalog {
  fn load(&self, name: &str) -> Result<SourceDescriptor, DescriptorError>;
}

/// Catalog backed by the `ports/` directory.
#[derive(Debug, Clone)]
pub struct PortsDir {
  ports: PathBuf,
}

impl PortsDir {
  pub fn new(paths: &BuildPaths) -> Self {
    Self {
      ports: paths.ports.clone(),
    }
  }
}

impl PortCatalog for PortsDir {
  fn load(&self, name: &str) -> Result<SourceDescriptor, DescriptorError> {
    load_port(&self.ports.join(name))
  }
}

/// Metadata record for a built package, written to `<packages>/<dir>/CONTROL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryDescriptor {
  pub name: String,
  pub version: Option<String>,
  pub triplet: Triplet,
  pub description: Option<String>,
  pub maintainer: Option<String>,
  pub depends: Vec<String>,
}

impl BinaryDescriptor {
  pub fn from_source(source: &SourceDescriptor, triplet: &Triplet) -> Self {
    Self {
      name: source.name.clone(),
      version: source.version.clone(),
      triplet: triplet.clone(),
      description: source.description.clone(),
      maintainer: source.maintainer.clone(),
      depends: source.depends.clone(),
    }
  }

  pub fn from_paragraph(paragraph: &Paragraph, path: &Path) -> Result<Self, DescriptorError> {
    let parse_err = |source| DescriptorError::Parse {
      path: path.to_path_buf(),
      source,
    };
    let architecture = paragraph.required("Architecture").map_err(parse_err)?;
    let triplet = Triplet::new(architecture).map_err(|source| DescriptorError::Triplet {
      path: path.to_path_buf(),
      source,
    })?;

    Ok(Self {
      name: canonical_package_name(paragraph.required("Package").map_err(parse_err)?),
      version: paragraph.get("Version").map(str::to_string),
      triplet,
      description: paragraph.get("Description").map(str::to_string),
      maintainer: paragraph.get("Maintainer").map(str::to_string),
      depends: canonical_list(paragraph, "Depends"),
    })
  }

  /// Read a previously published record.
  pub fn load(path: &Path) -> Result<Self, DescriptorError> {
    let paragraph = read_paragraph(path)?;
    Self::from_paragraph(&paragraph, path)
  }

  /// Directory name of this record inside the package store.
  pub fn dir(&self) -> String {
    format!("{}_{}", self.name, self.triplet)
  }

  pub fn spec(&self) -> Result<PackageSpec, SpecError> {
    PackageSpec::new(&self.name, self.triplet.clone())
  }
}

impl fmt::Display for BinaryDescriptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut out = String::new();
    write_field(&mut out, "Package", &self.name);
    if let Some(version) = &self.version {
      write_field(&mut out, "Version", version);
    }
    write_field(&mut out, "Architecture", self.triplet.canonical_name());
    write_field(&mut out, "Multi-Arch", "same");
    if !self.depends.is_empty() {
      write_field(&mut out, "Depends", &self.depends.join(", "));
    }
    if let Some(description) = &self.description {
      write_field(&mut out, "Description", description);
    }
    if let Some(maintainer) = &self.maintainer {
      write_field(&mut out, "Maintainer", maintainer);
    }
    f.write_str(&out)
  }
}
