//! Read-only snapshot of the status database.
//!
//! The status file is a sequence of paragraphs, one per package the installer
//! has touched:
//!
//! ```text
//! Package: zlib
//! Version: 1.2.8
//! Architecture: x64-windows
//! Status: install ok installed
//! ```
//!
//! The `Status` field holds three words: the wanted action, an error flag and
//! the current state. Only `install ... installed` counts as installed.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::paragraph::{self, Paragraph, ParagraphError};
use crate::spec::{SpecError, Triplet, canonical_package_name};

#[derive(Debug, Error)]
pub enum StatusError {
  #[error("failed to read status database {}: {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse status database {}: {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: ParagraphError,
  },

  #[error("invalid architecture in status database {}: {source}", path.display())]
  Triplet {
    path: PathBuf,
    #[source]
    source: SpecError,
  },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledRecord {
  pub name: String,
  pub triplet: Triplet,
  pub version: Option<String>,
  pub status: String,
}

impl InstalledRecord {
  /// A record that reports the package as fully installed.
  pub fn installed(name: &str, triplet: &Triplet) -> Self {
    Self {
      name: canonical_package_name(name),
      triplet: triplet.clone(),
      version: None,
      status: "install ok installed".to_string(),
    }
  }

  pub fn is_installed(&self) -> bool {
    let mut words = self.status.split_whitespace();
    let want = words.next();
    let state = words.nth(1);
    want == Some("install") && state == Some("installed")
  }

  fn from_paragraph(paragraph: &Paragraph, path: &Path) -> Result<Self, StatusError> {
    let parse_err = |source| StatusError::Parse {
      path: path.to_path_buf(),
      source,
    };
    let triplet = Triplet::new(paragraph.required("Architecture").map_err(parse_err)?).map_err(|source| {
      StatusError::Triplet {
        path: path.to_path_buf(),
        source,
      }
    })?;

    Ok(Self {
      name: canonical_package_name(paragraph.required("Package").map_err(parse_err)?),
      triplet,
      version: paragraph.get("Version").map(str::to_string),
      status: paragraph.required("Status").map_err(parse_err)?.to_string(),
    })
  }
}

/// Immutable view of installed packages, taken once per build.
#[derive(Debug, Clone, Default)]
pub struct StatusDb {
  records: Vec<InstalledRecord>,
}

impl StatusDb {
  pub fn from_records(records: impl IntoIterator<Item = InstalledRecord>) -> Self {
    Self {
      records: records.into_iter().collect(),
    }
  }

  /// Load the database at `path`. A missing file is an empty database.
  pub fn load(path: &Path) -> Result<Self, StatusError> {
    let text = match std::fs::read_to_string(path) {
      Ok(text) => text,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = ?path, "no status database, treating as empty");
        return Ok(Self::default());
      }
      Err(source) => {
        return Err(StatusError::Read {
          path: path.to_path_buf(),
          source,
        });
      }
    };

    let paragraphs = paragraph::parse_paragraphs(&text).map_err(|source| StatusError::Parse {
      path: path.to_path_buf(),
      source,
    })?;
    let records = paragraphs
      .iter()
      .map(|p| InstalledRecord::from_paragraph(p, path))
      .collect::<Result<Vec<_>, _>>()?;

    debug!(path = ?path, records = records.len(), "loaded status database");
    Ok(Self { records })
  }

  pub fn find_installed(&self, name: &str, triplet: &Triplet) -> Option<&InstalledRecord> {
    let name = canonical_package_name(name);
    self
      .records
      .iter()
      .find(|r| r.name == name && &r.triplet == triplet && r.is_installed())
  }

  pub fn is_installed(&self, name: &str, triplet: &Triplet) -> bool {
    self.find_installed(name, triplet).is_some()
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}
