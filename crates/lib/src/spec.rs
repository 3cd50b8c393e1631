//! Build target identifiers: [`Triplet`] and [`PackageSpec`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
  #[error("triplet name must not be empty")]
  EmptyTriplet,

  #[error("package name must not be empty")]
  EmptyName,

  #[error("invalid character {ch:?} in `{value}`")]
  InvalidChar { value: String, ch: char },

  #[error("`{0}` is not a valid package spec, expected `name[:triplet]`")]
  Malformed(String),
}

fn validate(value: &str) -> Result<(), SpecError> {
  match value.chars().find(|c| c.is_whitespace() || *c == ':' || *c == '/' || *c == '\\') {
    Some(ch) => Err(SpecError::InvalidChar {
      value: value.to_string(),
      ch,
    }),
    None => Ok(()),
  }
}

/// Canonical form of a package name: trimmed and lowercase.
///
/// Every place that compares package names (specs, descriptors, the status
/// database) goes through this.
pub fn canonical_package_name(name: &str) -> String {
  name.trim().to_ascii_lowercase()
}

/// Target platform identifier, e.g. `x64-windows` or `arm64-linux`.
///
/// Stored in canonical (lowercase) form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triplet(String);

impl Triplet {
  pub fn new(name: &str) -> Result<Self, SpecError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(SpecError::EmptyTriplet);
    }
    validate(name)?;
    Ok(Self(name.to_ascii_lowercase()))
  }

  pub fn canonical_name(&self) -> &str {
    &self.0
  }

  /// Leading architecture component (`x64` for `x64-windows`).
  pub fn architecture(&self) -> &str {
    self.0.split('-').next().unwrap_or(&self.0)
  }
}

impl FromStr for Triplet {
  type Err = SpecError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::new(s)
  }
}

impl fmt::Display for Triplet {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Serialize for Triplet {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

/// One buildable target: a package name on a triplet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageSpec {
  name: String,
  triplet: Triplet,
}

impl PackageSpec {
  pub fn new(name: &str, triplet: Triplet) -> Result<Self, SpecError> {
    let name = name.trim();
    if name.is_empty() {
      return Err(SpecError::EmptyName);
    }
    validate(name)?;
    Ok(Self {
      name: canonical_package_name(name),
      triplet,
    })
  }

  /// Parse `name` or `name:triplet`, falling back to `default_triplet`.
  pub fn parse(input: &str, default_triplet: &Triplet) -> Result<Self, SpecError> {
    let input = input.trim();
    match input.split_once(':') {
      None => Self::new(input, default_triplet.clone()),
      Some((name, triplet)) => {
        if triplet.contains(':') {
          return Err(SpecError::Malformed(input.to_string()));
        }
        Self::new(name, Triplet::new(triplet)?)
      }
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn triplet(&self) -> &Triplet {
    &self.triplet
  }

  /// Directory name used for this target inside the package store.
  pub fn dir(&self) -> String {
    format!("{}_{}", self.name, self.triplet)
  }
}

impl fmt::Display for PackageSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.name, self.triplet)
  }
}

impl Serialize for PackageSpec {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}
