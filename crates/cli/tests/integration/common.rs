//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const TRIPLET: &str = "x64-windows";

/// Isolated root with `ports/`, `packages/`, `installed/` and `triplets/`.
pub struct TestEnv {
  pub temp: TempDir,
}

impl TestEnv {
  /// Root that knows the `x64-windows` triplet and nothing else.
  pub fn new() -> Self {
    let env = Self {
      temp: TempDir::new().unwrap(),
    };
    env.write_file(&format!("triplets/{}.cmake", TRIPLET), "");
    env
  }

  pub fn root_path(&self) -> PathBuf {
    let p = self.temp.path().to_path_buf();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Write a file relative to the root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn add_port(&self, name: &str, depends: &[&str]) {
    let mut control = format!("Source: {}\nVersion: 1.0\n", name);
    if !depends.is_empty() {
      control.push_str(&format!("Build-Depends: {}\n", depends.join(", ")));
    }
    self.write_file(&format!("ports/{}/CONTROL", name), &control);
  }

  /// Record `names` as installed for the default triplet.
  pub fn install(&self, names: &[&str]) {
    let status: Vec<String> = names
      .iter()
      .map(|name| {
        format!(
          "Package: {}\nVersion: 1.0\nArchitecture: {}\nStatus: install ok installed\n",
          name, TRIPLET
        )
      })
      .collect();
    self.write_file("installed/portsmith/status", &status.join("\n"));
  }

  /// Package output that passes every post-build check.
  pub fn add_clean_package_output(&self, name: &str) {
    let dir = format!("packages/{}_{}", name, TRIPLET);
    self.write_file(&format!("{}/include/{}.h", dir, name), "");
    self.write_file(&format!("{}/share/{}/copyright", dir, name), "license");
  }

  pub fn control_path(&self, name: &str) -> PathBuf {
    self
      .temp
      .path()
      .join("packages")
      .join(format!("{}_{}", name, TRIPLET))
      .join("CONTROL")
  }

  /// A portsmith command rooted in this environment.
  ///
  /// Toolchain settings from the caller's environment are removed so they
  /// cannot leak into the test.
  pub fn portsmith_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("portsmith");
    cmd.env("PORTSMITH_ROOT", self.root_path());
    cmd.env("PORTSMITH_DEFAULT_TRIPLET", TRIPLET);
    cmd.env_remove("PORTSMITH_ENV_SETUP");
    cmd.env_remove("PORTSMITH_CMAKE");
    cmd.env_remove("RUST_LOG");
    cmd
  }
}
