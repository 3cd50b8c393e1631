//! Plan command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn plan_lists_dependencies_first() {
  let env = TestEnv::new();
  env.add_port("libpng", &["zlib"]);
  env.add_port("zlib", &[]);

  env
    .portsmith_cmd()
    .args(["plan", "libpng"])
    .assert()
    .success()
    .stdout(predicate::str::is_match(r"(?s)zlib:x64-windows \(build and install\).*libpng:x64-windows \(build and install\)").unwrap());
}

#[test]
fn plan_marks_installed_packages() {
  let env = TestEnv::new();
  env.add_port("libpng", &["zlib"]);
  env.install(&["zlib", "libpng"]);

  env
    .portsmith_cmd()
    .args(["plan", "libpng"])
    .assert()
    .success()
    .stdout(predicate::str::contains("All requested packages are already installed"))
    .stdout(predicate::str::contains("libpng:x64-windows (already installed)"));
}

#[test]
fn plan_as_json() {
  let env = TestEnv::new();
  env.add_port("zlib", &[]);

  let output = env
    .portsmith_cmd()
    .args(["plan", "zlib", "--json"])
    .assert()
    .success()
    .get_output()
    .stdout
    .clone();

  let plan: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(
    plan,
    serde_json::json!([{ "spec": "zlib:x64-windows", "kind": "build_and_install" }])
  );
}

#[test]
fn plan_with_missing_port_fails() {
  let env = TestEnv::new();
  env.add_port("libpng", &["zlib"]);

  env
    .portsmith_cmd()
    .args(["plan", "libpng"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to resolve the install plan"));
}
