//! Build command integration tests.

use predicates::prelude::*;

use super::common::TestEnv;

#[test]
fn unknown_triplet_is_rejected() {
  let env = TestEnv::new();
  env.add_port("zlib", &[]);

  env
    .portsmith_cmd()
    .args(["build", "zlib:arm-uwp"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid triplet: arm-uwp"));
}

#[test]
fn missing_port_is_reported() {
  let env = TestEnv::new();

  env
    .portsmith_cmd()
    .args(["build", "zlib"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Could not find package named zlib:x64-windows"));
}

#[test]
fn malformed_spec_is_rejected() {
  let env = TestEnv::new();

  env
    .portsmith_cmd()
    .args(["build", "zlib:x64-windows:extra"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid package spec"));
}

#[test]
fn missing_dependency_lists_what_to_install() {
  let env = TestEnv::new();
  env.add_port("zlib", &["zlib-deps"]);
  env.add_port("zlib-deps", &[]);

  env
    .portsmith_cmd()
    .args(["build", "zlib"])
    .assert()
    .failure()
    .stderr(predicate::str::contains(
      "The build command requires all dependencies to be already installed.",
    ))
    .stdout(predicate::str::contains("The following dependencies are missing:"))
    .stdout(predicate::str::contains("    zlib-deps:x64-windows"));

  assert!(!env.control_path("zlib").exists());
}

#[test]
fn mixed_case_dependency_lists_canonical_name() {
  let env = TestEnv::new();
  env.add_port("zlib", &["bzip2", "ZLib-Deps"]);
  env.add_port("zlib-deps", &[]);
  env.install(&["bzip2"]);

  env
    .portsmith_cmd()
    .args(["build", "zlib"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("    zlib-deps:x64-windows\n"))
    .stdout(predicate::str::contains("bzip2").not());
}

#[test]
fn missing_dependency_lists_transitive_dependencies() {
  let env = TestEnv::new();
  env.add_port("app", &["libpng"]);
  env.add_port("libpng", &["zlib"]);
  env.add_port("zlib", &[]);

  env
    .portsmith_cmd()
    .args(["build", "app"])
    .assert()
    .failure()
    .stdout(predicate::str::contains(
      "    zlib:x64-windows\n    libpng:x64-windows\n",
    ));
}

#[test]
fn missing_dependency_as_json() {
  let env = TestEnv::new();
  env.add_port("zlib", &["zlib-deps"]);
  env.add_port("zlib-deps", &[]);

  let output = env
    .portsmith_cmd()
    .args(["build", "zlib", "--json"])
    .assert()
    .failure()
    .get_output()
    .stdout
    .clone();

  let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
  assert_eq!(report["result"], "CASCADED_DUE_TO_MISSING_DEPENDENCIES");
  assert_eq!(report["spec"], "zlib:x64-windows");
  assert_eq!(report["missing"], serde_json::json!(["zlib-deps:x64-windows"]));
}

#[test]
fn checks_only_passes_on_clean_output() {
  let env = TestEnv::new();
  env.add_clean_package_output("zlib");

  env
    .portsmith_cmd()
    .args(["build", "zlib", "--checks-only"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Post-build checks passed for zlib:x64-windows"));
}

#[test]
fn checks_only_fails_without_output() {
  let env = TestEnv::new();

  env
    .portsmith_cmd()
    .args(["build", "zlib", "--checks-only"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("post-build check violation"));
}

#[test]
fn checks_only_does_not_need_a_port() {
  let env = TestEnv::new();
  env.add_clean_package_output("zlib");
  env.write_file("packages/zlib_x64-windows/debug/include/zlib.h", "");

  env
    .portsmith_cmd()
    .args(["build", "zlib", "--checks-only", "--json"])
    .assert()
    .failure()
    .stdout(predicate::str::contains("\"violations\": 1"));
}

#[cfg(unix)]
mod toolchain {
  use super::*;

  #[test]
  fn failing_toolchain_reports_build_failed() {
    let env = TestEnv::new();
    env.add_port("zlib", &[]);

    env
      .portsmith_cmd()
      .env("PORTSMITH_CMAKE", "false")
      .args(["build", "zlib"])
      .assert()
      .failure()
      .stderr(predicate::str::contains(
        "Error: Building package zlib:x64-windows failed with: BUILD_FAILED",
      ))
      .stdout(predicate::str::contains("Package: zlib:x64-windows"));

    assert!(!env.control_path("zlib").exists());
  }

  #[test]
  fn unknown_toolchain_binary_reports_build_failed() {
    let env = TestEnv::new();
    env.add_port("zlib", &[]);

    env
      .portsmith_cmd()
      .env("PORTSMITH_CMAKE", "portsmith-no-such-cmake")
      .args(["build", "zlib"])
      .assert()
      .failure()
      .stderr(predicate::str::contains("BUILD_FAILED"));
  }

  #[test]
  fn dirty_output_reports_post_build_checks_failed() {
    let env = TestEnv::new();
    env.add_port("zlib", &[]);

    env
      .portsmith_cmd()
      .env("PORTSMITH_CMAKE", "true")
      .args(["build", "zlib"])
      .assert()
      .failure()
      .stderr(predicate::str::contains("POST_BUILD_CHECKS_FAILED"));

    assert!(!env.control_path("zlib").exists());
  }

  #[test]
  fn successful_build_publishes_control() {
    let env = TestEnv::new();
    env.add_port("zlib", &["zlib-deps"]);
    env.install(&["zlib-deps"]);
    env.add_clean_package_output("zlib");

    env
      .portsmith_cmd()
      .env("PORTSMITH_CMAKE", "true")
      .args(["build", "zlib"])
      .assert()
      .success()
      .stdout(predicate::str::contains("Building package zlib:x64-windows succeeded"));

    let control = std::fs::read_to_string(env.control_path("zlib")).unwrap();
    assert!(control.starts_with("Package: zlib\n"));
    assert!(control.contains("Architecture: x64-windows\n"));
    assert!(control.contains("Depends: zlib-deps\n"));
  }

  #[test]
  fn successful_build_as_json() {
    let env = TestEnv::new();
    env.add_port("zlib", &[]);
    env.add_clean_package_output("zlib");

    let output = env
      .portsmith_cmd()
      .env("PORTSMITH_CMAKE", "true")
      .args(["build", "zlib", "--json"])
      .assert()
      .success()
      .get_output()
      .stdout
      .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["result"], "SUCCEEDED");
    assert!(report["duration_ms"].is_u64());
    assert!(report.get("missing").is_none());
  }
}
