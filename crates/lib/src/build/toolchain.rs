//! Native toolchain invocation.
//!
//! A [`ToolchainCommand`] carries the fields build recipes rely on (target
//! architecture, package name, triplet, platform toolset, port directory and
//! the toolchain entry script). [`ProcessInvoker`] turns it into a child
//! process.
//!
//! Some variables inherited from a developer shell break the compiler
//! environment initialization of the toolchain. They are removed from the
//! child's environment only; the parent process environment is left alone.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, error, info};

use crate::consts::TARGET_ARCHITECTURE_ENV;
use crate::descriptor::SourceDescriptor;
use crate::paths::{BuildPaths, ToolchainSettings, with_trailing_dot};
use crate::spec::Triplet;

/// Removed from the toolchain process environment before it starts.
pub const SCRUBBED_ENV_VARS: &[&str] = &["VSINSTALLDIR", "DevEnvDir"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainCommand {
  pub architecture: String,
  pub package: String,
  pub triplet: String,
  pub platform_toolset: String,
  pub port_dir: PathBuf,
  pub script: PathBuf,
  pub cmake: String,
  pub env_setup: Option<PathBuf>,
}

impl ToolchainCommand {
  pub fn new(
    descriptor: &SourceDescriptor,
    triplet: &Triplet,
    port_dir: &Path,
    paths: &BuildPaths,
    settings: &ToolchainSettings,
  ) -> Self {
    Self {
      architecture: triplet.architecture().to_string(),
      package: descriptor.name.clone(),
      triplet: triplet.canonical_name().to_string(),
      platform_toolset: settings.platform_toolset.clone(),
      port_dir: port_dir.to_path_buf(),
      script: paths.ports_cmake.clone(),
      cmake: settings.cmake.clone(),
      env_setup: settings.env_setup.clone(),
    }
  }

  /// Arguments passed to cmake in script mode.
  pub fn cmake_args(&self) -> Vec<String> {
    vec![
      "-DCMD=BUILD".to_string(),
      format!("-DPORT={}", self.package),
      format!("-DTARGET_TRIPLET={}", self.triplet),
      format!("-DPLATFORM_TOOLSET={}", self.platform_toolset),
      format!("-DCURRENT_PORT_DIR={}", with_trailing_dot(&self.port_dir)),
      "-P".to_string(),
      self.script.to_string_lossy().replace('\\', "/"),
    ]
  }

  /// Values of the setup line in order: setup script, architecture, cmake
  /// program, cmake arguments.
  fn setup_argv(&self, setup: &Path) -> Vec<String> {
    let mut argv = vec![setup.to_string_lossy().into_owned(), self.architecture.clone(), self.cmake.clone()];
    argv.extend(self.cmake_args());
    argv
  }

  /// Build the child process, with the scrubbed environment applied.
  pub fn to_process(&self) -> Command {
    let mut command = match &self.env_setup {
      Some(setup) => setup_then_cmake(&self.setup_argv(setup)),
      None => {
        let mut command = Command::new(&self.cmake);
        command.args(self.cmake_args());
        command
      }
    };

    for var in SCRUBBED_ENV_VARS {
      command.env_remove(var);
    }
    command.env(TARGET_ARCHITECTURE_ENV, &self.architecture);
    command
  }
}

/// Sources the setup script with the architecture as `$1`, then execs cmake.
///
/// `.` takes no arguments in POSIX sh, so the script is sourced from inside a
/// function whose positional parameters are the architecture. Every value is
/// passed as an argument and never becomes shell text.
#[cfg(not(windows))]
const SETUP_SCRIPT: &str = "portsmith_setup() { portsmith_script=\"$1\"; shift; . \"$portsmith_script\"; }; \
                            portsmith_setup \"$1\" \"$2\" >/dev/null 2>&1 && shift 2 && exec \"$@\"";

#[cfg(not(windows))]
fn setup_then_cmake(argv: &[String]) -> Command {
  let mut command = Command::new("/bin/sh");
  command.arg("-c").arg(SETUP_SCRIPT).arg(crate::consts::APP_NAME).args(argv);
  command
}

/// Prefix of the child variables holding each value of the setup line.
#[cfg(windows)]
const SETUP_ARG_ENV_PREFIX: &str = "PORTSMITH_SETUP_ARG_";

/// `cmd.exe` has no argument vector, so values reach the line through child
/// variables. `cmd` expands them once and does not rescan the result.
#[cfg(windows)]
fn setup_then_cmake(argv: &[String]) -> Command {
  use std::os::windows::process::CommandExt;

  let var = |i: usize| format!("%{}{}%", SETUP_ARG_ENV_PREFIX, i);
  let cmake = (2..argv.len()).map(|i| format!("\"{}\"", var(i))).collect::<Vec<_>>().join(" ");
  let line = format!("call \"{}\" {} >nul 2>&1 && {}", var(0), var(1), cmake);

  let mut command = Command::new("cmd.exe");
  command.arg("/C").raw_arg(format!("\"{}\"", line));
  for (i, value) in argv.iter().enumerate() {
    command.env(format!("{}{}", SETUP_ARG_ENV_PREFIX, i), value);
  }
  command
}

/// Runs a toolchain command to completion and reports its exit code.
pub trait ToolchainInvoker {
  fn execute(&self, command: &ToolchainCommand) -> i32;
}

/// Spawns the toolchain as a child process on the calling thread.
///
/// Output is inherited so recipe logs reach the operator directly. A process
/// that cannot be spawned or is terminated by a signal reports `-1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker;

impl ToolchainInvoker for ProcessInvoker {
  fn execute(&self, command: &ToolchainCommand) -> i32 {
    let mut process = command.to_process();
    info!(package = %command.package, triplet = %command.triplet, "starting toolchain");
    debug!(process = ?process, "spawning toolchain process");

    match process.status() {
      Ok(status) => status.code().unwrap_or(-1),
      Err(e) => {
        error!(program = ?process.get_program(), error = %e, "failed to start toolchain");
        -1
      }
    }
  }
}
