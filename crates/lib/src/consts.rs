pub const APP_NAME: &str = "portsmith";

/// Name of the descriptor file in a port directory and of the metadata record in a package directory.
pub const CONTROL_FILE: &str = "CONTROL";

pub const ROOT_ENV: &str = "PORTSMITH_ROOT";
pub const DEFAULT_TRIPLET_ENV: &str = "PORTSMITH_DEFAULT_TRIPLET";
pub const CMAKE_ENV: &str = "PORTSMITH_CMAKE";
pub const PLATFORM_TOOLSET_ENV: &str = "PORTSMITH_PLATFORM_TOOLSET";
pub const ENV_SETUP_ENV: &str = "PORTSMITH_ENV_SETUP";

/// Exported to the toolchain process so recipes can read the target architecture.
pub const TARGET_ARCHITECTURE_ENV: &str = "PORTSMITH_TARGET_ARCHITECTURE";
