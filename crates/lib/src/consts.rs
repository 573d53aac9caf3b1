//! Application-wide constants and the built-in flow defaults.

/// Config file looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "simrun.toml";

/// Overrides the simulation-model generator binary.
pub const ENV_VERILATOR: &str = "SIMRUN_VERILATOR";

/// Overrides the build tool binary.
pub const ENV_MAKE: &str = "SIMRUN_MAKE";

pub const DEFAULT_VERILATOR: &str = "verilator";
pub const DEFAULT_MAKE: &str = "make";
pub const DEFAULT_TOP: &str = "axis_fifo";
pub const DEFAULT_RTL_DIR: &str = "./rtl/";
pub const DEFAULT_BUILD_DIR: &str = "obj_dir";

/// Prefix Verilator puts in front of the top module for generated files.
pub const MODEL_PREFIX: &str = "V";
