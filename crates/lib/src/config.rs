//! Flow configuration.
//!
//! The built-in defaults reproduce the fixed AXI-Stream FIFO flow. A `simrun.toml`
//! file and a couple of environment variables can override them; see
//! [`FlowConfig::resolve`] for the order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_FILE_NAME, DEFAULT_BUILD_DIR, DEFAULT_MAKE, DEFAULT_RTL_DIR, DEFAULT_TOP, DEFAULT_VERILATOR, ENV_MAKE,
  ENV_VERILATOR, MODEL_PREFIX,
};

/// Errors that can occur while loading a flow configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// An explicitly requested config file does not exist.
  #[error("config file not found: {0}")]
  NotFound(PathBuf),

  #[error("failed to read config {path}: {source}")]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("invalid config {path}: {source}")]
  Parse {
    path: PathBuf,
    #[source]
    source: toml::de::Error,
  },
}

/// External tool binaries invoked by the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tools {
  pub verilator: String,
  pub make: String,
}

impl Default for Tools {
  fn default() -> Self {
    Self {
      verilator: DEFAULT_VERILATOR.to_string(),
      make: DEFAULT_MAKE.to_string(),
    }
  }
}

/// Switches passed to the model generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerilatorFlags {
  /// `--assert`
  pub assert: bool,
  /// `--Wall`
  pub warnings: bool,
  /// `--trace`
  pub trace: bool,
}

impl Default for VerilatorFlags {
  fn default() -> Self {
    Self {
      assert: true,
      warnings: true,
      trace: true,
    }
  }
}

/// Everything needed to render the four stage commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlowConfig {
  /// Top-level RTL module name.
  pub top: String,

  /// Include directory for the generator (`-I`), also the default home of the RTL source.
  pub rtl_dir: String,

  /// RTL source file. Defaults to `<rtl_dir>/<top>.sv`.
  pub source: Option<String>,

  /// C++ test harness. Defaults to `test/test_<top>.cpp`.
  pub harness: Option<String>,

  /// Directory the generator writes into and the clean stage removes.
  pub build_dir: String,

  pub tools: Tools,

  pub verilator: VerilatorFlags,

  /// Shell used to run each command line. Defaults to `/bin/sh` (Unix) or PowerShell (Windows).
  pub shell: Option<String>,
}

impl Default for FlowConfig {
  fn default() -> Self {
    Self {
      top: DEFAULT_TOP.to_string(),
      rtl_dir: DEFAULT_RTL_DIR.to_string(),
      source: None,
      harness: None,
      build_dir: DEFAULT_BUILD_DIR.to_string(),
      tools: Tools::default(),
      verilator: VerilatorFlags::default(),
      shell: None,
    }
  }
}

impl FlowConfig {
  /// Resolve the configuration for a run in `work_dir`.
  ///
  /// Later sources win:
  /// 1. built-in defaults
  /// 2. `explicit` if given (must exist), otherwise `simrun.toml` in `work_dir` if present
  /// 3. `SIMRUN_VERILATOR` / `SIMRUN_MAKE`
  pub fn resolve(explicit: Option<&Path>, work_dir: &Path) -> Result<Self, ConfigError> {
    let mut config = match explicit {
      Some(path) => {
        if !path.exists() {
          return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        Self::load_file(path)?
      }
      None => {
        let candidate = work_dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
          Self::load_file(&candidate)?
        } else {
          debug!(dir = %work_dir.display(), "no config file, using defaults");
          Self::default()
        }
      }
    };

    config.apply_env();
    Ok(config)
  }

  /// Load a config file. Keys missing from the file keep their defaults.
  pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Apply tool overrides from the environment. Empty values are ignored.
  pub fn apply_env(&mut self) {
    if let Some(verilator) = non_empty_var(ENV_VERILATOR) {
      debug!(verilator = %verilator, "generator overridden from environment");
      self.tools.verilator = verilator;
    }
    if let Some(make) = non_empty_var(ENV_MAKE) {
      debug!(make = %make, "build tool overridden from environment");
      self.tools.make = make;
    }
  }

  pub fn source_path(&self) -> String {
    match &self.source {
      Some(source) => source.clone(),
      None => format!("{}{}.sv", dir_prefix(&self.rtl_dir), self.top),
    }
  }

  pub fn harness_path(&self) -> String {
    match &self.harness {
      Some(harness) => harness.clone(),
      None => format!("test/test_{}.cpp", self.top),
    }
  }

  /// Name Verilator gives the generated model, e.g. `Vaxis_fifo`.
  pub fn model_name(&self) -> String {
    format!("{}{}", MODEL_PREFIX, self.top)
  }

  /// Generated makefile, relative to the build directory.
  pub fn makefile(&self) -> String {
    format!("{}.mk", self.model_name())
  }

  /// Build directory as passed to the shell. Relative paths get a `./` prefix, absolute ones are kept.
  pub fn build_dir_path(&self) -> String {
    if Path::new(&self.build_dir).is_absolute() || self.build_dir.starts_with("./") {
      self.build_dir.clone()
    } else {
      format!("./{}", self.build_dir)
    }
  }

  /// Path of the model executable.
  pub fn executable(&self) -> String {
    format!("{}/{}", self.build_dir_path(), self.model_name())
  }
}

fn non_empty_var(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// `rtl_dir` with exactly one trailing separator.
fn dir_prefix(dir: &str) -> String {
  if dir.ends_with('/') {
    dir.to_string()
  } else {
    format!("{}/", dir)
  }
}
