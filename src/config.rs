//! Interpreter settings.
//!
//! Loaded from an optional JSON file (`--config`), with every field falling
//! back to its default; command line flags override individual fields.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::Result;

pub const DEFAULT_MAX_CALL_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Nested `call` depth after which a run fails with a stack overflow.
    pub max_call_depth: usize,

    /// Reject writes to `const` bindings.  When off, constness is advisory.
    pub enforce_constants: bool,

    /// Fixed seed for `rand`; `None` draws from OS entropy.
    pub seed: Option<u64>,

    /// Where the REPL resolves `run <name>`.
    pub program_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            enforce_constants: true,
            seed: None,
            program_dir: PathBuf::from("programs"),
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        info!("Loading configuration from {:?}", path);

        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;

        info!("Configuration loaded: {:?}", config);
        Ok(config)
    }
}
