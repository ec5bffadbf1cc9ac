//! Persistent settings: which device to talk to and how to talk to it
//!
//! Loaded from `$XDG_CONFIG_HOME/cockpit/config.toml`. Every field is
//! optional; command-line flags override whatever the file says.
//!
//! ```toml
//! [device]
//! vendor_id = 0x4648
//! product_id = 0x0001
//!
//! [session]
//! read_timeout_ms = 500
//! await_response = true
//! ```

use std::path::{Path, PathBuf};

use cockpit_transport::{DeviceIdentity, SessionConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub device: DeviceIdentity,
    pub session: SessionConfig,
}

/// Values given on the command line, applied on top of the file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub read_timeout_ms: Option<u16>,
    pub no_wait: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the default config file, or built-in defaults if it doesn't exist
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = default_config_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(vid) = overrides.vendor_id {
            self.device.vendor_id = vid;
        }
        if let Some(pid) = overrides.product_id {
            self.device.product_id = pid;
        }
        if let Some(ms) = overrides.read_timeout_ms {
            self.session.read_timeout_ms = ms;
        }
        if overrides.no_wait {
            self.session.await_response = false;
        }
        self
    }
}

/// Path to the default config file
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn config_dir() -> PathBuf {
    if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
        PathBuf::from(config).join("cockpit")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".config/cockpit")
    } else {
        PathBuf::from("/tmp/cockpit")
    }
}
