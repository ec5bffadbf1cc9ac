// Cockpit LED control - shared library
// Configuration and the interactive UI; the protocol lives in cockpit-transport

pub mod config;
pub mod tui;

pub use config::{Config, ConfigError, Overrides};
