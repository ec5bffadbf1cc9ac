//! Keyboard interface error types

use cockpit_transport::TransportError;
use thiserror::Error;

/// Errors from keyboard operations
#[derive(Error, Debug)]
pub enum KeyboardError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Device returned unexpected response
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl KeyboardError {
    /// True when the command never reached a device
    pub fn is_not_connected(&self) -> bool {
        matches!(self, Self::Transport(TransportError::NotConnected))
    }

    /// True when the hidraw node exists but we may not open it
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, Self::Transport(TransportError::HidPermissionDenied(_)))
    }
}
