//! Error types for the configuration surface.
//!
//! The simulation itself cannot fail; only loading settings can.

use std::io;

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Settings parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown device class: {0}")]
    UnknownDevice(String),
}
