//! Device registry: paired health peripherals
//!
//! This module owns the in-memory list of devices and drives their
//! connect/disconnect lifecycle. `DeviceRegistry` is the service object handed
//! to callers; the store, controller, and filters underneath it are usable on
//! their own.

pub mod config;
pub mod connection;
pub mod device;
pub mod device_store;
pub mod events;
pub mod filter;
pub mod manager;

pub use config::RegistryConfig;
pub use connection::{ConnectAttempt, ConnectionController, ConnectionState};
pub use device::{BatteryLevel, Device, DeviceCategory, MacAddress};
pub use device_store::DeviceStore;
pub use events::DeviceEvent;
pub use filter::{CategoryFilter, DeviceView};
pub use manager::DeviceRegistry;

use std::time::Duration;

use thiserror::Error;

use crate::link::LinkError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Duplicate device id: {0}")]
    DuplicateId(String),

    #[error("Already connecting: {0}")]
    AlreadyConnecting(String),

    #[error("Connect to {id} timed out after {after:?}")]
    ConnectTimeout { id: String, after: Duration },

    #[error("Connect cancelled: {0}")]
    Cancelled(String),

    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Invalid battery level: {0} (expected 0-100)")]
    InvalidBatteryLevel(u8),

    #[error("Invalid MAC address: {0}")]
    InvalidMacAddress(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Connect task failed: {0}")]
    TaskFailed(String),
}
