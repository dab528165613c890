// VitaTrack - Health Device Registry

pub mod catalog;
pub mod clock;
pub mod link;
pub mod registry;

pub use registry::{
    CategoryFilter, ConnectAttempt, ConnectionState, Device, DeviceCategory, DeviceEvent,
    DeviceRegistry, RegistryConfig, RegistryError,
};
