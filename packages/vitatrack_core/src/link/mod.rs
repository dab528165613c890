//! Pairing link layer
//!
//! Abstracts the transport a connect attempt pairs through. Only a simulated
//! link exists; it models pairing latency on tokio time and lets tests inject
//! per-device faults.

pub mod simulated;
pub mod transport;

pub use simulated::{LinkFault, SimulatedLink};
pub use transport::DeviceLink;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    #[error("Device unreachable: {0}")]
    Unreachable(String),

    #[error("Pairing rejected: {0}")]
    Rejected(String),

    #[error("Link timed out")]
    Timeout,
}
