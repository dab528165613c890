//! Link trait definition
//!
//! Defines the abstract pairing interface that the simulated link and any
//! future real BLE link conform to.

use async_trait::async_trait;

use crate::registry::device::MacAddress;

use super::LinkError;

/// Establishes links with peripherals on behalf of the connection controller.
///
/// `pair` may be dropped mid-flight when an attempt is cancelled or times out,
/// so implementations must not leave shared state half-updated across an
/// await point.
#[async_trait]
pub trait DeviceLink: Send + Sync {
    /// Pair with the peripheral at `address`. Resolves once the link is up.
    async fn pair(&self, address: &MacAddress) -> Result<(), LinkError>;
}
