//! In-process pairing simulator
//!
//! Every pair() sleeps for the configured latency and then succeeds, unless a
//! fault has been registered for the target address. Uses tokio time, so
//! paused clocks advance instantly in tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::registry::device::MacAddress;

use super::transport::DeviceLink;
use super::LinkError;

/// How a simulated peripheral misbehaves.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkFault {
    /// Fails after the latency elapses, as if nothing answered.
    Unreachable,
    /// Fails after the latency elapses with the given reason.
    Rejected(String),
    /// Fails after the latency elapses as if the radio gave up waiting.
    TimedOut,
    /// Never completes. Only a timeout or cancellation ends the attempt.
    Hang,
}

/// A simulated link with fixed pairing latency.
pub struct SimulatedLink {
    latency: Duration,
    faults: Mutex<HashMap<MacAddress, LinkFault>>,
    attempts: AtomicU32,
}

impl SimulatedLink {
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            faults: Mutex::new(HashMap::new()),
            attempts: AtomicU32::new(0),
        }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Make every future pairing with `address` fail in the given way.
    pub fn set_fault(&self, address: MacAddress, fault: LinkFault) {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(address, fault);
    }

    pub fn clear_fault(&self, address: &MacAddress) {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(address);
    }

    /// Number of pair() calls started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }

    fn fault_for(&self, address: &MacAddress) -> Option<LinkFault> {
        self.faults
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(address)
            .cloned()
    }
}

impl Default for SimulatedLink {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl DeviceLink for SimulatedLink {
    async fn pair(&self, address: &MacAddress) -> Result<(), LinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let fault = self.fault_for(address);

        if fault == Some(LinkFault::Hang) {
            std::future::pending::<()>().await;
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        match fault {
            None | Some(LinkFault::Hang) => Ok(()),
            Some(LinkFault::Unreachable) => Err(LinkError::Unreachable(address.to_string())),
            Some(LinkFault::Rejected(reason)) => Err(LinkError::Rejected(reason)),
            Some(LinkFault::TimedOut) => Err(LinkError::Timeout),
        }
    }
}
