//! DeviceRegistry: the service object callers hold
//!
//! Ties the store, connection controller, and event channel together and
//! exposes the device-management operations. Share it with `Arc`; the device
//! list is only reachable through these methods.

use std::sync::{Arc, RwLock};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::catalog;
use crate::clock::{Clock, SystemClock};
use crate::link::{DeviceLink, SimulatedLink};

use super::config::RegistryConfig;
use super::connection::{ConnectAttempt, ConnectionController, ConnectionState};
use super::device::{BatteryLevel, Device, DeviceCategory, MacAddress};
use super::device_store::{self, DeviceStore, SharedStore};
use super::events::DeviceEvent;
use super::filter::{CategoryFilter, DeviceView};
use super::RegistryError;

/// Manages the session's devices.
pub struct DeviceRegistry {
    store: SharedStore,
    connections: ConnectionController,
    events: broadcast::Sender<DeviceEvent>,
    clock: Arc<dyn Clock>,
    config: RegistryConfig,
}

impl DeviceRegistry {
    /// Create a registry backed by a simulated link and the system clock.
    pub fn new(config: RegistryConfig) -> Self {
        let link = Arc::new(SimulatedLink::new(config.connect_latency()));
        Self::with_parts(config, link, Arc::new(SystemClock))
    }

    /// Create a registry with an explicit link and clock.
    pub fn with_parts(
        config: RegistryConfig,
        link: Arc<dyn DeviceLink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut store = DeviceStore::new();
        if config.seed_sample_devices {
            for device in catalog::sample_devices(clock.now()) {
                // Sample ids are distinct, so this cannot collide.
                if let Err(e) = store.add(device) {
                    log::warn!("Skipping sample device: {}", e);
                }
            }
        }
        let store = Arc::new(RwLock::new(store));

        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        let connections = ConnectionController::new(
            Arc::clone(&store),
            link,
            Arc::clone(&clock),
            events.clone(),
            config.connect_timeout(),
        );

        Self {
            store,
            connections,
            events,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Subscribe to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.events.subscribe()
    }

    /// Add a device picked from the catalog.
    ///
    /// Generates the id and MAC address, picks a battery level in 30..=100,
    /// and stores the device disconnected and never synced.
    pub fn add_device(
        &self,
        manufacturer: &str,
        model: &str,
        category: DeviceCategory,
    ) -> Result<Device, RegistryError> {
        let mut rng = rand::thread_rng();
        let device = Device::new(
            Uuid::new_v4().to_string(),
            format!("{} {}", manufacturer, model),
            model.to_string(),
            manufacturer.to_string(),
            category,
            BatteryLevel::random(&mut rng),
            MacAddress::random(&mut rng),
        );
        self.insert_device(device.clone())?;
        Ok(device)
    }

    /// Add a device entered by hand, with a caller-supplied MAC address.
    pub fn add_manual_device(
        &self,
        name: &str,
        manufacturer: &str,
        model: &str,
        category: DeviceCategory,
        mac_address: &str,
    ) -> Result<Device, RegistryError> {
        let mac_address: MacAddress = mac_address.parse()?;
        let device = Device::new(
            Uuid::new_v4().to_string(),
            name.to_string(),
            model.to_string(),
            manufacturer.to_string(),
            category,
            BatteryLevel::random(&mut rand::thread_rng()),
            mac_address,
        );
        self.insert_device(device.clone())?;
        Ok(device)
    }

    /// Store a fully-formed device.
    pub fn insert_device(&self, device: Device) -> Result<(), RegistryError> {
        device_store::write(&self.store).add(device.clone())?;
        log::info!("Added {} ({})", device.name, device.id);
        let _ = self.events.send(DeviceEvent::Added { device });
        Ok(())
    }

    /// Remove a device. Unknown ids are a no-op. An in-flight connect for the
    /// device is cancelled first.
    pub fn remove_device(&self, id: &str) -> Option<Device> {
        let removed = self.connections.remove(id)?;
        log::info!("Removed {} ({})", removed.name, removed.id);
        let _ = self.events.send(DeviceEvent::Removed {
            id: removed.id.clone(),
        });
        Some(removed)
    }

    pub fn find_device(&self, id: &str) -> Option<Device> {
        device_store::read(&self.store).find(id).cloned()
    }

    /// Devices matching the filter, in insertion order.
    pub fn list_devices(&self, filter: CategoryFilter) -> Vec<Device> {
        self.view(filter).into_devices()
    }

    /// Filtered snapshot with connected/disconnected partitions.
    pub fn view(&self, filter: CategoryFilter) -> DeviceView {
        filter.by_category(&device_store::read(&self.store))
    }

    pub fn len(&self) -> usize {
        device_store::read(&self.store).len()
    }

    pub fn is_empty(&self) -> bool {
        device_store::read(&self.store).is_empty()
    }

    /// Start a cancellable connect. See `ConnectionController::begin_connect`.
    pub fn begin_connect(&self, id: &str) -> Result<ConnectAttempt, RegistryError> {
        self.connections.begin_connect(id)
    }

    /// Connect a device and wait until it is connected or the attempt fails.
    pub async fn connect_device(&self, id: &str) -> Result<Device, RegistryError> {
        self.connections.connect(id).await
    }

    /// Cancel an in-flight connect by device id.
    pub fn cancel_connect(&self, id: &str) -> bool {
        self.connections.cancel(id)
    }

    pub fn disconnect_device(&self, id: &str) -> Result<Device, RegistryError> {
        self.connections.disconnect(id)
    }

    pub fn connection_state(&self, id: &str) -> Option<ConnectionState> {
        self.connections.state(id)
    }

    /// Ids of devices with a connect in flight.
    pub fn connecting(&self) -> Vec<String> {
        self.connections.connecting()
    }

    /// Record a new battery reading for a device.
    pub fn set_battery_level(&self, id: &str, percent: u8) -> Result<Device, RegistryError> {
        let level = BatteryLevel::new(percent)?;

        let mut store = device_store::write(&self.store);
        let device = store
            .find_mut(id)
            .ok_or_else(|| RegistryError::DeviceNotFound(id.to_string()))?;
        device.battery_level = level;
        let snapshot = device.clone();
        drop(store);

        if level.is_low() {
            log::warn!("{} battery low: {}", snapshot.name, level);
        } else {
            log::debug!("{} battery at {}", snapshot.name, level);
        }
        let _ = self.events.send(DeviceEvent::BatteryChanged {
            id: id.to_string(),
            level,
        });
        Ok(snapshot)
    }

    /// The clock sync times are stamped with.
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}
