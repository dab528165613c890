//! Connect/disconnect lifecycle
//!
//! Each device is `Disconnected`, `Connecting`, or `Connected`. A connect
//! attempt pairs through a `DeviceLink` on a spawned task and is represented to
//! the caller by a `ConnectAttempt` handle that can be awaited or cancelled.
//!
//! At most one attempt is in flight per device. Completion and cancellation
//! both go through the in-flight table lock, so once a cancel has taken effect
//! the attempt can no longer touch the device.
//!
//! Lock order: in-flight table, then store.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::clock::Clock;
use crate::link::DeviceLink;

use super::device::{Device, MacAddress};
use super::device_store::{self, SharedStore};
use super::events::DeviceEvent;
use super::RegistryError;

/// Connection state of a single device.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        };
        f.write_str(s)
    }
}

struct InFlight {
    attempt_id: Uuid,
    token: CancellationToken,
}

struct Shared {
    store: SharedStore,
    in_flight: Mutex<HashMap<String, InFlight>>,
    link: Arc<dyn DeviceLink>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<DeviceEvent>,
    timeout: Option<Duration>,
}

impl Shared {
    fn in_flight(&self) -> MutexGuard<'_, HashMap<String, InFlight>> {
        self.in_flight.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn emit(&self, event: DeviceEvent) {
        let _ = self.events.send(event);
    }

    /// Remove the in-flight entry for `id` and cancel it. When `attempt_id`
    /// is given, only that attempt is cancelled.
    fn cancel_locked(
        &self,
        in_flight: &mut HashMap<String, InFlight>,
        id: &str,
        attempt_id: Option<Uuid>,
    ) -> bool {
        let matches = match (in_flight.get(id), attempt_id) {
            (Some(entry), Some(wanted)) => entry.attempt_id == wanted,
            (Some(_), None) => true,
            (None, _) => false,
        };
        if !matches {
            return false;
        }
        if let Some(entry) = in_flight.remove(id) {
            entry.token.cancel();
            log::info!("Cancelled connect to {}", id);
            self.emit(DeviceEvent::ConnectCancelled { id: id.to_string() });
        }
        true
    }

    async fn run_attempt(
        self: Arc<Self>,
        id: String,
        address: MacAddress,
        attempt_id: Uuid,
        token: CancellationToken,
    ) -> Result<Device, RegistryError> {
        let paired = tokio::select! {
            biased;
            _ = token.cancelled() => Err(RegistryError::Cancelled(id.clone())),
            result = self.pair(&id, &address) => result,
        };
        self.finish(&id, attempt_id, &token, paired)
    }

    async fn pair(&self, id: &str, address: &MacAddress) -> Result<(), RegistryError> {
        match self.timeout {
            Some(after) => tokio::time::timeout(after, self.link.pair(address))
                .await
                .map_err(|_| RegistryError::ConnectTimeout {
                    id: id.to_string(),
                    after,
                })?
                .map_err(RegistryError::from),
            None => self.link.pair(address).await.map_err(RegistryError::from),
        }
    }

    fn finish(
        &self,
        id: &str,
        attempt_id: Uuid,
        token: &CancellationToken,
        paired: Result<(), RegistryError>,
    ) -> Result<Device, RegistryError> {
        let mut in_flight = self.in_flight();

        let ours = matches!(in_flight.get(id), Some(entry) if entry.attempt_id == attempt_id);
        if !ours || token.is_cancelled() {
            if ours {
                in_flight.remove(id);
            }
            return Err(RegistryError::Cancelled(id.to_string()));
        }
        in_flight.remove(id);

        if let Err(e) = paired {
            log::warn!("Connect to {} failed: {}", id, e);
            self.emit(DeviceEvent::ConnectFailed {
                id: id.to_string(),
                reason: e.to_string(),
            });
            return Err(e);
        }

        let mut store = device_store::write(&self.store);
        let device = store
            .find_mut(id)
            .ok_or_else(|| RegistryError::DeviceNotFound(id.to_string()))?;
        device.is_connected = true;
        device.last_sync_date = Some(self.clock.now());
        let snapshot = device.clone();
        drop(store);

        log::info!("Connected {} ({})", snapshot.name, snapshot.id);
        self.emit(DeviceEvent::Connected {
            device: snapshot.clone(),
        });
        Ok(snapshot)
    }
}

/// Drives the connected/disconnected state machine for devices in a store.
pub struct ConnectionController {
    shared: Arc<Shared>,
}

impl ConnectionController {
    pub fn new(
        store: SharedStore,
        link: Arc<dyn DeviceLink>,
        clock: Arc<dyn Clock>,
        events: broadcast::Sender<DeviceEvent>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                store,
                in_flight: Mutex::new(HashMap::new()),
                link,
                clock,
                events,
                timeout,
            }),
        }
    }

    /// Start connecting a device.
    ///
    /// Spawns the pairing task, so this must be called from within a tokio
    /// runtime. Fails with `DeviceNotFound` for unknown ids and
    /// `AlreadyConnecting` while another attempt for the same device is in
    /// flight. A device that is already connected yields an attempt that
    /// resolves immediately to the unchanged device.
    pub fn begin_connect(&self, id: &str) -> Result<ConnectAttempt, RegistryError> {
        let mut in_flight = self.shared.in_flight();

        let device = device_store::read(&self.shared.store)
            .find(id)
            .cloned()
            .ok_or_else(|| RegistryError::DeviceNotFound(id.to_string()))?;

        if in_flight.contains_key(id) {
            return Err(RegistryError::AlreadyConnecting(id.to_string()));
        }

        if device.is_connected {
            log::debug!("{} is already connected", id);
            return Ok(ConnectAttempt {
                device_id: id.to_string(),
                attempt_id: None,
                outcome: Some(Outcome::Ready(Ok(device))),
                shared: Arc::clone(&self.shared),
            });
        }

        let attempt_id = Uuid::new_v4();
        let token = CancellationToken::new();
        in_flight.insert(
            id.to_string(),
            InFlight {
                attempt_id,
                token: token.clone(),
            },
        );
        log::info!("Connecting {} ({})", device.name, id);
        self.shared.emit(DeviceEvent::Connecting { id: id.to_string() });
        drop(in_flight);

        let task = Arc::clone(&self.shared).run_attempt(
            id.to_string(),
            device.mac_address,
            attempt_id,
            token,
        );
        let handle = tokio::spawn(task);

        Ok(ConnectAttempt {
            device_id: id.to_string(),
            attempt_id: Some(attempt_id),
            outcome: Some(Outcome::Pending(handle)),
            shared: Arc::clone(&self.shared),
        })
    }

    /// Connect a device and wait for the result.
    pub async fn connect(&self, id: &str) -> Result<Device, RegistryError> {
        self.begin_connect(id)?.wait().await
    }

    /// Disconnect immediately. Any in-flight attempt for the device is
    /// cancelled. `last_sync_date` is left as it was.
    pub fn disconnect(&self, id: &str) -> Result<Device, RegistryError> {
        let mut in_flight = self.shared.in_flight();
        let mut store = device_store::write(&self.shared.store);

        let device = store
            .find_mut(id)
            .ok_or_else(|| RegistryError::DeviceNotFound(id.to_string()))?;
        let was_connected = device.is_connected;
        device.is_connected = false;
        let snapshot = device.clone();
        drop(store);

        self.shared.cancel_locked(&mut in_flight, id, None);
        if was_connected {
            log::info!("Disconnected {} ({})", snapshot.name, id);
            self.shared.emit(DeviceEvent::Disconnected { id: id.to_string() });
        }
        Ok(snapshot)
    }

    /// Cancel the in-flight attempt for a device. Returns whether anything was
    /// cancelled.
    pub fn cancel(&self, id: &str) -> bool {
        let mut in_flight = self.shared.in_flight();
        self.shared.cancel_locked(&mut in_flight, id, None)
    }

    /// Current state of a device, or `None` if the id is unknown.
    pub fn state(&self, id: &str) -> Option<ConnectionState> {
        let in_flight = self.shared.in_flight();
        let store = device_store::read(&self.shared.store);
        let device = store.find(id)?;

        Some(if in_flight.contains_key(id) {
            ConnectionState::Connecting
        } else if device.is_connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        })
    }

    /// Ids of devices with an attempt in flight.
    pub fn connecting(&self) -> Vec<String> {
        self.shared.in_flight().keys().cloned().collect()
    }

    /// Remove a device from the store, cancelling any attempt in flight.
    pub(crate) fn remove(&self, id: &str) -> Option<Device> {
        let mut in_flight = self.shared.in_flight();
        self.shared.cancel_locked(&mut in_flight, id, None);
        device_store::write(&self.shared.store).remove(id)
    }
}

enum Outcome {
    Ready(Result<Device, RegistryError>),
    Pending(JoinHandle<Result<Device, RegistryError>>),
}

/// Handle to one connect attempt.
///
/// Dropping the handle before the attempt finishes cancels it.
pub struct ConnectAttempt {
    device_id: String,
    attempt_id: Option<Uuid>,
    outcome: Option<Outcome>,
    shared: Arc<Shared>,
}

impl ConnectAttempt {
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Cancel this attempt. Returns `true` if it was still in flight, in
    /// which case the device is left untouched.
    pub fn cancel(&self) -> bool {
        let Some(attempt_id) = self.attempt_id else {
            return false;
        };
        let mut in_flight = self.shared.in_flight();
        self.shared
            .cancel_locked(&mut in_flight, &self.device_id, Some(attempt_id))
    }

    pub fn is_finished(&self) -> bool {
        match &self.outcome {
            Some(Outcome::Pending(handle)) => handle.is_finished(),
            _ => true,
        }
    }

    /// Wait for the attempt to resolve. Yields the connected device, or the
    /// reason it did not connect.
    pub async fn wait(mut self) -> Result<Device, RegistryError> {
        match self.outcome.take() {
            Some(Outcome::Ready(result)) => result,
            Some(Outcome::Pending(handle)) => match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let reason = e.to_string();
                    self.abandon(&reason);
                    Err(RegistryError::TaskFailed(reason))
                }
            },
            None => Err(RegistryError::TaskFailed("attempt already awaited".into())),
        }
    }

    /// Clear the in-flight entry of a task that died without finishing.
    fn abandon(&self, reason: &str) {
        let Some(attempt_id) = self.attempt_id else {
            return;
        };
        let mut in_flight = self.shared.in_flight();
        let ours = matches!(
            in_flight.get(&self.device_id),
            Some(entry) if entry.attempt_id == attempt_id
        );
        if !ours {
            return;
        }
        in_flight.remove(&self.device_id);
        log::warn!("Connect task for {} failed: {}", self.device_id, reason);
        self.shared.emit(DeviceEvent::ConnectFailed {
            id: self.device_id.clone(),
            reason: reason.to_string(),
        });
    }
}

impl Drop for ConnectAttempt {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for ConnectAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectAttempt")
            .field("device_id", &self.device_id)
            .field("attempt_id", &self.attempt_id)
            .field("finished", &self.is_finished())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    use chrono::{TimeZone, Utc};

    use crate::clock::ManualClock;
    use crate::link::{LinkError, LinkFault, SimulatedLink};
    use crate::registry::device::{BatteryLevel, DeviceCategory};
    use crate::registry::device_store::DeviceStore;

    const LATENCY: Duration = Duration::from_secs(2);

    struct Fixture {
        store: SharedStore,
        link: Arc<SimulatedLink>,
        clock: Arc<ManualClock>,
        events: broadcast::Receiver<DeviceEvent>,
        controller: ConnectionController,
    }

    fn mac(last: u8) -> MacAddress {
        MacAddress::new([0xB4, 0xC3, 0xD2, 0xE1, 0xF0, last])
    }

    fn make_device(id: &str, last: u8) -> Device {
        Device::new(
            id.to_string(),
            format!("欧姆龙 {}", id),
            "HEM-7156".to_string(),
            "欧姆龙".to_string(),
            DeviceCategory::BloodPressure,
            BatteryLevel::new(85).unwrap(),
            mac(last),
        )
    }

    fn fixture_with_timeout(timeout: Option<Duration>) -> Fixture {
        let mut store = DeviceStore::new();
        store.add(make_device("d1", 0x01)).unwrap();
        store.add(make_device("d2", 0x02)).unwrap();
        let store = Arc::new(RwLock::new(store));

        let link = Arc::new(SimulatedLink::new(LATENCY));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 5, 7, 9, 30, 0).unwrap(),
        ));
        let (tx, rx) = broadcast::channel(64);

        let controller = ConnectionController::new(
            Arc::clone(&store),
            link.clone(),
            clock.clone(),
            tx,
            timeout,
        );
        Fixture {
            store,
            link,
            clock,
            events: rx,
            controller,
        }
    }

    fn fixture() -> Fixture {
        fixture_with_timeout(None)
    }

    fn stored(fx: &Fixture, id: &str) -> Device {
        device_store::read(&fx.store).find(id).cloned().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_sets_connected_and_sync_time() {
        let fx = fixture();
        let call_time = fx.clock.now();

        let before = tokio::time::Instant::now();
        let device = fx.controller.connect("d1").await.unwrap();

        assert!(before.elapsed() >= LATENCY);
        assert!(device.is_connected);
        let synced = device.last_sync_date.unwrap();
        assert!(synced >= call_time);
        assert_eq!(stored(&fx, "d1"), device);
        assert_eq!(fx.controller.state("d1"), Some(ConnectionState::Connected));

        // The other device is untouched.
        assert!(!stored(&fx, "d2").is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_state_is_connecting_while_in_flight() {
        let fx = fixture();

        let attempt = fx.controller.begin_connect("d1").unwrap();
        assert_eq!(fx.controller.state("d1"), Some(ConnectionState::Connecting));
        assert_eq!(fx.controller.connecting(), vec!["d1".to_string()]);
        assert!(!stored(&fx, "d1").is_connected);

        attempt.wait().await.unwrap();
        assert!(fx.controller.connecting().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_completion_leaves_device_untouched() {
        let fx = fixture();
        let before = stored(&fx, "d1");

        let attempt = fx.controller.begin_connect("d1").unwrap();
        tokio::time::sleep(Duration::from_millis(500)).await;

        assert!(attempt.cancel());
        let result = attempt.wait().await;
        assert_eq!(result, Err(RegistryError::Cancelled("d1".to_string())));

        // Well past the pairing latency, nothing has fired.
        tokio::time::sleep(LATENCY * 3).await;
        assert_eq!(stored(&fx, "d1"), before);
        assert_eq!(
            fx.controller.state("d1"),
            Some(ConnectionState::Disconnected)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_by_id() {
        let fx = fixture();

        let attempt = fx.controller.begin_connect("d2").unwrap();
        assert!(fx.controller.cancel("d2"));
        assert!(!fx.controller.cancel("d2"));

        assert!(matches!(
            attempt.wait().await,
            Err(RegistryError::Cancelled(_))
        ));
        assert!(!stored(&fx, "d2").is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_attempt_cancels_it() {
        let fx = fixture();

        {
            let _attempt = fx.controller.begin_connect("d1").unwrap();
        }
        assert_eq!(
            fx.controller.state("d1"),
            Some(ConnectionState::Disconnected)
        );

        tokio::time::sleep(LATENCY * 2).await;
        assert!(!stored(&fx, "d1").is_connected);
        assert!(stored(&fx, "d1").last_sync_date.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_completion_is_noop() {
        let fx = fixture();

        let attempt = fx.controller.begin_connect("d1").unwrap();
        tokio::time::sleep(LATENCY * 2).await;
        assert!(attempt.is_finished());

        assert!(!attempt.cancel());
        let device = attempt.wait().await.unwrap();
        assert!(device.is_connected);
        assert!(stored(&fx, "d1").is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_connect_rejected_while_connecting() {
        let fx = fixture();

        let first = fx.controller.begin_connect("d1").unwrap();
        let second = fx.controller.begin_connect("d1");
        assert_eq!(
            second.unwrap_err(),
            RegistryError::AlreadyConnecting("d1".to_string())
        );

        first.wait().await.unwrap();
        // Only one pairing ran.
        assert_eq!(fx.link.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_connect_when_connected_is_noop() {
        let fx = fixture();
        let first = fx.controller.connect("d1").await.unwrap();

        fx.clock.advance(chrono::Duration::hours(1));
        let before = tokio::time::Instant::now();
        let second = fx.controller.connect("d1").await.unwrap();

        assert_eq!(before.elapsed(), Duration::ZERO);
        assert_eq!(second, first);
        assert_eq!(fx.link.attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_device() {
        let fx = fixture();

        assert_eq!(
            fx.controller.begin_connect("nope").unwrap_err(),
            RegistryError::DeviceNotFound("nope".to_string())
        );
        assert_eq!(
            fx.controller.disconnect("nope").unwrap_err(),
            RegistryError::DeviceNotFound("nope".to_string())
        );
        assert_eq!(fx.controller.state("nope"), None);
        assert_eq!(fx.link.attempts(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_keeps_last_sync() {
        let fx = fixture();
        let connected = fx.controller.connect("d1").await.unwrap();

        fx.clock.advance(chrono::Duration::minutes(5));
        let device = fx.controller.disconnect("d1").unwrap();

        assert!(!device.is_connected);
        assert_eq!(device.last_sync_date, connected.last_sync_date);
        assert_eq!(stored(&fx, "d1"), device);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_while_connecting_cancels() {
        let fx = fixture();

        let attempt = fx.controller.begin_connect("d1").unwrap();
        fx.controller.disconnect("d1").unwrap();

        assert_eq!(
            attempt.wait().await,
            Err(RegistryError::Cancelled("d1".to_string()))
        );
        tokio::time::sleep(LATENCY * 2).await;
        assert!(!stored(&fx, "d1").is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_failure_leaves_disconnected() {
        let fx = fixture();
        fx.link.set_fault(mac(0x01), LinkFault::Unreachable);

        let result = fx.controller.connect("d1").await;
        assert_eq!(
            result,
            Err(RegistryError::Link(LinkError::Unreachable(
                "B4:C3:D2:E1:F0:01".to_string()
            )))
        );
        assert!(!stored(&fx, "d1").is_connected);
        assert!(stored(&fx, "d1").last_sync_date.is_none());

        // A retry after the fault clears succeeds.
        fx.link.clear_fault(&mac(0x01));
        assert!(fx.controller.connect("d1").await.unwrap().is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let fx = fixture_with_timeout(Some(Duration::from_secs(5)));
        fx.link.set_fault(mac(0x02), LinkFault::Hang);

        let before = tokio::time::Instant::now();
        let result = fx.controller.connect("d2").await;

        assert_eq!(
            result,
            Err(RegistryError::ConnectTimeout {
                id: "d2".to_string(),
                after: Duration::from_secs(5),
            })
        );
        assert!(before.elapsed() >= Duration::from_secs(5));
        assert_eq!(
            fx.controller.state("d2"),
            Some(ConnectionState::Disconnected)
        );

        // Timeouts do not affect links that answer in time.
        assert!(fx.controller.connect("d1").await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_cancels_in_flight() {
        let fx = fixture();

        let attempt = fx.controller.begin_connect("d1").unwrap();
        let removed = fx.controller.remove("d1").unwrap();
        assert_eq!(removed.id, "d1");

        assert!(matches!(
            attempt.wait().await,
            Err(RegistryError::Cancelled(_))
        ));
        assert!(device_store::read(&fx.store).find("d1").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_link_timeout_is_reported_as_link_error() {
        let fx = fixture();
        fx.link.set_fault(mac(0x01), LinkFault::TimedOut);

        let result = fx.controller.connect("d1").await;
        assert_eq!(result, Err(RegistryError::Link(LinkError::Timeout)));
        assert!(!stored(&fx, "d1").is_connected);
    }

    struct CrashingLink;

    #[async_trait::async_trait]
    impl DeviceLink for CrashingLink {
        async fn pair(&self, _address: &MacAddress) -> Result<(), LinkError> {
            panic!("radio firmware crashed");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_crashed_task_reports_failure_not_cancel() {
        let mut store = DeviceStore::new();
        store.add(make_device("d1", 0x01)).unwrap();
        let store = Arc::new(RwLock::new(store));
        let (tx, mut events) = broadcast::channel(16);
        let controller = ConnectionController::new(
            Arc::clone(&store),
            Arc::new(CrashingLink),
            Arc::new(ManualClock::new(Utc::now())),
            tx,
            None,
        );

        let result = controller.begin_connect("d1").unwrap().wait().await;
        assert!(matches!(result, Err(RegistryError::TaskFailed(_))));
        assert_eq!(
            controller.state("d1"),
            Some(ConnectionState::Disconnected)
        );
        assert!(controller.connecting().is_empty());

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            seen.push(event);
        }
        assert_eq!(seen.len(), 2);
        assert!(matches!(&seen[0], DeviceEvent::Connecting { id } if id == "d1"));
        assert!(matches!(&seen[1], DeviceEvent::ConnectFailed { id, .. } if id == "d1"));

        // The device can be retried.
        let retry = controller.begin_connect("d1").unwrap();
        assert!(retry.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn test_event_sequence() {
        let mut fx = fixture();

        fx.controller.connect("d1").await.unwrap();
        fx.controller.disconnect("d1").unwrap();
        let attempt = fx.controller.begin_connect("d2").unwrap();
        attempt.cancel();

        let mut seen = Vec::new();
        while let Ok(event) = fx.events.try_recv() {
            seen.push(event);
        }

        assert!(matches!(&seen[0], DeviceEvent::Connecting { id } if id == "d1"));
        assert!(matches!(&seen[1], DeviceEvent::Connected { device } if device.id == "d1"));
        assert!(matches!(&seen[2], DeviceEvent::Disconnected { id } if id == "d1"));
        assert!(matches!(&seen[3], DeviceEvent::Connecting { id } if id == "d2"));
        assert!(matches!(&seen[4], DeviceEvent::ConnectCancelled { id } if id == "d2"));
        assert_eq!(seen.len(), 5);
    }
}
