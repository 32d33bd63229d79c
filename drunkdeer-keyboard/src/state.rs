//! State shared between the controller and its I/O threads

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender};
use drunkdeer_transport::protocol::cmd;
use drunkdeer_transport::TransportError;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use crate::decode::Response;
use crate::light::LightState;
use crate::model::DeviceIdentity;

pub(crate) struct DeviceState {
    closing: AtomicBool,
    /// Dropped on shutdown; every receiver wakes with `Disconnected`
    shutdown_tx: Mutex<Option<Sender<()>>>,
    shutdown_rx: Receiver<()>,

    identity: Mutex<Option<DeviceIdentity>>,
    identity_ready: Condvar,

    light: Mutex<LightState>,
    turbo: AtomicBool,
    rapid_trigger: AtomicBool,

    /// Payloads enqueued but not yet written
    pending: Mutex<usize>,
    drained: Condvar,

    fatal: Mutex<Option<TransportError>>,
}

impl DeviceState {
    pub fn new() -> Self {
        let (shutdown_tx, shutdown_rx) = bounded(0);
        Self {
            closing: AtomicBool::new(false),
            shutdown_tx: Mutex::new(Some(shutdown_tx)),
            shutdown_rx,
            identity: Mutex::new(None),
            identity_ready: Condvar::new(),
            light: Mutex::new(LightState::default()),
            turbo: AtomicBool::new(false),
            rapid_trigger: AtomicBool::new(false),
            pending: Mutex::new(0),
            drained: Condvar::new(),
            fatal: Mutex::new(None),
        }
    }

    // === Shutdown ===

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// Flag shutdown and wake every waiter
    pub fn request_shutdown(&self) {
        if self.closing.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shutdown_tx.lock().take();
        // Waiters check `closing` while holding these locks
        {
            let _guard = self.identity.lock();
            self.identity_ready.notify_all();
        }
        let _guard = self.pending.lock();
        self.drained.notify_all();
    }

    /// Sleep for `duration` unless shutdown is requested first
    ///
    /// Returns `true` if shutdown interrupted the sleep.
    pub fn pause(&self, duration: Duration) -> bool {
        match self.shutdown_rx.recv_timeout(duration) {
            Err(RecvTimeoutError::Timeout) => self.is_closing(),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
        }
    }

    /// Keep the first fatal transport error
    pub fn record_fatal(&self, err: TransportError) {
        let mut fatal = self.fatal.lock();
        if fatal.is_none() {
            *fatal = Some(err);
        }
    }

    pub fn take_fatal(&self) -> Option<TransportError> {
        self.fatal.lock().take()
    }

    // === Identity ===

    pub fn identity(&self) -> Option<DeviceIdentity> {
        self.identity.lock().clone()
    }

    /// Store the identity unless one is already known
    pub fn set_identity_once(&self, identity: DeviceIdentity) -> bool {
        let mut slot = self.identity.lock();
        if slot.is_some() {
            debug!("Identity already known, ignoring repeat response");
            return false;
        }
        info!(
            "Device identity: {} (type {}), firmware {}",
            identity.model.name, identity.model.kind, identity.firmware_version
        );
        *slot = Some(identity);
        self.identity_ready.notify_all();
        true
    }

    /// Block until the identity is known, shutdown begins or `deadline` passes
    pub fn wait_identity(&self, tick: Duration, deadline: Option<Instant>) -> Option<DeviceIdentity> {
        let mut slot = self.identity.lock();
        loop {
            if let Some(identity) = slot.as_ref() {
                return Some(identity.clone());
            }
            if self.is_closing() {
                return None;
            }
            let wait = match deadline {
                Some(deadline) => {
                    let left = deadline.saturating_duration_since(Instant::now());
                    if left.is_zero() {
                        return None;
                    }
                    left.min(tick)
                }
                None => tick,
            };
            self.identity_ready.wait_for(&mut slot, wait);
        }
    }

    // === Mirrors ===

    pub fn light(&self) -> LightState {
        *self.light.lock()
    }

    pub fn set_light(&self, light: LightState) {
        *self.light.lock() = light;
    }

    pub fn turbo(&self) -> bool {
        self.turbo.load(Ordering::SeqCst)
    }

    pub fn rapid_trigger(&self) -> bool {
        self.rapid_trigger.load(Ordering::SeqCst)
    }

    pub fn set_modes(&self, turbo: bool, rapid_trigger: bool) {
        self.turbo.store(turbo, Ordering::SeqCst);
        self.rapid_trigger.store(rapid_trigger, Ordering::SeqCst);
    }

    // === Outbound accounting ===

    pub fn begin_send(&self) {
        *self.pending.lock() += 1;
    }

    pub fn end_send(&self) {
        let mut pending = self.pending.lock();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    /// Wait until every enqueued payload has been written
    ///
    /// Returns `false` on timeout or if shutdown began first.
    pub fn wait_drained(&self, tick: Duration, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.pending.lock();
        loop {
            if *pending == 0 {
                return true;
            }
            if self.is_closing() {
                return false;
            }
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                return false;
            }
            self.drained.wait_for(&mut pending, left.min(tick));
        }
    }

    /// Apply a decoded inbound report
    pub fn apply(&self, response: Response) {
        match response {
            Response::Identity(identity) => {
                let (turbo, rt) = (identity.turbo, identity.rapid_trigger);
                if self.set_identity_once(identity) {
                    self.set_modes(turbo, rt);
                }
            }
            Response::Light(light) => {
                debug!("Light mode: {:?}", light);
                self.set_light(light);
            }
            Response::TurboRt {
                turbo,
                rapid_trigger,
            } => {
                debug!("Turbo={} RT={}", turbo, rapid_trigger);
                self.set_modes(turbo, rapid_trigger);
            }
            Response::KeyModify => debug!("RX {} echo", cmd::name(cmd::MODIFY_KEY)),
            Response::KeyTracking => debug!("RX {}", cmd::name(cmd::KEY_TRACKING)),
            Response::Ignored => {}
            Response::Unknown(other) => warn!("Unknown command {:#04x}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::KeyboardModel;
    use std::sync::Arc;
    use std::thread;

    fn identity(model: KeyboardModel) -> DeviceIdentity {
        DeviceIdentity {
            model,
            firmware_version: "0.01".into(),
            turbo: true,
            rapid_trigger: false,
        }
    }

    #[test]
    fn test_identity_is_set_once() {
        let state = DeviceState::new();
        assert!(state.set_identity_once(identity(KeyboardModel::G65)));
        assert!(!state.set_identity_once(identity(KeyboardModel::G60)));
        assert_eq!(state.identity().unwrap().model, KeyboardModel::G65);
    }

    #[test]
    fn test_apply_identity_sets_modes() {
        let state = DeviceState::new();
        state.apply(Response::Identity(identity(KeyboardModel::A75)));
        assert!(state.turbo());
        assert!(!state.rapid_trigger());
    }

    #[test]
    fn test_wait_identity_unblocks_on_shutdown() {
        let state = Arc::new(DeviceState::new());
        let waiter = {
            let state = Arc::clone(&state);
            thread::spawn(move || state.wait_identity(Duration::from_millis(10), None))
        };
        thread::sleep(Duration::from_millis(30));
        state.request_shutdown();
        assert_eq!(waiter.join().unwrap(), None);
    }

    #[test]
    fn test_wait_identity_deadline() {
        let state = DeviceState::new();
        let started = Instant::now();
        let deadline = Some(started + Duration::from_millis(30));
        assert_eq!(state.wait_identity(Duration::from_millis(10), deadline), None);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_pause_is_interrupted_by_shutdown() {
        let state = DeviceState::new();
        assert!(!state.pause(Duration::from_millis(1)));
        state.request_shutdown();
        let started = Instant::now();
        assert!(state.pause(Duration::from_secs(5)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_first_fatal_error_wins() {
        let state = DeviceState::new();
        state.record_fatal(TransportError::Disconnected);
        state.record_fatal(TransportError::Timeout);
        assert!(matches!(state.take_fatal(), Some(TransportError::Disconnected)));
        assert!(state.take_fatal().is_none());
    }

    #[test]
    fn test_wait_drained() {
        let state = DeviceState::new();
        assert!(state.wait_drained(Duration::from_millis(5), Duration::from_millis(5)));
        state.begin_send();
        assert!(!state.wait_drained(Duration::from_millis(5), Duration::from_millis(20)));
        state.end_send();
        assert!(state.wait_drained(Duration::from_millis(5), Duration::from_millis(20)));
    }
}
