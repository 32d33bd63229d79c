//! Keyboard controller
//!
//! Owns the outbound queue, the three I/O threads and the device-state
//! mirrors. Commands are fire-and-forget: the keyboard echoes them, but an
//! echo is never correlated with the command that caused it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam::channel::bounded;
use drunkdeer_transport::{Transport, TransportDeviceInfo};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::KeyboardError;
use crate::keys::PerKeyState;
use crate::layout::{row_len, KEYS_PER_ROW, ROW_COUNT};
use crate::light::{LightState, DEFAULT_COLOR};
use crate::model::DeviceIdentity;
use crate::queue::{outbound_queue, run_writer_loop, OutboundQueue};
use crate::reader::{run_decoder_loop, run_reader_loop};
use crate::report::{self, ModifyKind};
use crate::state::DeviceState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Open,
    Closing,
    Closed,
}

/// High-level handle to one opened keyboard
pub struct Controller {
    transport: Arc<dyn Transport>,
    config: ControllerConfig,
    state: Arc<DeviceState>,
    queue: OutboundQueue,
    keys: Mutex<PerKeyState>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    lifecycle: Mutex<Lifecycle>,
}

impl Controller {
    /// Start a controller with default timing
    pub fn new(transport: Arc<dyn Transport>) -> Result<Self, KeyboardError> {
        Self::with_config(transport, ControllerConfig::default())
    }

    /// Start a controller, spawning the decoder, reader and writer threads
    pub fn with_config(
        transport: Arc<dyn Transport>,
        config: ControllerConfig,
    ) -> Result<Self, KeyboardError> {
        let state = Arc::new(DeviceState::new());
        let (queue, queue_rx) = outbound_queue(config.queue_capacity);
        let (handoff_tx, handoff_rx) = bounded(0);

        let controller = Self {
            transport: Arc::clone(&transport),
            config: config.clone(),
            state: Arc::clone(&state),
            queue,
            keys: Mutex::new(PerKeyState::default()),
            threads: Mutex::new(Vec::with_capacity(3)),
            lifecycle: Mutex::new(Lifecycle::Open),
        };

        {
            let state = Arc::clone(&state);
            let config = config.clone();
            controller.spawn("decoder", move || {
                run_decoder_loop(handoff_rx, state, config)
            })?;
        }
        {
            let transport = Arc::clone(&transport);
            let state = Arc::clone(&state);
            let config = config.clone();
            controller.spawn("reader", move || {
                run_reader_loop(transport, handoff_tx, state, config)
            })?;
        }
        controller.spawn("writer", move || {
            run_writer_loop(transport, queue_rx, state, config)
        })?;

        info!(
            "Controller started for {}",
            controller.transport.device_info().label()
        );
        Ok(controller)
    }

    fn spawn<F>(&self, name: &'static str, f: F) -> Result<(), KeyboardError>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = thread::Builder::new()
            .name(format!("drunkdeer-{name}"))
            .spawn(f)
            .map_err(|source| {
                // Threads already running exit on shutdown
                self.state.request_shutdown();
                KeyboardError::Spawn { name, source }
            })?;
        self.threads.lock().push(handle);
        Ok(())
    }

    // === Accessors ===

    pub fn device_info(&self) -> &TransportDeviceInfo {
        self.transport.device_info()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Identity if a response has already been decoded
    pub fn cached_identity(&self) -> Option<DeviceIdentity> {
        self.state.identity()
    }

    /// Last light mode reported by the device or commanded by the host
    pub fn light(&self) -> LightState {
        self.state.light()
    }

    /// Update the light mirror without sending anything
    pub fn set_light(&self, light: LightState) {
        self.state.set_light(light);
    }

    pub fn turbo(&self) -> bool {
        self.state.turbo()
    }

    pub fn rapid_trigger(&self) -> bool {
        self.state.rapid_trigger()
    }

    pub fn actuations(&self) -> Vec<u8> {
        self.keys.lock().actuations.clone()
    }

    pub fn downstrokes(&self) -> Vec<u8> {
        self.keys.lock().downstrokes.clone()
    }

    pub fn upstrokes(&self) -> Vec<u8> {
        self.keys.lock().upstrokes.clone()
    }

    pub fn is_closed(&self) -> bool {
        *self.lifecycle.lock() != Lifecycle::Open || self.state.is_closing()
    }

    // === Identity ===

    /// Get the device identity, asking the device if it is not yet known
    ///
    /// Blocks until a response is decoded. Returns `None` if the controller
    /// starts closing first.
    pub fn identity(&self) -> Option<DeviceIdentity> {
        self.identity_until(None)
    }

    /// Like [`Self::identity`], giving up after `timeout`
    pub fn identity_timeout(&self, timeout: Duration) -> Option<DeviceIdentity> {
        self.identity_until(Some(Instant::now() + timeout))
    }

    fn identity_until(&self, deadline: Option<Instant>) -> Option<DeviceIdentity> {
        if let Some(identity) = self.state.identity() {
            return Some(identity);
        }
        if let Err(e) = self.send_identity_request() {
            debug!("Identity request not sent: {}", e);
            return None;
        }
        self.state.wait_identity(self.config.poll_tick, deadline)
    }

    // === Raw commands ===

    /// Queue a raw payload (command byte first)
    pub fn enqueue(&self, payload: Vec<u8>) -> Result<(), KeyboardError> {
        self.queue
            .enqueue(payload, &self.state, self.config.poll_tick)
    }

    pub fn send_identity_request(&self) -> Result<(), KeyboardError> {
        self.enqueue(report::build_identity_request().to_vec())
    }

    /// Select a LED mode and record it in the light mirror
    pub fn send_light_mode(&self, light: LightState, color: u8) -> Result<(), KeyboardError> {
        self.state.set_light(light);
        self.enqueue(report::build_light_mode(light, color, false).to_vec())
    }

    /// Same as [`Self::send_light_mode`] with the turbo flag byte set
    pub fn send_light_mode_turbo(&self, light: LightState, color: u8) -> Result<(), KeyboardError> {
        self.state.set_light(light);
        self.enqueue(report::build_light_mode(light, color, true).to_vec())
    }

    pub fn send_rapid_trigger_turbo(
        &self,
        rapid_trigger: bool,
        turbo: bool,
    ) -> Result<(), KeyboardError> {
        self.state.set_modes(turbo, rapid_trigger);
        self.enqueue(report::build_rapid_trigger_turbo(rapid_trigger, turbo).to_vec())
    }

    pub fn send_key_tracking(&self, enabled: bool) -> Result<(), KeyboardError> {
        self.enqueue(report::build_key_tracking(enabled).to_vec())
    }

    // === Per-key settings ===

    fn ensure_open(&self) -> Result<(), KeyboardError> {
        if self.is_closed() {
            return Err(KeyboardError::Closed);
        }
        Ok(())
    }

    fn send_row(&self, kind: ModifyKind, row: u8, values: &[u8]) -> Result<(), KeyboardError> {
        let start = (row as usize * KEYS_PER_ROW).min(values.len());
        let end = (start + row_len(row)).min(values.len());
        self.enqueue(report::build_modify_row_for(kind, row, &values[start..end]).to_vec())
    }

    fn send_rows(&self, kind: ModifyKind, values: &[u8]) -> Result<(), KeyboardError> {
        for row in 0..ROW_COUNT as u8 {
            self.send_row(kind, row, values)?;
        }
        debug!("Queued {} rows of {}", ROW_COUNT, kind.name());
        Ok(())
    }

    fn load(&self, kind: ModifyKind, values: &[u8]) -> Result<(), KeyboardError> {
        self.ensure_open()?;
        self.keys.lock().store(kind, values)?;
        self.send_rows(kind, values)
    }

    /// Store and send per-key actuation points
    ///
    /// `values` must hold one entry per layout slot.
    pub fn load_actuations(&self, values: &[u8]) -> Result<(), KeyboardError> {
        self.load(ModifyKind::Actuation, values)
    }

    /// Store and send per-key rapid trigger downstroke sensitivity
    pub fn load_downstrokes(&self, values: &[u8]) -> Result<(), KeyboardError> {
        self.load(ModifyKind::Downstroke, values)
    }

    /// Store and send per-key rapid trigger upstroke sensitivity
    pub fn load_upstrokes(&self, values: &[u8]) -> Result<(), KeyboardError> {
        self.load(ModifyKind::Upstroke, values)
    }

    /// Set the actuation of named keys in memory; unknown names are skipped
    pub fn modify_actuations_by_names<S: AsRef<str>>(&self, names: &[S], value: u8) -> usize {
        self.keys.lock().set_actuation_by_names(names, value)
    }

    pub fn modify_actuations_by_indexes(&self, indexes: &[usize], value: u8) -> usize {
        self.keys.lock().set_actuation_by_indexes(indexes, value)
    }

    pub fn modify_all_actuations(&self, value: u8) {
        self.keys.lock().set_all_actuations(value);
    }

    /// Send the in-memory actuation array
    pub fn apply_actuations(&self) -> Result<(), KeyboardError> {
        self.ensure_open()?;
        let values = self.actuations();
        self.send_rows(ModifyKind::Actuation, &values)
    }

    /// Reset the keyboard to factory-like settings
    ///
    /// Lights off, rapid trigger and turbo off, default per-key values.
    /// The in-memory mirrors are reset before anything is sent.
    pub fn write_defaults(&self) -> Result<(), KeyboardError> {
        self.ensure_open()?;
        let keys = {
            let mut keys = self.keys.lock();
            *keys = PerKeyState::default();
            keys.clone()
        };

        self.send_light_mode(LightState::off(), DEFAULT_COLOR)?;
        self.send_rapid_trigger_turbo(false, false)?;
        for row in 0..ROW_COUNT as u8 {
            for kind in ModifyKind::ALL {
                self.send_row(kind, row, keys.values(kind))?;
            }
        }
        info!("Queued default settings");
        Ok(())
    }

    // === Lifecycle ===

    /// Wait until every queued payload has been written
    ///
    /// Returns `false` on timeout or if the controller is closing.
    pub fn drain(&self, timeout: Duration) -> bool {
        self.state.wait_drained(self.config.poll_tick, timeout)
    }

    /// Stop the I/O threads and release the queue
    ///
    /// Idempotent. Returns the first fatal transport error if one stopped a
    /// loop, or [`KeyboardError::Timeout`] if a thread did not exit within
    /// the close timeout (resources are released either way).
    pub fn close(&self) -> Result<(), KeyboardError> {
        {
            let mut lifecycle = self.lifecycle.lock();
            if *lifecycle != Lifecycle::Open {
                return Ok(());
            }
            *lifecycle = Lifecycle::Closing;
        }

        debug!("Closing controller");
        self.state.request_shutdown();
        self.queue.release();

        let stuck = self.join_threads();
        *self.lifecycle.lock() = Lifecycle::Closed;

        if let Some(e) = self.state.take_fatal() {
            return Err(e.into());
        }
        if stuck > 0 {
            warn!(
                "{} I/O thread(s) still running after {:?}",
                stuck, self.config.close_timeout
            );
            return Err(KeyboardError::Timeout);
        }
        info!("Controller closed");
        Ok(())
    }

    /// Join the I/O threads, returning how many missed the close timeout
    fn join_threads(&self) -> usize {
        let deadline = Instant::now() + self.config.close_timeout;
        let mut running = std::mem::take(&mut *self.threads.lock());

        loop {
            let (done, rest): (Vec<_>, Vec<_>) =
                running.into_iter().partition(|h| h.is_finished());
            for handle in done {
                if handle.join().is_err() {
                    warn!("I/O thread panicked");
                }
            }
            running = rest;

            if running.is_empty() || Instant::now() >= deadline {
                // Remaining handles are detached
                return running.len();
            }
            thread::sleep(Duration::from_millis(5));
        }
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Error closing controller: {}", e);
        }
    }
}
