//! High-level keyboard interface for DrunkDeer magnetic keyboards
//!
//! This crate turns semantic settings (actuation points, rapid trigger,
//! lighting) into vendor reports, paces them onto a [`Transport`], and
//! decodes what the keyboard sends back into a device-state mirror.
//!
//! [`Transport`]: drunkdeer_transport::Transport

pub mod config;
pub mod decode;
pub mod error;
pub mod keys;
pub mod layout;
pub mod light;
pub mod model;
pub mod report;

mod controller;
mod queue;
mod reader;
mod state;

pub use config::ControllerConfig;
pub use controller::Controller;
pub use decode::{InboundPacket, Response};
pub use error::KeyboardError;
pub use keys::PerKeyState;
pub use layout::{key_index, key_name, KEY_LAYOUT, LAYOUT_LEN};
pub use light::{LightSequence, LightState};
pub use model::{DeviceIdentity, KeyboardModel};
pub use report::{mm_to_byte, ModifyKind};

use drunkdeer_transport::{HidDiscovery, TransportDeviceInfo};

/// List connected keyboards in index order
pub fn list_keyboards() -> Result<Vec<TransportDeviceInfo>, KeyboardError> {
    let discovery = HidDiscovery::new()?;
    Ok(discovery
        .list_devices()
        .into_iter()
        .map(|d| d.info)
        .collect())
}

/// Open the `index`-th connected keyboard with default timing
pub fn open_keyboard(index: usize) -> Result<Controller, KeyboardError> {
    let discovery = HidDiscovery::new()?;
    let transport = discovery.open_index(index)?;
    Controller::new(transport)
}
