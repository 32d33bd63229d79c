//! Integration tests against a connected keyboard.
//!
//! These tests require a real keyboard to be connected.
//! Run with: cargo test -p drunkdeer-keyboard --test device_queries -- --ignored --nocapture

use std::time::Duration;

use drunkdeer_keyboard::{list_keyboards, open_keyboard};

#[test]
#[ignore] // requires hardware
fn identity_resolves() {
    let kb = open_keyboard(0).expect("No keyboard found - plug in a supported device");

    let identity = kb
        .identity_timeout(Duration::from_secs(5))
        .expect("identity response within 5s");
    println!(
        "{} (type {}) firmware v{}",
        identity.model_name(),
        identity.model_type(),
        identity.firmware_version
    );
    assert!(!identity.firmware_version.is_empty());

    kb.close().expect("clean close");
}

#[test]
#[ignore] // requires hardware
fn list_matches_open() {
    let devices = list_keyboards().expect("HID enumeration");
    assert!(!devices.is_empty(), "no supported keyboard connected");
    for (i, info) in devices.iter().enumerate() {
        println!("{i}: {} {}", info.label(), info.device_path);
    }
}
