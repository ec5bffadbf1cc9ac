//! Packet-level tests for the lighting controller.
//!
//! Most tests run against the in-memory transport. The hardware test at the
//! bottom needs a keyboard plugged in:
//! cargo test -p cockpit-keyboard --test led_commands -- --ignored --nocapture

use std::sync::Arc;

use cockpit_keyboard::{Hsv, KeyboardError, LedController, RgbEffect};
use cockpit_transport::mock::{MockDiscovery, MockTransport};
use cockpit_transport::{DeviceIdentity, DeviceSession, SessionConfig, TransportError};

fn connected(transport: &Arc<MockTransport>) -> LedController {
    let mock = MockDiscovery::with_raw_interface(Arc::clone(transport));
    let session = DeviceSession::new(
        Box::new(mock),
        DeviceIdentity::default(),
        SessionConfig::default(),
    );
    let mut led = LedController::new(session);
    led.connect().expect("mock keyboard should connect");
    led
}

/// Expected 33-byte report: report ID 0, opcode, args, zero padding
fn report(cmd: u8, args: &[u8]) -> Vec<u8> {
    let mut buf = vec![0u8; 33];
    buf[1] = cmd;
    buf[2..2 + args.len()].copy_from_slice(args);
    buf
}

#[test]
fn set_color_matches_wire_layout() {
    let transport = Arc::new(MockTransport::new());
    let led = connected(&transport);

    led.set_rgb_color(128, 255, 200).unwrap();

    let mut expected = vec![0x00, 0x04, 128, 255, 200];
    expected.resize(33, 0);
    assert_eq!(transport.last_write().unwrap(), expected);
}

#[test]
fn every_intent_encodes_its_opcode() {
    let transport = Arc::new(MockTransport::new());
    let led = connected(&transport);

    led.set_skadis_mode(true).unwrap();
    led.set_skadis_mode(false).unwrap();
    led.set_white_mode(true).unwrap();
    led.set_rgb_effect(RgbEffect::Snake).unwrap();
    led.set_rgb_effect_index(10).unwrap();
    led.set_color(Hsv::new(1, 2, 3)).unwrap();
    led.set_animation_speed(255).unwrap();
    led.set_animation_speed(0).unwrap();
    led.set_direction(true).unwrap();

    assert_eq!(
        transport.writes(),
        vec![
            report(0x01, &[1]),
            report(0x01, &[0]),
            report(0x02, &[1]),
            report(0x03, &[4]),
            report(0x03, &[10]),
            report(0x04, &[1, 2, 3]),
            report(0x05, &[255]),
            report(0x05, &[0]),
            report(0x06, &[1]),
        ]
    );
    assert_eq!(transport.read_calls(), 9);
}

#[test]
fn setter_returns_raw_reply() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(vec![0x03, 2]);
    let led = connected(&transport);

    let resp = led.set_rgb_effect(RgbEffect::RainbowMood).unwrap();
    assert_eq!(resp, vec![0x03, 2]);

    // Nothing queued: timeout is not an error
    let resp = led.set_rgb_effect(RgbEffect::Static).unwrap();
    assert!(resp.is_empty());
}

#[test]
fn unconnected_controller_sends_nothing() {
    let transport = Arc::new(MockTransport::new());
    let mock = MockDiscovery::with_raw_interface(Arc::clone(&transport));
    let led = LedController::new(DeviceSession::new(
        Box::new(mock),
        DeviceIdentity::default(),
        SessionConfig::default(),
    ));

    let err = led.set_skadis_mode(true).unwrap_err();
    assert!(err.is_not_connected());
    assert!(led.get_state().unwrap_err().is_not_connected());
    assert!(transport.writes().is_empty());
}

#[test]
fn missing_keyboard_fails_to_connect() {
    let mut led = LedController::new(DeviceSession::new(
        Box::new(MockDiscovery::empty()),
        DeviceIdentity::default(),
        SessionConfig::default(),
    ));

    let err = led.connect().unwrap_err();
    assert!(matches!(
        err,
        KeyboardError::Transport(TransportError::DeviceNotFound(_))
    ));
    assert!(!led.is_connected());
}

#[test]
fn get_state_decodes_reply() {
    let transport = Arc::new(MockTransport::new());
    // mode 3, hsv (10,20,30), firmware speed 55 -> host 200, skadis on, white off
    transport.push_response(vec![0x0F, 3, 10, 20, 30, 55, 1, 0]);
    let led = connected(&transport);

    let state = led.get_state().unwrap();
    assert_eq!(state.effect(), Some(RgbEffect::RainbowSwirl));
    assert_eq!(state.color, Hsv::new(10, 20, 30));
    assert_eq!(state.speed, 200);
    assert!(state.skadis_mode);
    assert!(!state.white_mode);
    assert_eq!(transport.last_write().unwrap(), report(0x0F, &[]));
}

#[test]
fn get_version_decodes_reply() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(vec![0x0E, 1, 4, 2]);
    let led = connected(&transport);

    assert_eq!(led.get_version().unwrap().to_string(), "v1.4.2");
}

#[test]
fn query_without_reply_is_unexpected() {
    let transport = Arc::new(MockTransport::new());
    let led = connected(&transport);

    assert!(matches!(
        led.get_version(),
        Err(KeyboardError::UnexpectedResponse(_))
    ));
}

#[test]
fn query_with_only_stale_reply_is_unexpected() {
    let transport = Arc::new(MockTransport::new());
    transport.push_response(vec![0x04, 1, 2, 3, 4, 5, 6, 7]);
    let led = connected(&transport);

    assert!(matches!(
        led.get_state(),
        Err(KeyboardError::UnexpectedResponse(_))
    ));
}

#[test]
fn queries_read_even_when_fire_and_forget() {
    let transport = Arc::new(MockTransport::new());
    let mut led = connected(&transport);
    led.session_mut().set_config(SessionConfig {
        await_response: false,
        ..SessionConfig::default()
    });

    led.set_white_mode(true).unwrap();
    assert_eq!(transport.read_calls(), 0);

    transport.push_response(vec![0x0E, 0, 1, 0]);
    assert_eq!(led.get_version().unwrap().to_string(), "v0.1.0");
    assert_eq!(transport.read_calls(), 1);
}

#[test]
fn query_after_fire_and_forget_skips_setter_reply() {
    let transport = Arc::new(MockTransport::new());
    let mut led = connected(&transport);
    led.session_mut().set_config(SessionConfig {
        await_response: false,
        ..SessionConfig::default()
    });

    // The firmware answers the setter even though nobody reads it
    transport.push_response(vec![0x01, 1]);
    led.set_skadis_mode(true).unwrap();

    transport.push_response(vec![0x0E, 1, 2, 3]);
    assert_eq!(led.get_version().unwrap().to_string(), "v1.2.3");
}

#[test]
fn late_reply_does_not_poison_next_query() {
    let transport = Arc::new(MockTransport::new());
    let led = connected(&transport);

    // Reply to a color set that arrived after its read timed out
    transport.push_response(vec![0x04, 10, 20, 30]);
    transport.push_response(vec![0x0F, 0, 10, 20, 30, 127, 1, 0]);
    let state = led.get_state().unwrap();
    assert_eq!(state.color, Hsv::new(10, 20, 30));
    assert!(state.skadis_mode);
}

#[test]
fn write_failure_keeps_controller_usable() {
    let transport = Arc::new(MockTransport::failing_writes());
    let led = connected(&transport);

    assert!(matches!(
        led.set_animation_speed(10),
        Err(KeyboardError::Transport(TransportError::HidError(_)))
    ));
    assert!(led.is_connected());
}

#[test]
#[ignore] // requires hardware
fn hardware_state_round_trip() {
    let mut led = LedController::hid(DeviceIdentity::default(), SessionConfig::default(), None)
        .expect("hidapi init");
    let info = led.connect().expect("No keyboard found - plug in a Cockpit keyboard");
    println!("Connected: {} ({})", info.display_name(), info.device_path);

    let before = led.get_state().expect("GET_STATE");
    println!("{before}");

    led.set_color(before.color).unwrap();
    let after = led.get_state().expect("GET_STATE");
    assert_eq!(after.color, before.color);
}
