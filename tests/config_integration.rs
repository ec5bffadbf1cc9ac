//! Config file loading and the config -> session -> packet path.

use std::path::PathBuf;
use std::sync::Arc;

use cockpit_keyboard::LedController;
use cockpit_led::config::{Config, ConfigError, Overrides};
use cockpit_transport::mock::{mock_interface, MockDiscovery, MockTransport};
use cockpit_transport::DeviceSession;

/// Write `content` to a per-test file under the system temp dir
fn write_config(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("cockpit-led-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn load_full_config_file() {
    let path = write_config(
        "full.toml",
        r#"
[device]
vendor_id = 0x1209
product_id = 0xC0C0
usage_page = 0xFF60
usage = 0x61

[session]
read_timeout_ms = 250
await_response = false
"#,
    );

    let config = Config::load(&path).unwrap();
    assert_eq!(config.device.vendor_id, 0x1209);
    assert_eq!(config.device.product_id, 0xC0C0);
    assert_eq!(config.session.read_timeout_ms, 250);
    assert!(!config.session.await_response);
}

#[test]
fn missing_file_is_read_error() {
    let path = std::env::temp_dir().join("cockpit-led-test-does-not-exist.toml");
    assert!(matches!(
        Config::load(&path),
        Err(ConfigError::Read { .. })
    ));
}

#[test]
fn malformed_file_is_parse_error() {
    let path = write_config("bad.toml", "[session\nread_timeout_ms = ");
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("bad.toml"));
}

#[test]
fn negative_timeout_is_parse_error() {
    // hidapi treats a negative timeout as "block forever"
    let path = write_config("negative.toml", "[session]\nread_timeout_ms = -1\n");
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn configured_identity_and_timeout_reach_the_wire() {
    let path = write_config(
        "custom.toml",
        "[device]\nvendor_id = 0x4648\nproduct_id = 0x0001\n\n[session]\nread_timeout_ms = 400\n",
    );
    let config = Config::load(&path).unwrap().with_overrides(&Overrides {
        read_timeout_ms: Some(75),
        ..Overrides::default()
    });

    let transport = Arc::new(MockTransport::new());
    let mock = MockDiscovery::with_devices(
        vec![
            mock_interface(0x0001, 0x0006, 0),
            mock_interface(0xFF60, 0x61, 1),
        ],
        Some(Arc::clone(&transport)),
    );
    let mut led = LedController::new(DeviceSession::new(
        Box::new(mock),
        config.device,
        config.session,
    ));
    led.connect().unwrap();

    led.set_rgb_color(128, 255, 200).unwrap();
    assert_eq!(
        &transport.last_write().unwrap()[..6],
        &[0x00, 0x04, 128, 255, 200, 0]
    );
    assert_eq!(transport.last_read_timeout(), Some(75));
}

#[test]
fn wrong_vendor_id_finds_nothing() {
    let config = Config::default().with_overrides(&Overrides {
        vendor_id: Some(0xDEAD),
        ..Overrides::default()
    });

    let transport = Arc::new(MockTransport::new());
    let mock = MockDiscovery::with_raw_interface(Arc::clone(&transport));
    let mut led = LedController::new(DeviceSession::new(
        Box::new(mock),
        config.device,
        config.session,
    ));

    assert!(led.connect().is_err());
    assert!(led.set_skadis_mode(true).unwrap_err().is_not_connected());
    assert!(transport.writes().is_empty());
}
