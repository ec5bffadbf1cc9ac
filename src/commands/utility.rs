//! Utility command handlers.

use super::CommandResult;
use cockpit_keyboard::RgbEffect;
use cockpit_transport::{DeviceDiscovery, DeviceIdentity, HidDiscovery};

/// List every HID interface under the configured VID/PID
pub fn list(identity: &DeviceIdentity) -> CommandResult {
    let discovery = HidDiscovery::new()?;
    let devices = discovery.list_devices(identity.vendor_id, identity.product_id)?;

    if devices.is_empty() {
        println!(
            "No HID interfaces for {:04X}:{:04X}",
            identity.vendor_id, identity.product_id
        );
        return Ok(());
    }

    println!("HID interfaces for {}:", identity);
    for device in &devices {
        let info = &device.info;
        let marker = if device.is_command_interface(identity) {
            " <- command interface"
        } else {
            ""
        };
        println!(
            "  {} page={:04x} usage={:04x} if={} path={}{}",
            info.display_name(),
            info.usage_page,
            info.usage,
            info.interface_number,
            info.device_path,
            marker,
        );
    }
    Ok(())
}

/// List the effects the firmware knows
pub fn effects() -> CommandResult {
    for effect in RgbEffect::ALL {
        println!("  {:2}  {}", effect.as_u8(), effect);
    }
    Ok(())
}
