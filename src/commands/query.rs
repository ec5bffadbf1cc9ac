//! Query (read-only) command handlers.

use super::CommandResult;
use cockpit_keyboard::LedController;

/// Print the current lighting state
pub fn state(led: &LedController, json: bool) -> CommandResult {
    match led.get_state() {
        Ok(state) if json => println!("{}", serde_json::to_string_pretty(&state)?),
        Ok(state) => {
            if let Some(info) = led.device_info() {
                println!("Device: {} ({})", info.display_name(), info.device_path);
            }
            println!("{state}");
        }
        Err(e) => eprintln!("Failed to read state: {e}"),
    }
    Ok(())
}

/// Print the firmware version
pub fn version(led: &LedController) -> CommandResult {
    match led.get_version() {
        Ok(v) => println!("Firmware: {v}"),
        Err(e) => eprintln!("Failed to read version: {e}"),
    }
    Ok(())
}
