//! Set (write) command handlers.
//!
//! Device failures are printed and swallowed: a rejected setting is not
//! a reason to abort the remaining ones.

use super::{describe_set_reply, CommandResult};
use cockpit_keyboard::{Hsv, KeyboardError, LedController, RgbEffect};
use cockpit_transport::command::invert_speed;

use crate::cli::{Direction, LedArgs};

/// Print the outcome; `stored` is what the firmware keeps on success
fn report(what: &str, stored: &[u8], result: Result<Vec<u8>, KeyboardError>) {
    match result {
        Ok(resp) => match describe_set_reply(&resp, stored) {
            Some(reply) => println!("{what} (keyboard: {reply})"),
            None => println!("{what}"),
        },
        Err(e) => eprintln!("Failed: {what}: {e}"),
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

pub fn skadis(led: &LedController, enabled: bool) -> CommandResult {
    report(
        &format!("Skadis mode {}", on_off(enabled)),
        &[enabled as u8],
        led.set_skadis_mode(enabled),
    );
    Ok(())
}

pub fn white(led: &LedController, enabled: bool) -> CommandResult {
    report(
        &format!("White mode {}", on_off(enabled)),
        &[enabled as u8],
        led.set_white_mode(enabled),
    );
    Ok(())
}

pub fn effect(led: &LedController, effect: RgbEffect) -> CommandResult {
    report(
        &format!("Effect set to {} ({})", effect, effect.as_u8()),
        &[effect.as_u8()],
        led.set_rgb_effect(effect),
    );
    Ok(())
}

pub fn color(led: &LedController, color: Hsv) -> CommandResult {
    println!("Setting color to {color}");
    report(
        "Color set",
        &[color.h, color.s, color.v],
        led.set_color(color),
    );
    Ok(())
}

pub fn animation_speed(led: &LedController, speed: u8) -> CommandResult {
    report(
        &format!("Animation speed set to {speed}"),
        &[invert_speed(speed)],
        led.set_animation_speed(speed),
    );
    Ok(())
}

pub fn direction(led: &LedController, direction: Direction) -> CommandResult {
    let reverse = direction == Direction::Rev;
    report(
        &format!("Animation stepped {}", if reverse { "back" } else { "forward" }),
        &[reverse as u8],
        led.set_direction(reverse),
    );
    Ok(())
}

/// Apply one-shot flags: skadis, white, effect, color, then speed
pub fn apply(led: &LedController, args: &LedArgs) -> CommandResult {
    if let Some(t) = args.skadis {
        skadis(led, t.into())?;
    }
    if let Some(t) = args.white {
        white(led, t.into())?;
    }
    if let Some(e) = args.effect {
        effect(led, e)?;
    }
    if let Some(c) = args.color {
        color(led, c)?;
    }
    if let Some(s) = args.animation_speed {
        animation_speed(led, s)?;
    }
    Ok(())
}
