// CLI definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use cockpit_keyboard::{Hsv, RgbEffect};
use cockpit_led::config::Overrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cockpit-led")]
#[command(author, version, about = "Control the Cockpit keyboard's LEDs")]
pub struct Cli {
    /// USB vendor ID (hex)
    #[arg(long, global = true, value_name = "VID", value_parser = parse_hex_u16)]
    pub vid: Option<u16>,

    /// USB product ID (hex)
    #[arg(long, global = true, value_name = "PID", value_parser = parse_hex_u16)]
    pub pid: Option<u16>,

    /// Config file (default: $XDG_CONFIG_HOME/cockpit/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable transport monitoring (prints all commands/responses)
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show raw hex dump alongside decoded output
    #[arg(long, global = true)]
    pub hex: bool,

    /// Filter monitor output (all, commands, responses, cmd=0xNN)
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Don't wait for the keyboard's reply after each command
    #[arg(long, global = true)]
    pub no_wait: bool,

    /// Reply timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout: Option<u16>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub led: LedArgs,

    /// Start interactive UI mode
    #[arg(short, long)]
    pub interactive: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// One-shot settings, applied in the order listed
#[derive(Args, Debug, Default, Clone, Copy)]
pub struct LedArgs {
    /// Set Skadis mode
    #[arg(short, long, value_name = "on|off")]
    pub skadis: Option<Toggle>,

    /// Set white mode
    #[arg(short, long, value_name = "on|off")]
    pub white: Option<Toggle>,

    /// Set RGB effect (0-10 or name)
    #[arg(short, long, value_name = "EFFECT")]
    pub effect: Option<RgbEffect>,

    /// Set RGB color (0-255,0-255,0-255)
    #[arg(short, long, value_name = "H,S,V")]
    pub color: Option<Hsv>,

    /// Set animation speed (0-255)
    #[arg(short, long, value_name = "SPEED")]
    pub animation_speed: Option<u8>,
}

impl LedArgs {
    pub fn is_empty(&self) -> bool {
        self.skadis.is_none()
            && self.white.is_none()
            && self.effect.is_none()
            && self.color.is_none()
            && self.animation_speed.is_none()
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the keyboard's HID interfaces
    #[command(visible_alias = "ls")]
    List,

    /// Show the current lighting state
    #[command(visible_alias = "st")]
    State {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the firmware version
    #[command(visible_alias = "ver")]
    Version,

    /// List the built-in RGB effects
    Effects,

    /// Step the running animation forward or backward
    #[command(visible_alias = "dir")]
    Direction {
        #[arg(value_enum)]
        direction: Direction,
    },

    /// Interactive terminal UI (same as -i)
    Tui,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    #[value(alias = "1")]
    On,
    #[value(alias = "0")]
    Off,
}

impl From<Toggle> for bool {
    fn from(t: Toggle) -> bool {
        t == Toggle::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    #[value(alias = "forward")]
    Fwd,
    #[value(alias = "reverse")]
    Rev,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            vendor_id: self.vid,
            product_id: self.pid,
            read_timeout_ms: self.timeout,
            no_wait: self.no_wait,
        }
    }

    pub fn wants_tui(&self) -> bool {
        self.interactive || matches!(self.command, Some(Commands::Tui))
    }
}

/// Parse "4648", "0x4648" or "0X4648"
fn parse_hex_u16(s: &str) -> Result<u16, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16).map_err(|e| format!("invalid hex ID '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_legacy_flags() {
        let cli = Cli::try_parse_from([
            "cockpit-led", "-s", "on", "-w", "off", "-e", "rainbow-swirl", "-c", "128,255,200",
            "-a", "64",
        ])
        .unwrap();
        assert_eq!(cli.led.skadis, Some(Toggle::On));
        assert_eq!(cli.led.white, Some(Toggle::Off));
        assert_eq!(cli.led.effect, Some(RgbEffect::RainbowSwirl));
        assert_eq!(cli.led.color, Some(Hsv::new(128, 255, 200)));
        assert_eq!(cli.led.animation_speed, Some(64));
        assert!(cli.command.is_none());
        assert!(!cli.wants_tui());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Cli::try_parse_from(["cockpit-led", "-e", "11"]).is_err());
        assert!(Cli::try_parse_from(["cockpit-led", "-c", "1,2"]).is_err());
        assert!(Cli::try_parse_from(["cockpit-led", "-a", "256"]).is_err());
        assert!(Cli::try_parse_from(["cockpit-led", "-s", "maybe"]).is_err());
        assert!(Cli::try_parse_from(["cockpit-led", "--timeout", "-1"]).is_err());
        assert!(Cli::try_parse_from(["cockpit-led", "--timeout", "70000"]).is_err());
    }

    #[test]
    fn test_no_args_is_empty() {
        let cli = Cli::try_parse_from(["cockpit-led"]).unwrap();
        assert!(cli.led.is_empty());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "cockpit-led", "state", "--vid", "0x1234", "--pid", "abcd", "--timeout", "200",
            "--no-wait",
        ])
        .unwrap();
        let o = cli.overrides();
        assert_eq!(o.vendor_id, Some(0x1234));
        assert_eq!(o.product_id, Some(0xABCD));
        assert_eq!(o.read_timeout_ms, Some(200));
        assert!(o.no_wait);
    }

    #[test]
    fn test_interactive_and_tui() {
        assert!(Cli::try_parse_from(["cockpit-led", "-i"]).unwrap().wants_tui());
        assert!(Cli::try_parse_from(["cockpit-led", "tui"]).unwrap().wants_tui());
    }

    #[test]
    fn test_direction() {
        let cli = Cli::try_parse_from(["cockpit-led", "direction", "reverse"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Direction {
                direction: Direction::Rev
            })
        ));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_u16("4648"), Ok(0x4648));
        assert_eq!(parse_hex_u16("0XFF60"), Ok(0xFF60));
        assert!(parse_hex_u16("zz").is_err());
        assert!(parse_hex_u16("10000").is_err());
    }
}
