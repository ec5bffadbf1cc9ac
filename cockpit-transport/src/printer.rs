//! PrinterTransport middleware for monitoring transport operations
//!
//! Wraps any Transport implementation and prints every report passing
//! through it to stderr, decoded where the command is known.
//!
//! # Example
//!
//! ```ignore
//! use cockpit_transport::{PrinterTransport, PrinterConfig};
//!
//! let monitored = PrinterTransport::wrap(transport, PrinterConfig::default());
//! // Now all commands/responses will be printed
//! ```

use std::str::FromStr;
use std::sync::Arc;

use crossterm::style::Stylize;

use crate::protocol::cmd;
use crate::{
    try_parse_command, try_parse_response, ParsedCommand, ParsedResponse, Transport,
    TransportDeviceInfo, TransportError,
};

/// Packet filter for selective display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PacketFilter {
    #[default]
    All,
    Commands,
    Responses,
    Cmd(u8),
}

impl FromStr for PacketFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "commands" | "cmd" | "cmds" => Ok(Self::Commands),
            "responses" | "resp" | "rsp" => Ok(Self::Responses),
            s if s.starts_with("cmd=") || s.starts_with("0x") => {
                let hex_str = s.strip_prefix("cmd=").unwrap_or(s);
                let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
                u8::from_str_radix(hex_str, 16)
                    .map(Self::Cmd)
                    .map_err(|e| format!("Invalid command byte: {}", e))
            }
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Show raw hex dump alongside decoded output
    pub show_hex: bool,
    /// Filter for selective display
    pub filter: PacketFilter,
}

impl PrinterConfig {
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    pub fn with_filter(mut self, filter: PacketFilter) -> Self {
        self.filter = filter;
        self
    }

    fn shows_command(&self, command: u8) -> bool {
        match self.filter {
            PacketFilter::All | PacketFilter::Commands => true,
            PacketFilter::Responses => false,
            PacketFilter::Cmd(c) => c == command,
        }
    }

    fn shows_response(&self, echo: Option<u8>) -> bool {
        match self.filter {
            PacketFilter::All | PacketFilter::Responses => true,
            PacketFilter::Commands => false,
            PacketFilter::Cmd(c) => echo == Some(c),
        }
    }
}

/// Transport middleware that prints all commands and responses
pub struct PrinterTransport {
    inner: Arc<dyn Transport>,
    config: PrinterConfig,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: Arc<dyn Transport>, config: PrinterConfig) -> Arc<dyn Transport> {
        Arc::new(Self {
            inner: transport,
            config,
        })
    }

    /// Print a report being written (report ID at byte 0)
    fn print_command(&self, report: &[u8]) {
        let Some(packet) = report.get(1..) else {
            return;
        };
        let Some(&command) = packet.first() else {
            return;
        };
        if !self.config.shows_command(command) {
            return;
        }

        match try_parse_command(packet) {
            ParsedCommand::Unknown { cmd, data } => {
                eprintln!(
                    "{} {}  0x{:02x} {} {:02x?}",
                    ">>>".cyan(),
                    "CMD".cyan().bold(),
                    cmd,
                    cmd::name(cmd).yellow(),
                    data
                );
            }
            parsed => {
                eprintln!("{} {}  {:?}", ">>>".cyan(), "CMD".cyan().bold(), parsed);
            }
        }

        if self.config.show_hex {
            eprintln!("    {}  {:02x?}", "HEX".dim(), report);
        }
    }

    /// Print a report that was read back
    fn print_response(&self, data: &[u8]) {
        if !self.config.shows_response(data.first().copied()) {
            return;
        }

        match try_parse_response(data) {
            ParsedResponse::Empty => {
                eprintln!("{} {}  {}", "<<<".green(), "RSP".green().bold(), "(none)".dim());
            }
            ParsedResponse::Unknown { cmd, data: raw } => {
                eprintln!(
                    "{} {}  0x{:02x} {} {} {:02x?}",
                    "<<<".green(),
                    "RSP".green().bold(),
                    cmd,
                    cmd::name(cmd).yellow(),
                    "UNKNOWN".red().bold(),
                    raw
                );
            }
            parsed => {
                eprintln!("{} {}  {:?}", "<<<".green(), "RSP".green().bold(), parsed);
            }
        }

        if self.config.show_hex && !data.is_empty() {
            eprintln!("    {}  {:02x?}", "HEX".dim(), data);
        }
    }
}

impl Transport for PrinterTransport {
    fn write_report(&self, report: &[u8]) -> Result<usize, TransportError> {
        self.print_command(report);
        self.inner.write_report(report)
    }

    fn read_report(&self, len: usize, timeout_ms: i32) -> Result<Vec<u8>, TransportError> {
        let result = self.inner.read_report(len, timeout_ms)?;
        self.print_response(&result);
        Ok(result)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }
}
