//! Cockpit LED Control CLI
//!
//! A command-line interface for the Cockpit keyboard's RGB lighting.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cockpit_keyboard::LedController;
use cockpit_led::config::Config;
use tracing::debug;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers (split from main.rs)
mod commands;
use commands::ConnectError;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // The terminal UI owns the screen; log lines would tear it up
    if !cli.wants_tui() {
        init_tracing(cli.verbose);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(connect) = e.downcast_ref::<ConnectError>() {
                if let Some(hint) = connect.hint() {
                    eprintln!("{hint}");
                }
                eprintln!("Please ensure:");
                for line in commands::CONNECT_HELP {
                    eprintln!("{line}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if verbose {
        // Prefix match: covers cockpit_led, cockpit_keyboard and cockpit_transport
        if let Ok(directive) = "cockpit=debug".parse() {
            filter = filter.add_directive(directive);
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    }
    .with_overrides(&cli.overrides());
    debug!("Using {:?}", config);

    // Commands that don't talk to the keyboard
    match cli.command {
        Some(Commands::List) => return commands::utility::list(&config.device),
        Some(Commands::Effects) => return commands::utility::effects(),
        _ => {}
    }

    if cli.wants_tui() {
        // No keyboard yet is fine here; the UI can reconnect later
        let mut led = LedController::hid(config.device, config.session, None)?;
        let connect_error = led.connect().err();
        if connect_error.is_none() {
            commands::set::apply(&led, &cli.led)?;
        }
        return cockpit_led::tui::run(led, connect_error).context("terminal UI");
    }

    let printer_config =
        commands::create_printer_config(cli.monitor, cli.hex, cli.filter.as_deref())?;
    let led = commands::open_controller(&config, printer_config)?;

    commands::set::apply(&led, &cli.led)?;

    match cli.command {
        Some(Commands::State { json }) => commands::query::state(&led, json)?,
        Some(Commands::Version) => commands::query::version(&led)?,
        Some(Commands::Direction { direction }) => commands::set::direction(&led, direction)?,
        // Default: show the lighting state
        None if cli.led.is_empty() => commands::query::state(&led, false)?,
        _ => {}
    }

    Ok(())
}
