//! uf2flash CLI - flash UF2 firmware onto USB mass-storage bootloaders.
//!
//! The tool touches the board's serial port at 1200 baud to reboot it
//! into bootloader mode, waits for the bootloader volume to mount, and
//! copies the firmware image onto it.

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use console::style;
use env_logger::Env;
use log::debug;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use uf2flash::{Flasher, Target};

/// uf2flash - flash UF2 firmware onto a board's USB bootloader.
///
/// Environment variables:
///   UF2FLASH_PORT    - Serial port used to trigger the bootloader
///   UF2FLASH_TARGET  - Default target board
#[derive(Parser)]
#[command(name = "uf2flash")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "For more information, visit: https://github.com/uf2flash/uf2flash")]
struct Cli {
    /// Serial port used to trigger the bootloader (auto-detected if not specified).
    #[arg(short, long, env = "UF2FLASH_PORT")]
    port: Option<String>,

    /// Target board.
    #[arg(short, long, env = "UF2FLASH_TARGET")]
    target: Board,

    /// UF2 firmware image to flash.
    image: PathBuf,

    /// Seconds to wait for the board to re-enumerate after the trigger.
    #[arg(long, default_value = "3", value_name = "SECS")]
    settle: u64,

    /// Verbose output level (-v, -vv for increasing detail).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode (suppress non-essential output).
    #[arg(short, long)]
    quiet: bool,
}

/// Supported target boards.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Board {
    /// Adafruit PyPortal.
    Pyportal,
    /// Adafruit Feather M4 Express.
    FeatherM4,
    /// Adafruit Trinket M0.
    TrinketM0,
}

impl From<Board> for Target {
    fn from(board: Board) -> Self {
        match board {
            Board::Pyportal => Target::Pyportal,
            Board::FeatherM4 => Target::FeatherM4,
            Board::TrinketM0 => Target::TrinketM0,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // NO_COLOR and TTY detection (clig.dev best practice)
    if env::var("NO_COLOR").is_ok() || !console::Term::stderr().is_term() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    // Setup logging based on verbosity
    let log_level = if cli.quiet {
        "warn"
    } else {
        match cli.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level))
        .format_target(cli.verbose >= 2)
        .format_timestamp(None)
        .init();

    debug!(
        "uf2flash v{} (verbose level: {})",
        env!("CARGO_PKG_VERSION"),
        cli.verbose
    );

    if !cli.image.is_file() {
        bail!("firmware image not found: {}", cli.image.display());
    }

    let target: Target = cli.target.into();
    let flasher = Flasher::new()?.with_settle_delay(Duration::from_secs(cli.settle));

    if !cli.quiet {
        eprintln!(
            "{} flashing {} onto {} (volume {})",
            style("⚡").cyan(),
            cli.image.display(),
            target,
            target.volume_label()
        );
        match &cli.port {
            Some(port) => eprintln!("{} using port {port}", style("🔌").cyan()),
            None => eprintln!("{} auto-detecting serial port", style("🔌").cyan()),
        }
    }

    flasher.flash(cli.port.as_deref(), target, &cli.image)?;

    if !cli.quiet {
        eprintln!(
            "\n{} {} written to the {} volume",
            style("🎉").green().bold(),
            uf2flash::FIRMWARE_NAME,
            target.volume_label()
        );
    }

    Ok(())
}
