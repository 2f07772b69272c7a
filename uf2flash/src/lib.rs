//! # uf2flash
//!
//! A library for flashing UF2 firmware onto boards whose bootloader
//! presents itself as a USB mass-storage device.
//!
//! Flashing is a three-stage handshake with the board:
//!
//! 1. **Trigger**: open the board's serial port at 1200 baud and deassert
//!    DTR, the convention UF2 bootloaders interpret as "reboot into
//!    bootloader mode".
//! 2. **Resolve**: after the board re-enumerates, locate the bootloader's
//!    mass-storage volume by its fixed label and sentinel file, using the
//!    discovery strategy for the host OS.
//! 3. **Deliver**: copy the firmware image onto the volume as `flash.uf2`
//!    via a temp-file-then-rename so the board never sees a partial image.
//!
//! ## Supported Targets
//!
//! - Adafruit PyPortal (`PORTALBOOT`)
//! - Adafruit Feather M4 Express (`FEATHERBOOT`)
//! - Adafruit Trinket M0 (`TRINKETBOOT`)
//!
//! ## Supported Platforms
//!
//! Linux, macOS, FreeBSD (filesystem globbing) and Windows (WMI queries).
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use uf2flash::{Flasher, Target};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let flasher = Flasher::new()?;
//!
//!     // Auto-discover the serial port, trigger the bootloader, and
//!     // deliver the image once the volume appears.
//!     flasher.flash(None, Target::FeatherM4, Path::new("firmware.uf2"))?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod deliver;
pub mod error;
pub mod flasher;
pub mod host;
pub mod target;
pub mod touch;

// Re-exports for convenience
pub use {
    deliver::FIRMWARE_NAME,
    error::{Error, Result},
    flasher::{Flasher, SETTLE_DELAY},
    host::{Host, PosixHost, SENTINEL_FILE, WindowsHost},
    target::Target,
    touch::TOUCH_BAUD,
};
