//! Platform-specific device discovery.
//!
//! Finding the default serial port and locating a mounted bootloader
//! volume both depend on how the host OS names devices and mount points.
//! Instead of branching on the OS at every call site, a [`Host`] strategy
//! is selected once via [`detect`]:
//!
//! - POSIX-like systems ([`PosixHost`]) glob fixed device-node and
//!   mount-root patterns.
//! - Windows ([`WindowsHost`]) shells out to `wmic` and parses its
//!   tabular output.
//!
//! All strategies compile on every platform so their matching logic stays
//! unit-testable anywhere.

mod posix;
mod windows;

pub use posix::PosixHost;
pub use windows::WindowsHost;

use crate::error::{Error, Result};
use std::path::PathBuf;

/// File every UF2 bootloader volume exposes at its root, used to
/// positively identify the volume.
pub const SENTINEL_FILE: &str = "INFO_UF2.TXT";

/// Platform discovery strategy.
pub trait Host {
    /// Locate the default serial port for this platform.
    ///
    /// Returns the first device matching the platform's USB serial-port
    /// naming convention.
    fn default_port(&self) -> Result<String>;

    /// Locate the mount path of the bootloader volume labeled `label`.
    ///
    /// Exactly one mounted volume may match; zero matches is
    /// [`Error::VolumeNotFound`] and more than one is ambiguous and
    /// rejected rather than guessed.
    fn find_volume(&self, label: &str) -> Result<PathBuf>;
}

/// Select the discovery strategy for the current operating system.
pub fn detect() -> Result<Box<dyn Host>> {
    match std::env::consts::OS {
        "linux" => Ok(Box::new(PosixHost::linux())),
        "macos" => Ok(Box::new(PosixHost::macos())),
        "freebsd" => Ok(Box::new(PosixHost::freebsd())),
        "windows" => Ok(Box::new(WindowsHost)),
        os => Err(Error::UnsupportedPlatform { os: os.to_string() }),
    }
}
