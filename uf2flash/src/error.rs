//! Error types for uf2flash.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for uf2flash operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for uf2flash operations.
#[derive(Debug, Error)]
pub enum Error {
    /// No serial port matched the platform's default discovery rule.
    #[error("unable to locate a serial port")]
    NoPortFound,

    /// No device discovery rule exists for the current operating system.
    #[error("no device discovery rule for operating system: {os}")]
    UnsupportedPlatform {
        /// Operating system name as reported by the standard library.
        os: String,
    },

    /// The platform's serial-port enumeration query itself failed.
    #[error("serial port query failed: {0}")]
    PlatformQueryFailed(String),

    /// The 1200-baud touch could not be completed.
    #[error("failed to trigger bootloader on {port}")]
    TriggerFailed {
        /// Serial port the trigger was attempted on.
        port: String,
        /// Last error observed while opening the port.
        #[source]
        source: serialport::Error,
    },

    /// No mounted volume carried the expected bootloader label.
    #[error("unable to locate UF2 volume: {label}")]
    VolumeNotFound {
        /// Volume label that was searched for.
        label: String,
    },

    /// The volume discovery mechanism itself failed, or matched ambiguously.
    #[error("volume discovery failed: {0}")]
    DiscoveryFailed(String),

    /// The firmware image could not be opened for reading.
    #[error("failed to read firmware image {}", .path.display())]
    SourceUnreadable {
        /// Path of the source image.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing the firmware onto the volume failed.
    #[error("failed to write firmware to {}", .path.display())]
    DestinationWriteFailed {
        /// Path being written when the failure occurred.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The final rename that makes the firmware visible failed.
    #[error("failed to move firmware into place at {}", .path.display())]
    RenameFailed {
        /// Final firmware path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A stage of the flash sequence failed.
    #[error("failed to flash {}", .image.display())]
    Flash {
        /// Firmware image the flash attempt was delivering.
        image: PathBuf,
        /// Error from the failing stage.
        #[source]
        source: Box<Error>,
    },
}
