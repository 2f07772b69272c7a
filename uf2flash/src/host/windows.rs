//! Device discovery on Windows via `wmic` queries.
//!
//! Windows has no conventional mount root to glob, so both the serial
//! port and the bootloader volume are found by querying WMI through the
//! `wmic` command-line tool and parsing its tabular text output.

use crate::error::{Error, Result};
use crate::host::{Host, SENTINEL_FILE};
use log::debug;
use std::path::PathBuf;
use std::process::Command;

/// Literal output `wmic` prints when a query matches no devices.
const NO_INSTANCES: &str = "No Instance(s) Available.";

/// `Win32_LogicalDisk` drive type code for removable disks.
const DRIVE_TYPE_REMOVABLE: &str = "2";

/// Discovery strategy for Windows.
pub struct WindowsHost;

impl Host for WindowsHost {
    fn default_port(&self) -> Result<String> {
        let output = Command::new("wmic")
            .args([
                "PATH",
                "Win32_SerialPort",
                "WHERE",
                "Caption LIKE 'USB % (COM%)'",
                "GET",
                "DeviceID",
            ])
            .output()
            .map_err(|e| Error::PlatformQueryFailed(format!("wmic: {e}")))?;

        if !output.status.success() {
            return Err(Error::PlatformQueryFailed(format!(
                "wmic exited with {}",
                output.status
            )));
        }

        parse_serial_query(&String::from_utf8_lossy(&output.stdout))
    }

    fn find_volume(&self, label: &str) -> Result<PathBuf> {
        let where_clause = format!("VolumeName = '{label}'");
        let output = Command::new("wmic")
            .args([
                "PATH",
                "Win32_LogicalDisk",
                "WHERE",
                &where_clause,
                "get",
                "DeviceID,VolumeName,FileSystem,DriveType",
            ])
            .output()
            .map_err(|e| Error::DiscoveryFailed(format!("wmic: {e}")))?;

        if !output.status.success() {
            return Err(Error::DiscoveryFailed(format!(
                "wmic exited with {}",
                output.status
            )));
        }

        let drive = parse_disk_query(&String::from_utf8_lossy(&output.stdout), label)?;
        debug!("volume {label} is drive {drive}");

        // The query proves a removable FAT volume carries the label; the
        // sentinel confirms it is actually a UF2 bootloader.
        let mount = PathBuf::from(drive);
        if !mount.join(SENTINEL_FILE).is_file() {
            return Err(Error::VolumeNotFound {
                label: label.to_string(),
            });
        }
        Ok(mount)
    }
}

/// Parse `Win32_SerialPort ... GET DeviceID` output: a header line, then
/// one device identifier per row.
fn parse_serial_query(output: &str) -> Result<String> {
    if output.trim() == NO_INSTANCES {
        return Err(Error::NoPortFound);
    }

    for line in output.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if let [word] = words.as_slice() {
            if word.contains("COM") {
                return Ok((*word).to_string());
            }
        }
    }
    Err(Error::NoPortFound)
}

/// Parse `Win32_LogicalDisk` output into the matching drive root.
///
/// `wmic` orders the requested columns alphabetically, so rows read
/// `DeviceID DriveType FileSystem VolumeName`. A row counts as the
/// bootloader volume when its drive type is removable and its filesystem
/// is FAT; the WHERE clause already constrained the volume name.
fn parse_disk_query(output: &str, label: &str) -> Result<String> {
    let mut drives = Vec::new();
    for line in output.lines() {
        let words: Vec<&str> = line.split_whitespace().collect();
        if words.len() >= 3 && words[1] == DRIVE_TYPE_REMOVABLE && words[2] == "FAT" {
            drives.push(words[0].to_string());
        }
    }

    match drives.len() {
        0 => Err(Error::VolumeNotFound {
            label: label.to_string(),
        }),
        1 => Ok(drives.remove(0)),
        n => Err(Error::DiscoveryFailed(format!(
            "{n} removable FAT volumes labeled {label}; expected exactly one"
        ))),
    }
}
