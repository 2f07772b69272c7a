//! Device discovery on POSIX-like systems via filesystem globbing.

use crate::error::{Error, Result};
use crate::host::{Host, SENTINEL_FILE};
use log::{debug, trace};
use std::path::PathBuf;

/// Discovery strategy for POSIX-like systems.
///
/// Parameterized by the OS-specific serial device pattern and the
/// conventional mount root removable volumes appear under.
pub struct PosixHost {
    port_glob: &'static str,
    volume_root: &'static str,
}

impl PosixHost {
    /// Strategy for Linux: ACM serial devices, volumes under `/media/<user>`.
    #[must_use]
    pub fn linux() -> Self {
        Self::with_patterns("/dev/ttyACM*", "/media/*")
    }

    /// Strategy for macOS: `cu.usb*` call-out devices, volumes under `/Volumes`.
    #[must_use]
    pub fn macos() -> Self {
        Self::with_patterns("/dev/cu.usb*", "/Volumes")
    }

    /// Strategy for FreeBSD: `cuaU*` call-out devices, volumes under `/media`.
    #[must_use]
    pub fn freebsd() -> Self {
        Self::with_patterns("/dev/cuaU*", "/media/*")
    }

    /// Strategy with explicit patterns. The volume root may itself contain
    /// glob metacharacters (Linux mounts under a per-user directory).
    pub(crate) fn with_patterns(port_glob: &'static str, volume_root: &'static str) -> Self {
        Self {
            port_glob,
            volume_root,
        }
    }
}

/// Run a glob pattern, skipping entries that cannot be read.
///
/// Unreadable directories under a mount root (other users' media) are
/// expected and must not abort discovery; only a malformed pattern is a
/// query failure.
fn glob_readable(pattern: &str) -> std::result::Result<Vec<PathBuf>, glob::PatternError> {
    let paths = glob::glob(pattern)?.filter_map(|entry| match entry {
        Ok(path) => Some(path),
        Err(e) => {
            trace!("skipping unreadable glob entry: {e}");
            None
        },
    });
    Ok(paths.collect())
}

impl Host for PosixHost {
    fn default_port(&self) -> Result<String> {
        let matches = glob_readable(self.port_glob)
            .map_err(|e| Error::PlatformQueryFailed(format!("bad pattern {}: {e}", self.port_glob)))?;

        match matches.first() {
            Some(path) => {
                debug!("default port: {} (pattern {})", path.display(), self.port_glob);
                Ok(path.to_string_lossy().into_owned())
            },
            None => Err(Error::NoPortFound),
        }
    }

    fn find_volume(&self, label: &str) -> Result<PathBuf> {
        let pattern = format!("{}/{label}/{SENTINEL_FILE}", self.volume_root);
        let sentinels = glob_readable(&pattern)
            .map_err(|e| Error::DiscoveryFailed(format!("bad pattern {pattern}: {e}")))?;

        match sentinels.as_slice() {
            [] => Err(Error::VolumeNotFound {
                label: label.to_string(),
            }),
            [sentinel] => {
                debug!("found {label} sentinel at {}", sentinel.display());
                sentinel
                    .parent()
                    .map(PathBuf::from)
                    .ok_or_else(|| Error::DiscoveryFailed(format!("sentinel {} has no parent directory", sentinel.display())))
            },
            many => Err(Error::DiscoveryFailed(format!(
                "{} volumes labeled {label} are mounted; expected exactly one",
                many.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    // Strategy patterns are &'static str; tests leak their
    // tempdir-rooted patterns to satisfy that.
    fn leak(s: String) -> &'static str {
        Box::leak(s.into_boxed_str())
    }

    fn host_over(dir: &TempDir) -> PosixHost {
        let root = dir.path().to_string_lossy().into_owned();
        PosixHost::with_patterns(leak(format!("{root}/dev/ttyACM*")), leak(format!("{root}/media/*")))
    }

    fn mount_volume(dir: &TempDir, user: &str, label: &str) {
        let volume = dir.path().join("media").join(user).join(label);
        fs::create_dir_all(&volume).unwrap();
        fs::write(volume.join(SENTINEL_FILE), "UF2 Bootloader v3.14\n").unwrap();
    }

    #[test]
    fn test_default_port_first_match() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dev")).unwrap();
        fs::write(dir.path().join("dev/ttyACM0"), "").unwrap();
        fs::write(dir.path().join("dev/ttyACM1"), "").unwrap();

        let port = host_over(&dir).default_port().unwrap();
        assert!(port.ends_with("ttyACM0"), "got {port}");
    }

    #[test]
    fn test_default_port_none() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("dev")).unwrap();

        assert!(matches!(host_over(&dir).default_port(), Err(Error::NoPortFound)));
    }

    #[test]
    fn test_find_volume_returns_sentinel_parent() {
        let dir = TempDir::new().unwrap();
        mount_volume(&dir, "user", "FEATHERBOOT");

        let mount = host_over(&dir).find_volume("FEATHERBOOT").unwrap();
        assert_eq!(mount, dir.path().join("media/user/FEATHERBOOT"));
    }

    #[test]
    fn test_find_volume_not_mounted() {
        let dir = TempDir::new().unwrap();
        mount_volume(&dir, "user", "FEATHERBOOT");

        match host_over(&dir).find_volume("PORTALBOOT") {
            Err(Error::VolumeNotFound { label }) => assert_eq!(label, "PORTALBOOT"),
            other => panic!("expected VolumeNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_find_volume_rejects_ambiguity() {
        let dir = TempDir::new().unwrap();
        mount_volume(&dir, "alice", "TRINKETBOOT");
        mount_volume(&dir, "bob", "TRINKETBOOT");

        assert!(matches!(
            host_over(&dir).find_volume("TRINKETBOOT"),
            Err(Error::DiscoveryFailed(_))
        ));
    }

    #[test]
    fn test_volume_without_sentinel_ignored() {
        let dir = TempDir::new().unwrap();
        let volume = dir.path().join("media/user/FEATHERBOOT");
        fs::create_dir_all(&volume).unwrap();

        assert!(matches!(
            host_over(&dir).find_volume("FEATHERBOOT"),
            Err(Error::VolumeNotFound { .. })
        ));
    }
}
