//! Firmware delivery onto the mounted bootloader volume.

use crate::error::{Error, Result};
use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// File name the bootloader watches for; writing it completes the flash.
pub const FIRMWARE_NAME: &str = "flash.uf2";

/// Copy `image` onto the mounted bootloader volume at `mount`.
///
/// The bytes are streamed to `flash.uf2.tmp` and renamed into place only
/// once fully written and synced, so the bootloader can never pick up a
/// partial image under the real name. Failed writes remove the temp file
/// before surfacing the error.
pub fn deliver(image: &Path, mount: &Path) -> Result<()> {
    let mut src = File::open(image).map_err(|e| Error::SourceUnreadable {
        path: image.to_path_buf(),
        source: e,
    })?;

    let dest = mount.join(FIRMWARE_NAME);
    let tmp = mount.join(format!("{FIRMWARE_NAME}.tmp"));

    let mut out = File::create(&tmp).map_err(|e| Error::DestinationWriteFailed {
        path: tmp.clone(),
        source: e,
    })?;

    // sync_all stands in for an explicit close, surfacing flush errors
    // the implicit drop would swallow.
    if let Err(e) = io::copy(&mut src, &mut out).and_then(|_| out.sync_all()) {
        drop(out);
        remove_partial(&tmp);
        return Err(Error::DestinationWriteFailed {
            path: tmp,
            source: e,
        });
    }
    drop(out);

    debug!("renaming {} to {}", tmp.display(), dest.display());
    match fs::rename(&tmp, &dest) {
        Ok(()) => Ok(()),
        Err(e) => {
            remove_partial(&tmp);
            Err(Error::RenameFailed {
                path: dest,
                source: e,
            })
        },
    }
}

/// Best-effort cleanup so a partial write never looks like firmware.
fn remove_partial(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        debug!("could not remove {}: {e}", tmp.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_image(dir: &TempDir, bytes: &[u8]) -> std::path::PathBuf {
        let image = dir.path().join("firmware.uf2");
        fs::write(&image, bytes).unwrap();
        image
    }

    #[test]
    fn test_deliver_copies_bytes_exactly() {
        let dir = TempDir::new().unwrap();
        let payload: Vec<u8> = (0..=255).cycle().take(4096 + 17).collect();
        let image = write_image(&dir, &payload);
        let mount = dir.path().join("mount");
        fs::create_dir(&mount).unwrap();

        deliver(&image, &mount).unwrap();

        let delivered = fs::read(mount.join(FIRMWARE_NAME)).unwrap();
        assert_eq!(delivered, payload);
        assert!(!mount.join("flash.uf2.tmp").exists());
    }

    #[test]
    fn test_deliver_replaces_existing_firmware() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir, b"new image");
        let mount = dir.path().join("mount");
        fs::create_dir(&mount).unwrap();
        fs::write(mount.join(FIRMWARE_NAME), b"old image").unwrap();

        deliver(&image, &mount).unwrap();

        assert_eq!(fs::read(mount.join(FIRMWARE_NAME)).unwrap(), b"new image");
    }

    #[test]
    fn test_missing_source() {
        let dir = TempDir::new().unwrap();
        let mount = dir.path().join("mount");
        fs::create_dir(&mount).unwrap();

        let result = deliver(&dir.path().join("nope.uf2"), &mount);
        assert!(matches!(result, Err(Error::SourceUnreadable { .. })));
        assert!(!mount.join(FIRMWARE_NAME).exists());
        assert!(!mount.join("flash.uf2.tmp").exists());
    }

    #[test]
    fn test_unwritable_mount_leaves_no_artifacts() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir, b"payload");
        // A plain file where the mount directory should be: create fails.
        let mount = dir.path().join("not-a-dir");
        fs::write(&mount, b"").unwrap();

        let result = deliver(&image, &mount);
        assert!(matches!(result, Err(Error::DestinationWriteFailed { .. })));
    }

    #[test]
    fn test_failed_write_preserves_prior_firmware() {
        let dir = TempDir::new().unwrap();
        let image = write_image(&dir, b"payload");
        let mount = dir.path().join("not-a-dir");
        fs::write(&mount, b"").unwrap();

        // A previously delivered image elsewhere must be untouched by a
        // failed attempt against a bad mount.
        let good_mount = dir.path().join("mount");
        fs::create_dir(&good_mount).unwrap();
        fs::write(good_mount.join(FIRMWARE_NAME), b"prior run").unwrap();

        assert!(deliver(&image, &mount).is_err());
        assert_eq!(fs::read(good_mount.join(FIRMWARE_NAME)).unwrap(), b"prior run");
        assert!(!good_mount.join("flash.uf2.tmp").exists());
    }
}
