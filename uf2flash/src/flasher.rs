//! The flash sequence: trigger, settle, resolve, deliver.

use crate::deliver;
use crate::error::{Error, Result};
use crate::host::{self, Host};
use crate::target::Target;
use crate::touch;
use log::{debug, info};
use std::path::Path;
use std::thread;
use std::time::Duration;

/// Delay between triggering the bootloader and looking for its volume,
/// giving the board time to reset and re-enumerate over USB.
pub const SETTLE_DELAY: Duration = Duration::from_secs(3);

/// Runs the full flash sequence against one board.
///
/// Each call to [`Flasher::flash`] rediscovers everything from scratch,
/// so a failed attempt is retried simply by calling it again.
pub struct Flasher {
    host: Box<dyn Host>,
    settle_delay: Duration,
}

impl Flasher {
    /// Create a flasher using the discovery strategy for the current OS.
    pub fn new() -> Result<Self> {
        Ok(Self::with_host(host::detect()?))
    }

    /// Create a flasher with an explicit discovery strategy.
    #[must_use]
    pub fn with_host(host: Box<dyn Host>) -> Self {
        Self {
            host,
            settle_delay: SETTLE_DELAY,
        }
    }

    /// Override the post-trigger settle delay.
    ///
    /// The default of [`SETTLE_DELAY`] is a blunt stand-in for watching
    /// the device actually re-enumerate; shorten it only when the volume
    /// is known to be present already.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Flash `image` onto `target`.
    ///
    /// The bootloader is triggered via `port`, or via the platform's
    /// default serial port when `None`. Any stage failure is wrapped with
    /// the image path it was delivering.
    pub fn flash(&self, port: Option<&str>, target: Target, image: &Path) -> Result<()> {
        self.run(port, target, image).map_err(|e| Error::Flash {
            image: image.to_path_buf(),
            source: Box::new(e),
        })
    }

    fn run(&self, port: Option<&str>, target: Target, image: &Path) -> Result<()> {
        let port = match port {
            Some(p) => p.to_string(),
            None => self.host.default_port()?,
        };

        info!("triggering bootloader on {port}");
        touch::touch(&port)?;
        thread::sleep(self.settle_delay);

        let label = target.volume_label();
        debug!("resolving volume {label} for target {target}");
        let mount = self.host.find_volume(label)?;
        info!("found {label} at {}", mount.display());

        deliver::deliver(image, &mount)
    }
}
