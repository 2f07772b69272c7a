//! Reset-to-bootloader trigger ("touch at 1200 baud").
//!
//! Many UF2-capable boards interpret a serial port being opened at
//! 1200 baud with DTR deasserted as a request to reboot into their
//! mass-storage bootloader. Nothing is ever transmitted; the open/close
//! itself is the signal.

use crate::error::{Error, Result};
use log::{debug, info};
use std::thread;
use std::time::Duration;

/// Baud rate UF2 bootloaders interpret as a reset request.
pub const TOUCH_BAUD: u32 = 1200;

/// Open attempts before giving up on the port.
const RETRY_COUNT: usize = 3;

/// Pause between failed open attempts.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Read/write timeout for the briefly-held port.
const PORT_TIMEOUT: Duration = Duration::from_millis(1000);

/// A just-opened serial port the trigger drives DTR on.
///
/// Split out from [`serialport::SerialPort`] so the retry logic can be
/// exercised without real hardware.
pub(crate) trait TouchPort {
    /// Deassert the DTR control line.
    fn clear_dtr(&mut self) -> serialport::Result<()>;
}

impl TouchPort for Box<dyn serialport::SerialPort> {
    fn clear_dtr(&mut self) -> serialport::Result<()> {
        self.write_data_terminal_ready(false)
    }
}

/// Signal the board on `port` to reboot into its bootloader.
///
/// The port is opened at [`TOUCH_BAUD`], DTR is deasserted, and the port
/// is closed again. Opening is retried up to three times with a one
/// second pause. An "invalid port" open failure is treated as success:
/// the usual cause is the board having already reset in response to an
/// earlier touch, taking its port with it.
pub fn touch(port: &str) -> Result<()> {
    touch_with(port, RETRY_DELAY, |name| {
        serialport::new(name, TOUCH_BAUD).timeout(PORT_TIMEOUT).open()
    })
}

fn touch_with<P, F>(port: &str, retry_delay: Duration, mut open: F) -> Result<()>
where
    P: TouchPort,
    F: FnMut(&str) -> serialport::Result<P>,
{
    let mut last_err = None;

    for attempt in 1..=RETRY_COUNT {
        match open(port) {
            Ok(mut p) => {
                p.clear_dtr().map_err(|e| Error::TriggerFailed {
                    port: port.to_string(),
                    source: e,
                })?;
                debug!("touched {port} at {TOUCH_BAUD} baud");
                // Dropping the port closes it; the open/close pair is the
                // whole signal.
                return Ok(());
            },
            Err(e) if is_invalid_port(&e) => {
                // Known false positive: a port argument that never existed
                // looks identical to a board that already rebooted away.
                info!("port {port} is gone ({e}); assuming the board already reset");
                return Ok(());
            },
            Err(e) => {
                debug!("open attempt {attempt}/{RETRY_COUNT} on {port} failed: {e}");
                last_err = Some(e);
                thread::sleep(retry_delay);
            },
        }
    }

    // The loop only falls through after at least one recorded failure.
    let source = last_err.unwrap_or_else(|| {
        serialport::Error::new(serialport::ErrorKind::Unknown, "no open attempt made")
    });
    Err(Error::TriggerFailed {
        port: port.to_string(),
        source,
    })
}

/// Classify open errors meaning the port no longer exists in that form.
fn is_invalid_port(err: &serialport::Error) -> bool {
    matches!(
        err.kind(),
        serialport::ErrorKind::NoDevice | serialport::ErrorKind::Io(std::io::ErrorKind::NotFound)
    )
}
