//! Serial control channel acquisition.
//!
//! The reset handshake only needs two things from a serial port: exclusive
//! access to the device path, and the ability to drive the DTR and RTS
//! control lines together. Both are behind small traits so that the handshake
//! never depends on a concrete serial library, and so that environments
//! without serial support (the crate built without the `serial` feature) show
//! up as a plainly absent capability rather than an error to catch.

use std::fmt;
use std::io;

use crate::Settings;

//==============================================================================
// Public Interface
//==============================================================================

/// Exclusive handle on a device's serial control lines.
///
/// Dropping the handle releases the underlying channel; the handshake relies
/// on that for its guaranteed-release semantics and never closes explicitly.
pub trait ControlPort {
    /// Drive both control lines (DTR and RTS) to the given level, `false` for
    /// low and `true` for high.
    fn set_control_lines(&mut self, high: bool) -> io::Result<()>;
}

/// Opens a [`ControlPort`] on the device named in the settings.
pub trait ControlPortOpener {
    fn open(&self, settings: &Settings) -> io::Result<Box<dyn ControlPort>>;
}

/// The optional serial-control capability of the running environment.
///
/// [`probe`](SerialCapability::probe) is the single place that knows whether
/// this build can talk to serial hardware at all. Absence is a normal variant,
/// not an error: callers get `None` and are expected to skip, warn and move
/// on.
pub struct SerialCapability {
    opener: Box<dyn ControlPortOpener>,
}
impl SerialCapability {
    /// Name of the capability, as it appears in skip warnings.
    pub const NAME: &'static str = "serial-control";

    /// Probe the environment for serial-control support.
    #[cfg(feature = "serial")]
    pub fn probe() -> Option<SerialCapability> {
        Some(SerialCapability {
            opener: Box::new(serial::SerialPortOpener),
        })
    }

    /// Probe the environment for serial-control support.
    ///
    /// This build carries no serial library, so the capability is never
    /// available.
    #[cfg(not(feature = "serial"))]
    pub fn probe() -> Option<SerialCapability> {
        None
    }

    /// Build a capability around a custom opener. This is the seam used to
    /// substitute fake ports in tests and by embedders with their own
    /// transport.
    pub fn with_opener(opener: Box<dyn ControlPortOpener>) -> SerialCapability {
        SerialCapability { opener }
    }

    /// Acquire the control channel described by `settings`.
    pub fn open(&self, settings: &Settings) -> io::Result<Box<dyn ControlPort>> {
        self.opener.open(settings)
    }
}
impl fmt::Debug for SerialCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SerialCapability").field(&Self::NAME).finish()
    }
}

//==============================================================================
// Private stuff
//==============================================================================

#[cfg(feature = "serial")]
mod serial {
    use std::io;

    use log::debug;
    use serialport::SerialPort;

    use super::{ControlPort, ControlPortOpener};
    use crate::Settings;

    /// Opener backed by the `serialport` crate.
    pub(super) struct SerialPortOpener;
    impl ControlPortOpener for SerialPortOpener {
        fn open(&self, settings: &Settings) -> io::Result<Box<dyn ControlPort>> {
            let path = settings.path.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "no upload port configured")
            })?;
            let port = serialport::new(path, settings.baud_rate)
                .timeout(settings.timeout)
                .open()
                .map_err(io::Error::from)?;
            debug!(
                "control channel open on {} at {} baud",
                path, settings.baud_rate
            );
            Ok(Box::new(SerialControlPort { port }))
        }
    }

    struct SerialControlPort {
        port: Box<dyn SerialPort>,
    }
    impl ControlPort for SerialControlPort {
        fn set_control_lines(&mut self, high: bool) -> io::Result<()> {
            self.port
                .write_data_terminal_ready(high)
                .map_err(io::Error::from)?;
            self.port
                .write_request_to_send(high)
                .map_err(io::Error::from)?;
            Ok(())
        }
    }
}
