//! Settings for the serial control channel, the reset sequence timing and the
//! version header output location.
//!
//! Use the [builder](https://doc.rust-lang.org/1.0.0/style/ownership/builders.html)
//! pattern to set the configurable values.

use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Public Interface
// =============================================================================

/// Groups all settings used by the `flashprep` build hooks and acts as a
/// [builder](https://doc.rust-lang.org/1.0.0/style/ownership/builders.html)
/// for the settings.
///
/// The control channel is always opened at 8 data bits, no parity, one stop
/// bit; only the baud rate and the read timeout are configurable.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Settings {
    /// The upload port name, usually the device path. Resolved by the build
    /// orchestrator; when `None`, the reset handshake is skipped with a
    /// warning.
    pub path: Option<String>,
    /// The baud rate in symbols-per-second.
    pub baud_rate: u32,
    /// Read timeout applied to the control channel when it is opened.
    pub timeout: Duration,

    /// How long both control lines are held low to keep the device in reset.
    pub reset_hold: Duration,
    /// How long both control lines are held high after releasing reset.
    pub release_hold: Duration,
    /// Post-reset settle delay, applied after the channel is released.
    pub settle: Duration,

    /// Root directory of the firmware project. The version header is written
    /// to `<project_dir>/include/version.h`.
    pub project_dir: Option<PathBuf>,

    /// Restrict creation of `Settings` instances unless through the
    /// `SettingsBuilder`.
    #[doc(hidden)]
    _private_use_builder: (),
}

/// The builder for the `Settings` values.
///
/// All values are optional and have default values that will be used if not
/// explicitly set. The timing defaults are the reset protocol values: 0.5s
/// hold, 0.5s release, 1.0s settle, with a 0.5s channel read timeout.
///
/// **Example**
///
/// ```ignore
/// let settings = SettingsBuilder::new().path("/dev/ttyUSB0").finalize();
/// ```
pub struct SettingsBuilder {
    settings: Settings,
}
impl SettingsBuilder {
    /// Start building the settings using default values and no path for the
    /// port.
    pub fn new() -> Self {
        SettingsBuilder {
            settings: Settings {
                path: None,
                baud_rate: 115_200,
                timeout: Duration::from_millis(500),
                reset_hold: Duration::from_millis(500),
                release_hold: Duration::from_millis(500),
                settle: Duration::from_millis(1000),
                project_dir: None,
                _private_use_builder: (),
            },
        }
    }

    /// Set the path to the serial upload port
    pub fn path<'a>(mut self, path: impl Into<std::borrow::Cow<'a, str>>) -> Self {
        self.settings.path = Some(path.into().as_ref().to_owned());
        self
    }

    /// Set the baud rate in symbols-per-second
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.settings.baud_rate = baud_rate;
        self
    }

    /// Set the read timeout for the control channel
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Set how long the control lines are held low during reset
    pub fn reset_hold(mut self, reset_hold: Duration) -> Self {
        self.settings.reset_hold = reset_hold;
        self
    }

    /// Set how long the control lines are held high after reset
    pub fn release_hold(mut self, release_hold: Duration) -> Self {
        self.settings.release_hold = release_hold;
        self
    }

    /// Set the post-reset settle delay
    pub fn settle(mut self, settle: Duration) -> Self {
        self.settings.settle = settle;
        self
    }

    /// Set the root directory of the firmware project
    pub fn project_dir(mut self, project_dir: impl Into<PathBuf>) -> Self {
        self.settings.project_dir = Some(project_dir.into());
        self
    }

    pub fn finalize(self) -> Settings {
        self.settings
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        SettingsBuilder::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[test]
fn all_default() {
    let settings = SettingsBuilder::new().finalize();
    assert_eq!(
        settings,
        Settings {
            path: None,
            baud_rate: 115_200,
            timeout: Duration::from_millis(500),
            reset_hold: Duration::from_millis(500),
            release_hold: Duration::from_millis(500),
            settle: Duration::from_millis(1000),
            project_dir: None,
            _private_use_builder: (),
        }
    )
}

#[test]
fn path() {
    let settings = SettingsBuilder::new().path("/dev/ttyUSB0").finalize();
    assert_eq!(settings.path.unwrap(), "/dev/ttyUSB0");
}

#[test]
fn baud_rate() {
    let baud_rate = 74_880;
    let settings = SettingsBuilder::new().baud_rate(baud_rate).finalize();
    assert_eq!(settings.baud_rate, baud_rate);
}

#[test]
fn timeout() {
    let timeout = Duration::from_millis(250);
    let settings = SettingsBuilder::new().timeout(timeout).finalize();
    assert_eq!(settings.timeout, timeout);
}

#[test]
fn hold_durations() {
    let settings = SettingsBuilder::new()
        .reset_hold(Duration::from_millis(1))
        .release_hold(Duration::from_millis(2))
        .settle(Duration::from_millis(3))
        .finalize();
    assert_eq!(settings.reset_hold, Duration::from_millis(1));
    assert_eq!(settings.release_hold, Duration::from_millis(2));
    assert_eq!(settings.settle, Duration::from_millis(3));
}

#[test]
fn project_dir() {
    let settings = SettingsBuilder::new().project_dir("/tmp/fw").finalize();
    assert_eq!(settings.project_dir.unwrap(), PathBuf::from("/tmp/fw"));
}
