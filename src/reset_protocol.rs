//! Pre-upload device reset handshake.
//!
//! Before the build orchestrator's upload transport runs, the target device
//! is forced into its bootloader by driving the DTR/RTS control lines of the
//! serial upload port through a timed sequence: both lines low for 0.5s (hold
//! in reset), both lines high for 0.5s (release), then a 1.0s settle after
//! the channel is released. The handshake is strictly advisory: whatever goes
//! wrong is reported as a warning and the upload proceeds.
//!
//! **Example** - Executing the state machine event loop:
//! ```ignore
//! use crate::{reset_protocol as rpsm, ConsoleReporter, SerialCapability};
//!
//! let settings = SettingsBuilder::new().path("/dev/ttyUSB0").finalize();
//! let mut rpsm = rpsm::factory(settings, SerialCapability::probe());
//! let outcome = rpsm.run(&mut ConsoleReporter);
//! ```

mod events;
mod state_machine;
mod states;

pub use state_machine::{factory, ResetHandshake, ResetOutcome};
