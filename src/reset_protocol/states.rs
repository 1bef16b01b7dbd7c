//! States for the reset handshake state machine.
//!
//! This module is private and restricted to the
//! [`reset_protocol`](crate::reset_protocol) scope. The public interface of
//! the reset handshake state machine is provided by
//! [`reset_protocol`](crate::reset_protocol).
//!
//! ```ignore
//! use super::states::*;
//! ```
//!
//! Refer to the [`state_machine`](super::state_machine) module for an
//! overview of states, events and transitions.

use std::fmt;

use log::debug;

use super::events::*;
use super::state_machine::ResetOutcome;

use crate::report::{Reporter, Tag};
use crate::utils::hold;
use crate::{ControlPort, SerialCapability, Settings};

// =============================================================================
// Crate-Public Interface
// =============================================================================

/// Everything a state needs to do its work: the immutable settings, the
/// probed serial capability (if any) and the report sink. Owned by the state
/// machine and reborrowed for every step.
pub(crate) struct ResetContext<'a> {
    pub settings: &'a Settings,
    pub capability: Option<&'a SerialCapability>,
    pub reporter: &'a mut dyn Reporter,
}

/// Trait adding the ability for a state to be `run` after a transition into
/// it.
pub(crate) trait Runnable {
    /// A state implements this method so it can be `run` after the state
    /// machine transitions into it.
    ///
    /// During this call, the state can do any work that needs to be done and
    /// when finished, requests a transition to a `new state` by returning the
    /// appropriate `event`. The `state` and the `event` are consumed to
    /// create the `new state` using the corresponding [`From`] trait
    /// implementation (provided such implementation exists).
    fn run(&mut self, cx: &mut ResetContext<'_>) -> Event;
}

// Probe State =================================================================

/// The initial state of the reset handshake.
///
/// Resolves everything the sequence needs before touching hardware, in this
/// order:
///
///  1. An upload port must be configured. When it is not, the handshake is
///     skipped with a warning; resetting an unknown device is meaningless.
///  2. The environment must have the optional serial-control capability.
///  3. The control channel must open at the configured baud rate.
///
/// From the `ProbeState`, the state machine can evolve via the following
/// transitions:
///
///  * **[`SwitchToHoldResetEvent`] => [`HoldResetState`]** when the control
///    channel was acquired,
///  * **[`DoneEvent`] => [`DoneState`]** when the handshake is skipped. All
///    skip paths are advisory; none of them can fail the build.
#[derive(Debug)]
pub(crate) struct ProbeState {}
impl Runnable for ProbeState {
    fn run(&mut self, cx: &mut ResetContext<'_>) -> Event {
        debug!("=> Probe");

        let path = match &cx.settings.path {
            Some(path) => path.clone(),
            None => {
                cx.reporter
                    .warning("No upload port configured, skipping reset");
                return Event::Done(DoneEvent {
                    outcome: ResetOutcome::Skipped,
                    announce_ready: false,
                });
            }
        };

        cx.reporter.report(
            Tag::Reset,
            &format!("Resetting device on {} before upload...", path),
        );

        let capability = match cx.capability {
            Some(capability) => capability,
            None => {
                cx.reporter.warning(&format!(
                    "Optional {} capability not available, skipping hardware reset",
                    SerialCapability::NAME
                ));
                return Event::Done(DoneEvent {
                    outcome: ResetOutcome::Skipped,
                    announce_ready: true,
                });
            }
        };

        match capability.open(cx.settings) {
            Ok(port) => Event::SwitchToHoldReset(SwitchToHoldResetEvent { port }),
            Err(err) => {
                cx.reporter
                    .warning(&format!("Reset attempt failed: {}", err));
                Event::Done(DoneEvent {
                    outcome: ResetOutcome::Skipped,
                    announce_ready: true,
                })
            }
        }
    }
}

// HoldReset State =============================================================

/// First step of the reset sequence: both control lines are driven low,
/// keeping the device in reset for the configured hold duration.
///
/// A line-set failure is reported as a warning and the sequence continues;
/// the remaining steps attempt their own line operations independently.
///
/// This state transitions as follows:
///
///  * **[`SwitchToReleaseResetEvent`] => [`ReleaseResetState`]** after the
///    hold delay, unconditionally.
pub(crate) struct HoldResetState {
    /// The open control channel. Consumed and moved to the next state.
    pub port: Option<Box<dyn ControlPort>>,
}
impl Runnable for HoldResetState {
    fn run(&mut self, cx: &mut ResetContext<'_>) -> Event {
        debug!("=> Hold Reset");

        if let Some(mut port) = self.port.take() {
            let mut faulted = false;
            if let Err(err) = port.set_control_lines(false) {
                cx.reporter
                    .warning(&format!("Reset attempt failed: {}", err));
                faulted = true;
            }
            hold(cx.settings.reset_hold, "Holding device in reset...");

            return Event::SwitchToReleaseReset(SwitchToReleaseResetEvent { port, faulted });
        }

        // We should never reach here!
        unreachable!()
    }
}
impl fmt::Debug for HoldResetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("HoldResetState")
            .field(&self.port.as_ref().map(|_| "<control port>"))
            .finish()
    }
}

// ReleaseReset State ==========================================================

/// Second step of the reset sequence: both control lines are driven high,
/// letting the device boot, and held for the configured release duration.
///
/// At the end of this state the control channel is dropped, which releases
/// the underlying device handle. The channel therefore never outlives the
/// line-toggling steps, on any path.
///
/// This state transitions as follows:
///
///  * **[`SwitchToSettleEvent`] => [`SettleState`]** after the release delay,
///    unconditionally.
pub(crate) struct ReleaseResetState {
    /// The open control channel. Dropped when this state completes.
    pub port: Option<Box<dyn ControlPort>>,
    /// `true` when a prior line-set operation failed.
    pub faulted: bool,
}
impl Runnable for ReleaseResetState {
    fn run(&mut self, cx: &mut ResetContext<'_>) -> Event {
        debug!("=> Release Reset");

        if let Some(mut port) = self.port.take() {
            let mut faulted = self.faulted;
            if let Err(err) = port.set_control_lines(true) {
                cx.reporter
                    .warning(&format!("Reset attempt failed: {}", err));
                faulted = true;
            }
            hold(cx.settings.release_hold, "Releasing reset...");

            // Release the control channel before settling so the upload
            // transport can claim the device.
            drop(port);

            if !faulted {
                cx.reporter.ok("Hardware reset completed (via serial)");
            }
            return Event::SwitchToSettle(SwitchToSettleEvent {});
        }

        // We should never reach here!
        unreachable!()
    }
}
impl fmt::Debug for ReleaseResetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReleaseResetState")
            .field(&self.port.as_ref().map(|_| "<control port>"))
            .field(&self.faulted)
            .finish()
    }
}

// Settle State ================================================================

/// Final step of the reset sequence: a plain delay, with the channel already
/// released, giving the device time to come out of reset before the upload
/// transport opens the port.
///
/// This state transitions as follows:
///
///  * **[`DoneEvent`] => [`DoneState`]** after the settle delay.
#[derive(Debug)]
pub(crate) struct SettleState {}
impl Runnable for SettleState {
    fn run(&mut self, cx: &mut ResetContext<'_>) -> Event {
        debug!("=> Settle");

        hold(cx.settings.settle, "Waiting for device to settle...");

        Event::Done(DoneEvent {
            outcome: ResetOutcome::Completed,
            announce_ready: true,
        })
    }
}

// Done State ==================================================================

/// Reached when the reset handshake completes its execution and is about to
/// terminate.
///
/// This state goes into a 2-phase execution. During the initial phase, it
/// runs like any other state, announcing readiness for upload when a port was
/// configured. It then triggers the [`ExitEvent`] to cause the state machine
/// to terminate and hand the outcome back to the caller.
#[derive(Debug, Copy, Clone)]
pub(crate) struct DoneState {
    /// The outcome reported to the caller. Never fatal.
    pub outcome: ResetOutcome,
    /// When `true`, announce `Ready to upload` before exiting.
    pub announce_ready: bool,
    /// When `true`, instructs the state machine to exit its event loop.
    pub should_exit: bool,
}
impl Runnable for DoneState {
    fn run(&mut self, cx: &mut ResetContext<'_>) -> Event {
        debug!("=> Done ({:?})", self.outcome);

        if self.announce_ready {
            cx.reporter.ok("Ready to upload");
        }

        Event::Exit(ExitEvent {
            outcome: self.outcome,
        })
    }
}
