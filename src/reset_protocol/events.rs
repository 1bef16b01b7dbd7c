//! Events for the reset handshake state machine.
//!
//! This module is private and restricted to the
//! [`reset_protocol`](crate::reset_protocol) scope. The public interface of
//! the reset handshake state machine is provided by
//! [`reset_protocol`](crate::reset_protocol).
//!
//! ```ignore
//! use super::events::*;
//! ```
//!
//! Refer to the [`state_machine`](super::state_machine) module for an
//! overview of states, events and transitions.

use std::fmt;

use super::state_machine::ResetOutcome;
use crate::ControlPort;

// =============================================================================
// Crate-Public Interface
// =============================================================================

// SwitchToHoldResetEvent ======================================================

/// Event fired to trigger a transition to the `HoldReset` state.
///
/// Fired from the `Probe` state once the control channel has been acquired
/// successfully.
pub(crate) struct SwitchToHoldResetEvent {
    /// The open control channel. Consumed and moved to the next state.
    pub port: Box<dyn ControlPort>,
}
impl fmt::Debug for SwitchToHoldResetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SwitchToHoldResetEvent")
            .field(&"<control port>")
            .finish()
    }
}

// SwitchToReleaseResetEvent ===================================================

/// Event fired to trigger a transition to the `ReleaseReset` state, after the
/// reset-hold step has completed its delay.
pub(crate) struct SwitchToReleaseResetEvent {
    /// The open control channel. Consumed and moved to the next state.
    pub port: Box<dyn ControlPort>,
    /// `true` when a prior line-set operation failed. Each step is still
    /// attempted; this only suppresses the final success message.
    pub faulted: bool,
}
impl fmt::Debug for SwitchToReleaseResetEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SwitchToReleaseResetEvent")
            .field(&"<control port>")
            .field(&self.faulted)
            .finish()
    }
}

// SwitchToSettleEvent =========================================================

/// Event fired to trigger a transition to the `Settle` state. The control
/// channel has been released by this point; settling is a plain delay that
/// gives the device time to come out of reset.
#[derive(Debug)]
pub(crate) struct SwitchToSettleEvent {}

// DoneEvent ===================================================================

/// Event fired when the handshake completes and is about to terminate. It
/// triggers a transition to the `Done` state.
///
/// This can happen after the settle delay (sequence ran) or directly from the
/// `Probe` state when the handshake is skipped (no port configured, no serial
/// capability, channel acquisition failure).
#[derive(Debug)]
pub(crate) struct DoneEvent {
    pub outcome: ResetOutcome,
    /// When `true`, the `Done` state announces readiness for upload. Only a
    /// missing port configuration suppresses the announcement.
    pub announce_ready: bool,
}

// ExitEvent ===================================================================

/// The last event that can be triggered in the reset handshake state machine.
/// It terminates the event loop, handing the [`ResetOutcome`] back to the
/// caller that started the state machine.
#[derive(Debug)]
pub(crate) struct ExitEvent {
    pub outcome: ResetOutcome,
}

// Events enum =================================================================

/// Events that can be triggered within the reset handshake state machine.
///
/// Each possible value holds an `event`, which in turn may hold additional
/// data for the state transition. Such data is passed by the origin state for
/// potential use by the target state.
#[derive(Debug)]
pub(crate) enum Event {
    SwitchToHoldReset(SwitchToHoldResetEvent),
    SwitchToReleaseReset(SwitchToReleaseResetEvent),
    SwitchToSettle(SwitchToSettleEvent),
    Done(DoneEvent),
    Exit(ExitEvent),
}
