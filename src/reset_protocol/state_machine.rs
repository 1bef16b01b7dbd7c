//! Reset handshake state machine.
//!
//! The handshake walks a strictly linear sequence. The probe phase resolves
//! the port, the capability and the channel; the three timed steps then run
//! in a fixed order with the channel released before the settle delay:
//!
//! ```text
//!  Probe ──> HoldReset ──> ReleaseReset ──> Settle ──> Done
//!    │       (lines low,    (lines high,    (1.0s,      │
//!    │        0.5s)          0.5s, drop      no port)    │
//!    │                       port)                       │
//!    └────────────────── skip paths ────────────────────┘
//! ```
//!
//! Every skip path and every line-set failure is advisory: the machine always
//! reaches `Done` and the caller always gets an outcome, never an error.

use super::events::*;
use super::states::*;

use crate::report::Reporter;
use crate::{SerialCapability, Settings};

// =============================================================================
// Public Interface
// =============================================================================

/// How a reset handshake invocation ended. Both variants are success from the
/// build's point of view; the distinction only matters for reporting and for
/// tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The three-step sequence ran to completion (possibly with line-set
    /// warnings).
    Completed,
    /// The sequence never started: no port configured, no serial capability,
    /// or the channel could not be acquired.
    Skipped,
}

/// Represents the reset handshake state machine. Use the `factory()` function
/// to get an instance, then run it by calling its `run()` method.
///
/// Exactly one reset attempt is made per instance run; there are no retries
/// and no state persists across invocations.
pub struct ResetHandshake {
    settings: Settings,
    capability: Option<SerialCapability>,
    sm: ResetStates,
}
impl ResetHandshake {
    /// The handshake event loop runs until the `Done` state is reached and
    /// its `should_exit` flag is set. At such point, the event loop
    /// terminates and hands back the [`ResetOutcome`].
    pub fn run(&mut self, reporter: &mut dyn Reporter) -> ResetOutcome {
        loop {
            let mut cx = ResetContext {
                settings: &self.settings,
                capability: self.capability.as_ref(),
                reporter: &mut *reporter,
            };
            self.sm = self.sm.step(&mut cx);
            if let ResetStates::Done(state) = &self.sm {
                if state.should_exit {
                    return state.outcome;
                }
            }
        }
    }
}

/// Factory function for the reset handshake state machine. Pass the probed
/// serial capability (or `None` when the environment has no serial support);
/// the machine treats absence as a normal skip, not an error.
pub fn factory(settings: Settings, capability: Option<SerialCapability>) -> ResetHandshake {
    ResetHandshake {
        settings,
        capability,
        // The machine naturally starts in the `Probe` state.
        sm: ResetStates::Probe(ProbeState {}),
    }
}

// =============================================================================
// Private stuff
// =============================================================================

/// An enum wrapper around the states of the reset handshake state machine. It
/// provides a simpler and more intuitive model for manipulating states and
/// their transitions.
#[derive(Debug)]
enum ResetStates {
    Probe(ProbeState),
    HoldReset(HoldResetState),
    ReleaseReset(ReleaseResetState),
    Settle(SettleState),
    Done(DoneState),
}
impl ResetStates {
    /// The unit of work in the state machine event loop. It checks the
    /// current state and the current event and decides the next transition.
    /// State transitions from events are implemented using the rust
    /// `From`/`Into` pattern. Most of the potential errors of
    /// state/event/transition mismatches can be caught at compile time.
    fn step(&mut self, cx: &mut ResetContext<'_>) -> Self {
        match self {
            ResetStates::Probe(state) => {
                let event = state.run(cx);
                match event {
                    Event::SwitchToHoldReset(ev) => ResetStates::HoldReset(ev.into()),
                    Event::Done(ev) => ResetStates::Done(ev.into()),
                    _ => unreachable!("illegal event {:#?} at current state {:#?}", event, state),
                }
            }
            ResetStates::HoldReset(state) => {
                let event = state.run(cx);
                match event {
                    Event::SwitchToReleaseReset(ev) => ResetStates::ReleaseReset(ev.into()),
                    _ => unreachable!("illegal event {:#?} at current state {:#?}", event, state),
                }
            }
            ResetStates::ReleaseReset(state) => {
                let event = state.run(cx);
                match event {
                    Event::SwitchToSettle(ev) => ResetStates::Settle(ev.into()),
                    _ => unreachable!("illegal event {:#?} at current state {:#?}", event, state),
                }
            }
            ResetStates::Settle(state) => {
                let event = state.run(cx);
                match event {
                    Event::Done(ev) => ResetStates::Done(ev.into()),
                    _ => unreachable!("illegal event {:#?} at current state {:#?}", event, state),
                }
            }
            ResetStates::Done(state) => {
                let event = state.run(cx);
                match event {
                    Event::Exit(ev) => ResetStates::Done(ev.into()),
                    _ => unreachable!("illegal event {:#?} at current state {:#?}", event, state),
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// State from Event transitions
// -----------------------------------------------------------------------------

impl From<SwitchToHoldResetEvent> for HoldResetState {
    fn from(event: SwitchToHoldResetEvent) -> HoldResetState {
        HoldResetState {
            port: Some(event.port),
        }
    }
}

impl From<SwitchToReleaseResetEvent> for ReleaseResetState {
    fn from(event: SwitchToReleaseResetEvent) -> ReleaseResetState {
        ReleaseResetState {
            port: Some(event.port),
            faulted: event.faulted,
        }
    }
}

impl From<SwitchToSettleEvent> for SettleState {
    fn from(_event: SwitchToSettleEvent) -> SettleState {
        SettleState {}
    }
}

impl From<DoneEvent> for DoneState {
    fn from(event: DoneEvent) -> DoneState {
        DoneState {
            outcome: event.outcome,
            announce_ready: event.announce_ready,
            should_exit: false,
        }
    }
}
impl From<ExitEvent> for DoneState {
    fn from(event: ExitEvent) -> DoneState {
        DoneState {
            outcome: event.outcome,
            announce_ready: false,
            should_exit: true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
