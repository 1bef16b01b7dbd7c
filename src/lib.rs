//! Flashprep is a pair of build-pipeline hooks for embedded firmware
//! projects. Before the build orchestrator's upload transport runs, it
//! performs a hardware reset handshake over the serial control lines of the
//! upload port so the target device drops into its bootloader; before
//! compilation, it stamps a calendar-based version identifier into a
//! generated header consumed by the firmware source.
//!
//! The reset handshake is strictly advisory: many environments lack serial
//! control support entirely, or have the device wired so that toggling the
//! lines is a no-op, so every failure on that path is reported as a warning
//! and the build proceeds. Version stamping is the opposite: the firmware
//! cannot compile without the generated header, so a failed write aborts the
//! build.
//!
//! Neither hook owns the build: both are registered through the narrow
//! [`BuildHookTarget`] interface an orchestrator exposes, and run to
//! completion on its build thread at the lifecycle points it defines.
//!
//! The reset handshake is implemented as a state machine. State machines are
//! implemented in terms of **states** and **transitions** between them with
//! the following characteristics:
//!
//! * Can only be in one state at any time.
//! * Each state can have its own associated data if needed.
//! * It is possible to have some shared data between **all** states.
//! * Transitions between states are triggered via typed **events** and follow
//!   defined semantics.
//! * Only explicitly defined transitions should be permitted and as many
//!   errors should be detected at **compile-time**.
//! * Transitioning from one state to another consumes the original state and
//!   renders it unusable. Any transition back to that state would create a
//!   new state.
//! * Data can be transferred from one state to the next by attaching it to
//!   the transition event. Such data is statically defined as part of the
//!   event type.
//!
//! The implementation of state transitions leverages `rust`'s `From` and
//! `Into` pattern. The `From` trait allows for a type to define how to create
//! itself from another type, hence providing us an intuitive and simple
//! mechanism for converting `events` into new `states`. Only transitions for
//! which the `From` trait is implemented are authorized and any other
//! transition would be detected at compile-time as an error.

mod hooks;
mod report;
mod reset_protocol;
mod settings;
mod utils;
mod version;

pub use hooks::{
    register, register_reset_hook, register_version_hook, BuildHookTarget, HookAction,
    HookRegistry, TargetSpec, COMPILE_STEP, RESET_UPLOAD_TARGET, UPLOAD_STEP,
};
pub use report::{ConsoleReporter, Reporter, Tag};
pub use reset_protocol::{factory, ResetHandshake, ResetOutcome};
pub use settings::{Settings, SettingsBuilder};
pub use utils::ports::{ControlPort, ControlPortOpener, SerialCapability};
pub use version::{generate, write_header, VersionStamp, HEADER_RELATIVE_PATH};
