//! Build lifecycle hooks.
//!
//! The build orchestrator owns the compile/upload sequencing; this crate only
//! contributes callbacks at its extension points. [`BuildHookTarget`] is the
//! narrow interface an orchestrator must expose (register a named pre-action
//! on a step, define a named target); [`HookRegistry`] is a concrete
//! implementation used by the CLI as an orchestrator stand-in and by the
//! tests. [`register`] wires both hooks and the `reset_upload` target into
//! whatever target it is handed.

mod registrar;
mod registry;

pub use registrar::{
    register, register_reset_hook, register_version_hook, COMPILE_STEP, RESET_UPLOAD_TARGET,
    UPLOAD_STEP,
};
pub use registry::{BuildHookTarget, HookAction, HookRegistry, TargetSpec};
