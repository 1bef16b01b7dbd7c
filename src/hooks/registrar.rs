//! Wires the reset handshake and the version stamper into an orchestrator.

use std::io;

use super::registry::{BuildHookTarget, TargetSpec};
use crate::{reset_protocol, version, SerialCapability, Settings};

// =============================================================================
// Public Interface
// =============================================================================

/// The orchestrator's upload lifecycle step.
pub const UPLOAD_STEP: &str = "upload";
/// The orchestrator's compile lifecycle step.
pub const COMPILE_STEP: &str = "compile";
/// Name of the user-invokable target chaining reset and upload.
pub const RESET_UPLOAD_TARGET: &str = "reset_upload";

/// Register everything this crate contributes to a build: the hardware-reset
/// pre-action on `upload`, the version-stamp pre-action on `compile`, and
/// the `reset_upload` target.
///
/// Safe to call more than once on the same target within one configuration
/// load; the named registrations replace themselves.
pub fn register(hooks: &mut dyn BuildHookTarget, settings: &Settings) {
    register_reset_hook(hooks, settings);
    register_version_hook(hooks, settings);
    hooks.define_target(TargetSpec {
        name: RESET_UPLOAD_TARGET.to_owned(),
        title: "Reset and Upload".to_owned(),
        description: "Reset device and upload firmware with automatic hardware reset".to_owned(),
        dependencies: vec![UPLOAD_STEP.to_owned()],
    });
}

/// Register the reset handshake as a pre-action of the upload step.
///
/// The action probes the serial capability on each invocation and always
/// returns `Ok`: a failed or skipped reset must never be the reason an
/// upload fails.
pub fn register_reset_hook(hooks: &mut dyn BuildHookTarget, settings: &Settings) {
    let settings = settings.clone();
    hooks.register_pre_action(
        UPLOAD_STEP,
        "hardware-reset",
        Box::new(move |reporter| {
            let capability = SerialCapability::probe();
            let mut handshake = reset_protocol::factory(settings.clone(), capability);
            handshake.run(reporter);
            Ok(())
        }),
    );
}

/// Register the version stamper as a pre-action of the compile step.
///
/// Unlike the reset hook, failures here propagate: the firmware source
/// cannot compile without the generated header.
pub fn register_version_hook(hooks: &mut dyn BuildHookTarget, settings: &Settings) {
    let project_dir = settings.project_dir.clone();
    hooks.register_pre_action(
        COMPILE_STEP,
        "version-stamp",
        Box::new(move |reporter| {
            let project_dir = project_dir.as_deref().ok_or_else(|| {
                reporter.error("No project directory configured, cannot generate version.h");
                io::Error::new(io::ErrorKind::InvalidInput, "no project directory")
            })?;
            version::generate(project_dir, reporter).map(|_| ())
        }),
    );
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::report::{RecordingReporter, Tag};
    use crate::{HookRegistry, SettingsBuilder};

    #[test]
    fn double_registration_still_resets_once_per_upload() {
        let settings = SettingsBuilder::new().finalize();
        let mut registry = HookRegistry::new();
        register(&mut registry, &settings);
        register(&mut registry, &settings);

        // With no port configured the reset hook emits exactly one skip
        // warning per execution; a duplicated hook would emit two.
        let mut reporter = RecordingReporter::new();
        registry.run_step(UPLOAD_STEP, &mut reporter).unwrap();
        assert_eq!(reporter.count(Tag::Warning), 1);
        assert_eq!(registry.targets().len(), 1);
    }

    #[test]
    fn compile_step_generates_the_header() {
        let project = TempDir::new().unwrap();
        let settings = SettingsBuilder::new().project_dir(project.path()).finalize();
        let mut registry = HookRegistry::new();
        register(&mut registry, &settings);

        let mut reporter = RecordingReporter::new();
        registry.run_step(COMPILE_STEP, &mut reporter).unwrap();

        let header = fs::read_to_string(project.path().join("include/version.h")).unwrap();
        assert!(header.contains("#define ESP32MUD_VERSION"));
        assert!(reporter.contains(Tag::Info, "Generated version.h"));
    }

    #[test]
    fn missing_project_dir_is_fatal() {
        let settings = SettingsBuilder::new().finalize();
        let mut registry = HookRegistry::new();
        register(&mut registry, &settings);

        let mut reporter = RecordingReporter::new();
        assert!(registry.run_step(COMPILE_STEP, &mut reporter).is_err());
        assert_eq!(reporter.count(Tag::Error), 1);
    }

    #[test]
    fn reset_upload_target_depends_on_upload() {
        let settings = SettingsBuilder::new().finalize();
        let mut registry = HookRegistry::new();
        register(&mut registry, &settings);

        let target = &registry.targets()[0];
        assert_eq!(target.name, RESET_UPLOAD_TARGET);
        assert_eq!(target.title, "Reset and Upload");
        assert_eq!(target.dependencies, vec![UPLOAD_STEP.to_owned()]);

        // Invoking the target transitively triggers the upload pre-action.
        let mut reporter = RecordingReporter::new();
        registry
            .run_target(RESET_UPLOAD_TARGET, &mut reporter)
            .unwrap();
        assert!(reporter.contains(Tag::Warning, "No upload port configured"));
    }
}
