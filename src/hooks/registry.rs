//! Hook registration interface and a concrete registry.

use std::collections::HashMap;
use std::io;

use log::debug;

use crate::report::Reporter;

// =============================================================================
// Public Interface
// =============================================================================

/// A callback contributed to a build lifecycle step. Runs to completion on
/// the orchestrator's build thread; an `Err` aborts the build.
pub type HookAction = Box<dyn FnMut(&mut dyn Reporter) -> io::Result<()>>;

/// Metadata for a named, user-invokable build target.
///
/// A target carries no action body of its own: invoking it runs its
/// dependency steps, and its title/description exist for discoverability in
/// the orchestrator's UI.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct TargetSpec {
    pub name: String,
    pub title: String,
    pub description: String,
    /// Names of the steps this target triggers, in order.
    pub dependencies: Vec<String>,
}

/// The registration surface an orchestrator exposes to build hooks.
///
/// Hook components depend only on this trait, never on a concrete
/// orchestrator type.
pub trait BuildHookTarget {
    /// Register `action` to run before the main action of `step`. The `name`
    /// identifies the action within the step: registering the same name
    /// again replaces the previous action instead of adding a duplicate.
    fn register_pre_action(&mut self, step: &str, name: &str, action: HookAction);

    /// Declare a named target. Re-defining a target with the same name
    /// replaces the previous definition.
    fn define_target(&mut self, target: TargetSpec);
}

/// An ordered registry of lifecycle hooks, usable as a stand-in orchestrator.
///
/// Pre-actions run in registration order before a step's main action. The
/// main action per step is optional; for the `upload` step in particular the
/// real transport belongs to the external orchestrator.
#[derive(Default)]
pub struct HookRegistry {
    pre_actions: Vec<PreAction>,
    main_actions: HashMap<String, HookAction>,
    targets: Vec<TargetSpec>,
}
impl HookRegistry {
    pub fn new() -> HookRegistry {
        HookRegistry::default()
    }

    /// Install the main action of a step (what the step itself does, after
    /// its pre-actions).
    pub fn set_step_action(&mut self, step: &str, action: HookAction) {
        self.main_actions.insert(step.to_owned(), action);
    }

    /// The targets declared so far, in declaration order.
    pub fn targets(&self) -> &[TargetSpec] {
        &self.targets
    }

    /// Run one lifecycle step: every pre-action registered for it, in order,
    /// then its main action if one is installed. The first `Err` aborts the
    /// run.
    pub fn run_step(&mut self, step: &str, reporter: &mut dyn Reporter) -> io::Result<()> {
        debug!("running step `{}`", step);
        for pre in self.pre_actions.iter_mut().filter(|p| p.step == step) {
            debug!("pre-action `{}` on `{}`", pre.name, pre.step);
            (pre.action)(reporter)?;
        }
        if let Some(action) = self.main_actions.get_mut(step) {
            (action)(reporter)?;
        }
        Ok(())
    }

    /// Run a named target by running each of its dependency steps in order.
    /// A name with no target definition is treated as a plain step name.
    pub fn run_target(&mut self, name: &str, reporter: &mut dyn Reporter) -> io::Result<()> {
        let dependencies = match self.targets.iter().find(|t| t.name == name) {
            Some(target) => target.dependencies.clone(),
            None => return self.run_step(name, reporter),
        };
        debug!("running target `{}`", name);
        for step in &dependencies {
            self.run_step(step, reporter)?;
        }
        Ok(())
    }
}
impl BuildHookTarget for HookRegistry {
    fn register_pre_action(&mut self, step: &str, name: &str, action: HookAction) {
        match self
            .pre_actions
            .iter_mut()
            .find(|p| p.step == step && p.name == name)
        {
            Some(existing) => existing.action = action,
            None => self.pre_actions.push(PreAction {
                step: step.to_owned(),
                name: name.to_owned(),
                action,
            }),
        }
    }

    fn define_target(&mut self, target: TargetSpec) {
        match self.targets.iter_mut().find(|t| t.name == target.name) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }
}

// =============================================================================
// Private stuff
// =============================================================================

struct PreAction {
    step: String,
    name: String,
    action: HookAction,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::report::RecordingReporter;

    fn recording_action(log: &Rc<RefCell<Vec<&'static str>>>, id: &'static str) -> HookAction {
        let log = Rc::clone(log);
        Box::new(move |_| {
            log.borrow_mut().push(id);
            Ok(())
        })
    }

    #[test]
    fn pre_actions_run_in_order_before_main() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut registry = HookRegistry::new();
        registry.register_pre_action("upload", "first", recording_action(&log, "first"));
        registry.register_pre_action("upload", "second", recording_action(&log, "second"));
        registry.set_step_action("upload", recording_action(&log, "main"));

        let mut reporter = RecordingReporter::new();
        registry.run_step("upload", &mut reporter).unwrap();
        assert_eq!(*log.borrow(), vec!["first", "second", "main"]);
    }

    #[test]
    fn re_registration_replaces_instead_of_duplicating() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut registry = HookRegistry::new();
        registry.register_pre_action("upload", "reset", recording_action(&log, "old"));
        registry.register_pre_action("upload", "reset", recording_action(&log, "new"));

        let mut reporter = RecordingReporter::new();
        registry.run_step("upload", &mut reporter).unwrap();
        assert_eq!(*log.borrow(), vec!["new"]);
    }

    #[test]
    fn failing_pre_action_aborts_the_step() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut registry = HookRegistry::new();
        registry.register_pre_action(
            "compile",
            "stamp",
            Box::new(|_| Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))),
        );
        registry.set_step_action("compile", recording_action(&log, "main"));

        let mut reporter = RecordingReporter::new();
        assert!(registry.run_step("compile", &mut reporter).is_err());
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn target_runs_its_dependency_steps() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut registry = HookRegistry::new();
        registry.register_pre_action("upload", "reset", recording_action(&log, "reset"));
        registry.define_target(TargetSpec {
            name: "reset_upload".into(),
            title: "Reset and Upload".into(),
            description: "chained target".into(),
            dependencies: vec!["upload".into()],
        });

        let mut reporter = RecordingReporter::new();
        registry.run_target("reset_upload", &mut reporter).unwrap();
        assert_eq!(*log.borrow(), vec!["reset"]);
    }

    #[test]
    fn unknown_target_falls_back_to_step() {
        let log = Rc::new(RefCell::new(vec![]));
        let mut registry = HookRegistry::new();
        registry.register_pre_action("compile", "stamp", recording_action(&log, "stamp"));

        let mut reporter = RecordingReporter::new();
        registry.run_target("compile", &mut reporter).unwrap();
        assert_eq!(*log.borrow(), vec!["stamp"]);
    }

    #[test]
    fn redefining_a_target_replaces_it() {
        let mut registry = HookRegistry::new();
        let spec = |deps: Vec<String>| TargetSpec {
            name: "reset_upload".into(),
            title: "Reset and Upload".into(),
            description: String::new(),
            dependencies: deps,
        };
        registry.define_target(spec(vec!["upload".into()]));
        registry.define_target(spec(vec!["compile".into(), "upload".into()]));

        assert_eq!(registry.targets().len(), 1);
        assert_eq!(registry.targets()[0].dependencies.len(), 2);
    }
}
