//! Severity-tagged progress reporting for the build hooks.
//!
//! The hooks run inside an external build orchestrator, so user-facing output
//! goes through an injected [`Reporter`] sink instead of bare `println!`
//! calls. The default [`ConsoleReporter`] prints `[TAG] message` lines to
//! stdout, which is the format the firmware build logs expect; tests can
//! substitute a recording sink to assert on the advisory/fatal split.

use console::style;

// =============================================================================
// Public Interface
// =============================================================================

/// Severity tag prefixed to every reported line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Banner announcing the reset handshake.
    Reset,
    /// Successful completion of a step.
    Ok,
    /// Advisory failure; the build proceeds unaffected.
    Warning,
    /// Fatal failure; the build is about to abort.
    Error,
    /// Neutral information.
    Info,
}
impl Tag {
    /// The literal tag as it appears in the build log.
    pub fn label(self) -> &'static str {
        match self {
            Tag::Reset => "[RESET]",
            Tag::Ok => "[OK]",
            Tag::Warning => "[WARNING]",
            Tag::Error => "[ERROR]",
            Tag::Info => "[INFO]",
        }
    }
}

/// Sink for user-facing, severity-tagged report lines.
///
/// The convenience methods all delegate to [`report`](Reporter::report);
/// implementors only need to provide that one method.
pub trait Reporter {
    fn report(&mut self, tag: Tag, message: &str);

    fn ok(&mut self, message: &str) {
        self.report(Tag::Ok, message);
    }
    fn warning(&mut self, message: &str) {
        self.report(Tag::Warning, message);
    }
    fn error(&mut self, message: &str) {
        self.report(Tag::Error, message);
    }
    fn info(&mut self, message: &str) {
        self.report(Tag::Info, message);
    }
}

/// Reporter printing colored `[TAG] message` lines to stdout.
#[derive(Debug, Default)]
pub struct ConsoleReporter;
impl Reporter for ConsoleReporter {
    fn report(&mut self, tag: Tag, message: &str) {
        let label = match tag {
            Tag::Reset => style(tag.label()).cyan(),
            Tag::Ok => style(tag.label()).green(),
            Tag::Warning => style(tag.label()).yellow(),
            Tag::Error => style(tag.label()).red(),
            Tag::Info => style(tag.label()).dim(),
        };
        println!("{} {}", label, message);
    }
}

// =============================================================================
// Test support
// =============================================================================

/// Reporter that records every line for later inspection.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub entries: Vec<(Tag, String)>,
}
#[cfg(test)]
impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the recorded lines carrying the given tag.
    pub fn count(&self, tag: Tag) -> usize {
        self.entries.iter().filter(|(t, _)| *t == tag).count()
    }

    /// `true` when some line with the given tag contains `needle`.
    pub fn contains(&self, tag: Tag, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|(t, m)| *t == tag && m.contains(needle))
    }
}
#[cfg(test)]
impl Reporter for RecordingReporter {
    fn report(&mut self, tag: Tag, message: &str) {
        self.entries.push((tag, message.to_owned()));
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[test]
fn labels() {
    assert_eq!(Tag::Reset.label(), "[RESET]");
    assert_eq!(Tag::Ok.label(), "[OK]");
    assert_eq!(Tag::Warning.label(), "[WARNING]");
    assert_eq!(Tag::Error.label(), "[ERROR]");
    assert_eq!(Tag::Info.label(), "[INFO]");
}

#[test]
fn recording() {
    let mut reporter = RecordingReporter::new();
    reporter.warning("first");
    reporter.ok("second");
    reporter.warning("third");
    assert_eq!(reporter.count(Tag::Warning), 2);
    assert!(reporter.contains(Tag::Ok, "second"));
    assert!(!reporter.contains(Tag::Error, "first"));
}
