//! Build-time version stamping.
//!
//! Before compilation, a calendar-based version identifier is derived from
//! the local clock and written to `<project>/include/version.h`, where the
//! firmware source picks it up as compile-time string constants. The header
//! is regenerated wholesale on every build; it is never diffed, merged or
//! conditionally skipped.
//!
//! Unlike the reset handshake, a failure here is fatal: the firmware cannot
//! compile without the generated header, so write errors must abort the
//! build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::debug;

use crate::report::Reporter;

// =============================================================================
// Public Interface
// =============================================================================

/// Relative path of the generated header within the project.
pub const HEADER_RELATIVE_PATH: &str = "include/version.h";

/// A calendar-based version identifier, derived once per build invocation.
///
/// Immutable once computed. The three fields land verbatim in the generated
/// header as `ESP32MUD_VERSION`, `COMPILE_DATE` and `COMPILE_TIME`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VersionStamp {
    /// `YY.MM.DD` of the build date.
    pub version: String,
    /// Human-readable build date, `Mon DD YYYY`.
    pub compile_date: String,
    /// Wall-clock build time, `HH:MM:SS`.
    pub compile_time: String,
}
impl VersionStamp {
    /// Stamp the current local date and time. The clock is sampled exactly
    /// once.
    pub fn now() -> VersionStamp {
        VersionStamp::from_datetime(Local::now())
    }

    /// Derive the stamp fields from an explicit timestamp. Pure function of
    /// its input; [`now`](VersionStamp::now) is the only place that touches
    /// the clock.
    pub fn from_datetime(at: DateTime<Local>) -> VersionStamp {
        VersionStamp {
            version: at.format("%y.%m.%d").to_string(),
            compile_date: at.format("%b %d %Y").to_string(),
            compile_time: at.format("%H:%M:%S").to_string(),
        }
    }

    /// Render the full header text, include guard and all.
    pub fn render(&self) -> String {
        format!(
            "// Auto-generated version header\n\
             // Generated at build time\n\
             #ifndef VERSION_H\n\
             #define VERSION_H\n\
             \n\
             #define ESP32MUD_VERSION \"{}\"\n\
             #define COMPILE_DATE \"{}\"\n\
             #define COMPILE_TIME \"{}\"\n\
             \n\
             #endif // VERSION_H\n",
            self.version, self.compile_date, self.compile_time
        )
    }
}

/// Write the version header for `stamp` under `project_dir`, creating the
/// `include` directory if it does not exist yet and overwriting any previous
/// header.
///
/// Returns the path of the written header. Any directory-creation or write
/// error is returned to the caller and must abort the build; downstream
/// compilation has a hard dependency on this artifact.
pub fn write_header(project_dir: &Path, stamp: &VersionStamp) -> io::Result<PathBuf> {
    let output = project_dir.join(HEADER_RELATIVE_PATH);
    if let Some(include_dir) = output.parent() {
        fs::create_dir_all(include_dir)?;
    }
    fs::write(&output, stamp.render())?;
    debug!("wrote version header to {}", output.display());
    Ok(output)
}

/// Stamp the current date and write the header, reporting the result. This is
/// the operation registered as the pre-compile build hook.
pub fn generate(project_dir: &Path, reporter: &mut dyn Reporter) -> io::Result<PathBuf> {
    let stamp = VersionStamp::now();
    match write_header(project_dir, &stamp) {
        Ok(output) => {
            reporter.info(&format!("Generated version.h: v{}", stamp.version));
            Ok(output)
        }
        Err(err) => {
            reporter.error(&format!("Failed to generate version.h: {}", err));
            Err(err)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::report::{RecordingReporter, Tag};

    fn fixed_stamp() -> VersionStamp {
        let at = Local.with_ymd_and_hms(2025, 3, 7, 14, 30, 5).unwrap();
        VersionStamp::from_datetime(at)
    }

    #[test]
    fn derives_fields_from_date() {
        let stamp = fixed_stamp();
        assert_eq!(stamp.version, "25.03.07");
        assert_eq!(stamp.compile_date, "Mar 07 2025");
        assert_eq!(stamp.compile_time, "14:30:05");
    }

    #[test]
    fn renders_guarded_header() {
        let header = fixed_stamp().render();
        assert!(header.starts_with("// Auto-generated version header\n"));
        assert!(header.contains("#ifndef VERSION_H\n#define VERSION_H\n"));
        assert!(header.contains("#define ESP32MUD_VERSION \"25.03.07\"\n"));
        assert!(header.contains("#define COMPILE_DATE \"Mar 07 2025\"\n"));
        assert!(header.contains("#define COMPILE_TIME \"14:30:05\"\n"));
        assert!(header.ends_with("#endif // VERSION_H\n"));
    }

    #[test]
    fn writes_header_creating_include_dir() {
        let project = TempDir::new().unwrap();
        let stamp = fixed_stamp();

        let output = write_header(project.path(), &stamp).unwrap();
        assert_eq!(output, project.path().join("include/version.h"));
        assert_eq!(fs::read_to_string(&output).unwrap(), stamp.render());
    }

    #[test]
    fn overwrites_wholesale() {
        let project = TempDir::new().unwrap();
        let output = project.path().join(HEADER_RELATIVE_PATH);
        fs::create_dir_all(output.parent().unwrap()).unwrap();
        fs::write(&output, "// stale hand-edited content\n").unwrap();

        let stamp = fixed_stamp();
        write_header(project.path(), &stamp).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), stamp.render());

        // Same date in, byte-identical header out.
        write_header(project.path(), &stamp).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), stamp.render());
    }

    #[test]
    fn write_failure_is_fatal_and_reported() {
        let project = TempDir::new().unwrap();
        // Occupy the include path with a file so directory creation fails.
        fs::write(project.path().join("include"), b"not a directory").unwrap();

        let mut reporter = RecordingReporter::new();
        let result = generate(project.path(), &mut reporter);
        assert!(result.is_err());
        assert!(reporter.contains(Tag::Error, "Failed to generate version.h"));
        assert_eq!(reporter.count(Tag::Info), 0);
    }

    #[test]
    fn generate_reports_version() {
        let project = TempDir::new().unwrap();
        let mut reporter = RecordingReporter::new();

        generate(project.path(), &mut reporter).unwrap();
        assert!(reporter.contains(Tag::Info, "Generated version.h: v"));
    }
}
