//! Timed holds with a terminal spinner.

use std::{thread, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

/// Sleep for `duration` while showing a spinner with the given message. The
/// spinner is cleared when the hold completes, leaving the log untouched.
pub(crate) fn hold(duration: Duration, message: &str) {
    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(120);
    pb.set_style(
        ProgressStyle::default_spinner()
            // For more spinners check out the cli-spinners project:
            // https://github.com/sindresorhus/cli-spinners/blob/master/spinners.json
            .tick_strings(&["⠋", "⠙", "⠚", "⠞", "⠖", "⠦", "⠴", "⠲", "⠳", "⠓"])
            .template("[FP] {spinner:.blue} {msg}"),
    );
    pb.set_message(message.to_owned());
    thread::sleep(duration);
    pb.finish_and_clear();
}
