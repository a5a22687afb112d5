//! CLI presenter for output formatting

use std::time::Duration as StdDuration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::status::StatusEvent;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.red} {msg}")
        {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(StdDuration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print_line(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print_line(format!("{} {}", "✓".green(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print_line(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Report a pipeline status event.
    ///
    /// Start and stop drive the spinner, so only errors are printed.
    pub fn status(&self, event: StatusEvent) {
        if event.is_error() {
            self.error(&format!("{} ({})", event.message(), event.name()));
        }
    }

    /// Format elapsed recording time, with the limit when there is one
    pub fn format_elapsed(&self, elapsed: StdDuration, limit: Option<StdDuration>) -> String {
        let elapsed = clock(elapsed.as_secs());
        match limit {
            Some(limit) => format!("{} / {}", elapsed, clock(limit.as_secs())),
            None => elapsed,
        }
    }

    /// Update the recording spinner with elapsed time
    pub fn update_recording_progress(
        &self,
        path: &str,
        elapsed: StdDuration,
        limit: Option<StdDuration>,
    ) {
        let time = self.format_elapsed(elapsed, limit);
        self.update_spinner(&format!("Recording to {} {}", path, time.cyan()));
    }

    /// Print above an active spinner instead of through it
    fn print_line(&self, line: String) {
        match &self.spinner {
            Some(spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

/// `h:mm:ss` or `m:ss`
fn clock(total_secs: u64) -> String {
    let (h, m, s) = (total_secs / 3600, (total_secs / 60) % 60, total_secs % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_formats_minutes_and_hours() {
        assert_eq!(clock(0), "0:00");
        assert_eq!(clock(65), "1:05");
        assert_eq!(clock(3725), "1:02:05");
    }

    #[test]
    fn format_elapsed_without_limit() {
        let presenter = Presenter::new();
        assert_eq!(
            presenter.format_elapsed(StdDuration::from_secs(42), None),
            "0:42"
        );
    }

    #[test]
    fn format_elapsed_with_limit() {
        let presenter = Presenter::new();
        let text = presenter.format_elapsed(
            StdDuration::from_millis(5_900),
            Some(StdDuration::from_secs(30)),
        );
        assert_eq!(text, "0:05 / 0:30");
    }

    #[test]
    fn spinner_lifecycle() {
        let mut presenter = Presenter::new();
        assert!(!presenter.spinner.is_some());
        presenter.start_spinner("Recording");
        assert!(presenter.spinner.is_some());
        presenter.stop_spinner();
        assert!(!presenter.spinner.is_some());
    }
}
