//! Spinner shown while a document loads or a question is answered.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(100);

/// A terminal spinner that is cleared when dropped.
///
/// Disabled spinners draw nothing, so JSON output stays machine-readable.
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Start a spinner with a message, or a silent one when disabled.
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(TICK);
        Self { bar: Some(bar) }
    }

    /// Replace the message.
    pub fn set_message(&self, message: impl Into<String>) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.into());
        }
    }

    /// Remove the spinner from the terminal.
    pub fn finish(mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_draws_nothing() {
        let spinner = Spinner::start("Thinking...", false);
        assert!(spinner.bar.is_none());
        spinner.set_message("still thinking");
        spinner.finish();
    }

    #[test]
    fn test_enabled_spinner_finishes() {
        let spinner = Spinner::start("Loading", true);
        assert!(spinner.bar.is_some());
        spinner.finish();
    }
}
