//! Terminal presentation helpers.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// A start/stop loading spinner shown around blocking provider calls.
///
/// Purely presentational; the pipeline result never depends on it. With
/// `enabled == false` (quiet mode, or when stdout is the output sink) all
/// calls are no-ops.
pub struct LoadingSpinner {
    enabled: bool,
    bar: Option<ProgressBar>,
}

impl LoadingSpinner {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, bar: None }
    }

    /// Start spinning with the given message; replaces any active spinner.
    pub fn start(&mut self, message: &str) {
        self.stop();
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        self.bar = Some(bar);
    }

    /// Stop and clear the active spinner, if any.
    pub fn stop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for LoadingSpinner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_spinner_is_noop() {
        let mut spinner = LoadingSpinner::new(false);
        spinner.start("working");
        assert!(spinner.bar.is_none());
        spinner.stop();
    }

    #[test]
    fn test_stop_without_start() {
        let mut spinner = LoadingSpinner::new(true);
        spinner.stop();
    }
}
