//! Progress display for a submission run.

use indicatif::{ProgressBar, ProgressStyle};

use collector_admin::ProgressState;

/// Progress bar owned by one submission run.
pub struct SubmitProgress {
    bar: ProgressBar,
}

impl SubmitProgress {
    pub fn new(total: usize) -> Self {
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len} ({percent}%)")
        {
            bar.set_style(style.progress_chars("█▓░"));
        }
        bar.set_message("Creating tasks");
        bar.enable_steady_tick(std::time::Duration::from_millis(100));
        Self { bar }
    }

    /// Apply a progress update from the submitter.
    pub fn update(&self, state: ProgressState) {
        self.bar.set_position(state.completed as u64);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
