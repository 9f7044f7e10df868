//! Indeterminate progress indicator

use std::io::IsTerminal;
use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::domain::errors::DomainError;
use crate::domain::model::BatchResult;
use crate::ports::BatchObserver;
use crate::utils::path::display_name;

/// Spinner on stderr showing the file being converted
pub struct SpinnerObserver {
    bar: ProgressBar,
}

impl SpinnerObserver {
    /// Spinner drawn only when stderr is a terminal and `enabled` is set
    pub fn new(enabled: bool) -> Self {
        if !enabled || !std::io::stderr().is_terminal() {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        bar.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg} {elapsed:.dim}")
        {
            bar.set_style(style);
        }
        Self { bar }
    }
}

impl BatchObserver for SpinnerObserver {
    fn file_started(&self, index: usize, total: usize, source: &Path) {
        self.bar.reset_elapsed();
        self.bar
            .set_message(format!("[{}/{}] {}", index + 1, total, display_name(source)));
        self.bar.enable_steady_tick(Duration::from_millis(100));
    }

    fn file_finished(&self, source: &Path, outcome: Result<&Path, &DomainError>) {
        if let Err(e) = outcome {
            self.bar
                .println(format!("failed: {}: {}", display_name(source), e));
        }
    }

    fn batch_finished(&self, _result: &BatchResult) {
        self.bar.finish_and_clear();
    }
}
