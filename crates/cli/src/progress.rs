use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use plagcheck_core::ProgressReporter;

const STEPS: u64 = 1000;

/// Progress bar on stderr for the comparison phase. Hidden when stderr is not a terminal.
pub(crate) struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub(crate) fn new() -> Self {
        let bar = ProgressBar::with_draw_target(Some(STEPS), ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} comparing [{bar:40.cyan/dim}] {percent:>3}% {elapsed_precise}",
        )
        .map(|s| s.progress_chars("━━╸"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Self { bar }
    }

    pub(crate) fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressReporter for BarProgress {
    fn start(&self) {
        self.bar.set_position(0);
    }

    fn progress(&self, fraction: f64) {
        let pos = (fraction.clamp(0.0, 1.0) * STEPS as f64) as u64;
        if pos > self.bar.position() {
            self.bar.set_position(pos);
        }
    }

    fn end(&self) {
        self.bar.finish_and_clear();
    }
}
