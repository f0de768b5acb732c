use indicatif::{ProgressBar, ProgressStyle};
use review_export_core::ExportProgress;
use std::io::IsTerminal;
use std::time::Duration;

/// Terminal progress for an export run. Hidden when stdout/stderr are not
/// terminals; the tracing log carries the same information there.
pub struct ExportUI {
    bar: ProgressBar,
    interactive: bool,
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
}

impl ExportUI {
    pub fn new(quiet: bool) -> Self {
        let interactive = is_interactive() && !quiet;
        let bar = if interactive {
            let bar = ProgressBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self { bar, interactive }
    }

    /// Callback for `ExportOrchestrator::with_progress`
    pub fn handler(&self) -> impl Fn(&ExportProgress) + Send + Sync + 'static {
        let bar = self.bar.clone();
        move |event| match event {
            ExportProgress::Fetching(platform) => {
                bar.set_style(spinner_style());
                bar.set_message(format!("Fetching {} reviews...", platform));
            }
            ExportProgress::Fetched { platform, reviews } => {
                bar.set_style(bar_style());
                bar.set_length(*reviews as u64);
                bar.set_position(0);
                bar.set_message(format!("Translating {} reviews", platform));
            }
            ExportProgress::Translated { done, .. } => {
                bar.set_position(*done as u64);
            }
            ExportProgress::Writing(path) => {
                bar.set_style(spinner_style());
                bar.set_message(format!("Writing {}...", path.display()));
            }
        }
    }

    pub fn finish(&self) {
        if self.interactive {
            self.bar.finish_and_clear();
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
