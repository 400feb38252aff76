//! Per-file progress reporting: a byte-based `indicatif` bar fed from the raw
//! bytes consumed by the decoder, with a running row count.

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const REFRESH_EVERY_ROWS: u64 = 1_000;

fn file_bar(total_bytes: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total_bytes);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} {prefix} {bytes:>10}/{total_bytes:<10} [{bar:.cyan/blue}] {percent:>3}%  \
         {msg}  elapsed: {elapsed_precise}  eta: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
    }
    pb.set_prefix(label.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Observes every record pulled from one file.
/// - `on_record()` counts a row and periodically syncs the bar to bytes read
/// - `finish()` flushes the final position and leaves a terminating line
pub struct FileProgress {
    pb: ProgressBar,
    counter: Arc<AtomicU64>,
    rows: u64,
}

impl FileProgress {
    pub fn new(path: &Path, total_bytes: u64, counter: Arc<AtomicU64>, enabled: bool) -> Self {
        let pb = if enabled {
            let label = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            file_bar(total_bytes, &label)
        } else {
            ProgressBar::hidden()
        };
        Self { pb, counter, rows: 0 }
    }

    #[inline]
    pub fn on_record(&mut self) {
        self.rows += 1;
        if self.rows % REFRESH_EVERY_ROWS == 0 {
            self.sync();
        }
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    fn sync(&self) {
        self.pb.set_position(self.counter.load(Ordering::Relaxed));
        let per_sec = self.rows as f64 / self.pb.elapsed().as_secs_f64().max(1e-3);
        self.pb.set_message(format!("{} rows ({:.0} rows/s)", self.rows, per_sec));
    }

    pub fn finish(&self) {
        self.sync();
        self.pb.finish_with_message(format!("{} rows", self.rows));
    }
}
