use std::path::{Path, PathBuf};
use time::macros::datetime;
use time::OffsetDateTime;

/// Inclusive creation-time window, both ends expressed as absolute instants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: OffsetDateTime,
    pub end: OffsetDateTime,
}

impl TimeWindow {
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> Self {
        Self { start, end }
    }

    /// Window from raw epoch seconds (handy for tests and callers that already hold timestamps).
    pub fn from_epochs(start: i64, end: i64) -> anyhow::Result<Self> {
        Ok(Self {
            start: OffsetDateTime::from_unix_timestamp(start)?,
            end: OffsetDateTime::from_unix_timestamp(end)?,
        })
    }

    /// Lower bound as fractional epoch seconds.
    #[inline]
    pub fn lower(&self) -> f64 {
        self.start.unix_timestamp_nanos() as f64 / 1e9
    }

    /// Upper bound as fractional epoch seconds.
    #[inline]
    pub fn upper(&self) -> f64 {
        self.end.unix_timestamp_nanos() as f64 / 1e9
    }

    #[inline]
    pub fn contains_epoch(&self, ts: f64) -> bool {
        self.lower() <= ts && ts <= self.upper()
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self {
            start: datetime!(2025-07-04 00:00:00 UTC),
            end: datetime!(2025-07-11 23:59:59 UTC),
        }
    }
}

/// Run configuration with the defaults of the July 2025 flood scan and builder chaining.
#[derive(Clone, Debug)]
pub struct FilterOptions {
    pub window: TimeWindow,
    pub terms: Vec<String>,       // lowercase, configured order (first match wins)
    pub input: PathBuf,           // single dump file or a directory of them
    pub recursive: bool,          // walk subdirectories when `input` is a directory
    pub output: PathBuf,          // JSON array, rewritten in full after every file
    pub progress: bool,           // show per-file progress bar
    pub atomic_output: bool,      // write to a temp file then rename into place
    pub sorted_traversal: bool,   // sort discovered paths instead of walk order
    pub read_buffer_bytes: usize, // BufReader capacity for record decoding
}

impl Default for FilterOptions {
    fn default() -> Self {
        let terms = ["texas flood", "tx flood", "houston flood", "flash flood", "rain damage"];
        Self {
            window: TimeWindow::default(),
            terms: terms.iter().map(|t| normalize_term(t)).collect(),
            input: PathBuf::from("E:/RedditDownloads/reddit/submissions/RS_2025-07.zst"),
            recursive: false,
            output: PathBuf::from("filtered_posts.json"),
            progress: true,
            atomic_output: true,
            sorted_traversal: false,
            read_buffer_bytes: 256 * 1024,
        }
    }
}

impl FilterOptions {
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = window;
        self
    }
    /// Replace the search terms. Order is kept: it decides which term is reported.
    /// Terms are only lowercased; surrounding whitespace is part of the term.
    pub fn with_terms<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.terms = terms
            .into_iter()
            .map(|t| normalize_term(t.as_ref()))
            .collect();
        self
    }
    pub fn with_input(mut self, path: impl AsRef<Path>) -> Self {
        self.input = path.as_ref().to_path_buf();
        self
    }
    pub fn with_recursive(mut self, yes: bool) -> Self {
        self.recursive = yes;
        self
    }
    pub fn with_output(mut self, path: impl AsRef<Path>) -> Self {
        self.output = path.as_ref().to_path_buf();
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_atomic_output(mut self, yes: bool) -> Self {
        self.atomic_output = yes;
        self
    }
    pub fn with_sorted_traversal(mut self, yes: bool) -> Self {
        self.sorted_traversal = yes;
        self
    }
    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }
}

#[inline]
pub fn normalize_term(s: &str) -> String {
    s.to_lowercase()
}
